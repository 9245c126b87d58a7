//! Login, profile, bearer-token and API-key flows through the full router.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::json;

use alumni_core::auth::jwt::TokenClaims;
use common::{API_KEY, PASSWORD, TestApp};

#[tokio::test]
async fn login_returns_token_and_alumni() {
    let app = TestApp::new().await;
    let (status, body) = app
        .call(
            "POST",
            "/login",
            None,
            Some(json!({"email": "ALUMNI1@example.com", "password": PASSWORD})),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["alumni"]["email"], "alumni1@example.com");
    assert!(body["data"]["alumni"].get("password_hash").is_none());

    let token = body["data"]["token"].as_str().unwrap();
    let claims = app.state.tokens.verify(token).unwrap();
    assert_eq!(claims.sub, app.user1.id);
    assert_eq!(claims.role, "user");
}

#[tokio::test]
async fn login_failures_share_one_message() {
    let app = TestApp::new().await;
    let (wrong_pw, wrong_pw_body) = app
        .call(
            "POST",
            "/login",
            None,
            Some(json!({"email": "alumni1@example.com", "password": "salah"})),
        )
        .await;
    let (unknown, unknown_body) = app
        .call(
            "POST",
            "/login",
            None,
            Some(json!({"email": "nobody@example.com", "password": PASSWORD})),
        )
        .await;

    assert_eq!(wrong_pw, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_pw_body["message"], "email or password incorrect");
    assert_eq!(wrong_pw_body, unknown_body);
    assert_eq!(wrong_pw_body["success"], false);
}

#[tokio::test]
async fn login_requires_both_fields() {
    let app = TestApp::new().await;
    let (status, body) = app
        .call("POST", "/login", None, Some(json!({"email": "alumni1@example.com"})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let app = TestApp::new().await;
    let req = Request::builder()
        .method("POST")
        .uri("/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = app.send(req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn profile_reflects_token() {
    let app = TestApp::new().await;
    let (status, body) = app
        .call("GET", "/profile", Some(&app.user2_token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], app.user2.id.to_string());
    assert_eq!(body["data"]["role"], "user");
    assert_eq!(body["data"]["alumni"]["name"], "Alumni 2");
}

#[tokio::test]
async fn protected_route_rejects_missing_or_bad_credentials() {
    let app = TestApp::new().await;

    let (status, body) = app.call("GET", "/jobs", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);

    let basic = Request::builder()
        .uri("/jobs")
        .header(header::AUTHORIZATION, "Basic YWRtaW46YWRtaW4=")
        .body(Body::empty())
        .unwrap();
    assert_eq!(app.send(basic).await.0, StatusCode::UNAUTHORIZED);

    let (status, _) = app.call("GET", "/jobs", Some("not.a.jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn expired_token_is_unauthorized() {
    let app = TestApp::new().await;
    let mut claims = TokenClaims::new(app.user1.id, &app.user1.email, "user");
    claims.iat -= 2 * 86_400;
    claims.nbf -= 2 * 86_400;
    claims.exp -= 2 * 86_400;
    let token = app.state.tokens.sign(&claims).unwrap();

    let (status, body) = app.call("GET", "/profile", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "invalid or expired token");
}

#[tokio::test]
async fn unknown_role_is_forbidden() {
    let app = TestApp::new().await;
    let token = app
        .state
        .tokens
        .issue(app.user1.id, &app.user1.email, "guest")
        .unwrap();
    let (status, _) = app.call("GET", "/alumni", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

fn check_form(key: &str, student_number: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(format!("/alumni/check/{key}"))
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(format!("student_number={student_number}")))
        .unwrap()
}

#[tokio::test]
async fn check_alumni_with_form_body() {
    let app = TestApp::new().await;

    let (status, body) = app.send(check_form(API_KEY, "434220001")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_alumni"], true);
    assert_eq!(body["data"]["id"], app.user1.id.to_string());

    let (status, body) = app.send(check_form(API_KEY, "999999999")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_alumni"], false);
    assert!(body.get("data").is_none());
}

#[tokio::test]
async fn check_alumni_with_json_body() {
    let app = TestApp::new().await;
    let (status, body) = app
        .call(
            "POST",
            &format!("/alumni/check/{API_KEY}"),
            None,
            Some(json!({"student_number": "434220000"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_alumni"], true);
}

#[tokio::test]
async fn check_alumni_rejects_wrong_key_and_blank_number() {
    let app = TestApp::new().await;
    assert_eq!(
        app.send(check_form("wrong-key", "434220001")).await.0,
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        app.send(check_form(API_KEY, "")).await.0,
        StatusCode::BAD_REQUEST
    );
}
