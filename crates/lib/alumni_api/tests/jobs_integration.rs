//! Job record lifecycle: active, soft-deleted, restored, hard-deleted.

mod common;

use axum::http::StatusCode;
use serde_json::{Value, json};
use uuid::Uuid;

use common::TestApp;

fn job_body(alumni_id: Uuid) -> Value {
    json!({
        "alumni_id": alumni_id,
        "company": "PT Nusantara Data",
        "position": "Data Engineer",
        "industry": "Teknologi",
        "location": "Bandung",
        "salary_range": "10-15 juta",
        "start_date": "2023-02-01",
        "status": "aktif",
    })
}

async fn create_job(app: &TestApp, alumni_id: Uuid) -> String {
    let (status, body) = app
        .call("POST", "/jobs", Some(&app.admin_token), Some(job_body(alumni_id)))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["data"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn soft_delete_scenario() {
    let app = TestApp::new().await;
    let id = create_job(&app, app.user1.id).await;

    let (status, body) = app
        .call("GET", &format!("/jobs/{id}"), Some(&app.user1_token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["company"], "PT Nusantara Data");
    assert_eq!(body["data"]["status"], "aktif");
    assert!(body["data"]["deleted_at"].is_null());

    let uri = format!("/jobs/{id}/soft-delete");
    let (status, body) = app.call("PUT", &uri, Some(&app.user2_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["success"], false);

    let (status, body) = app.call("PUT", &uri, Some(&app.user1_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["deleted_at"].is_string());

    let (status, body) = app.call("PUT", &uri, Some(&app.user1_token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "job record is already deleted");
}

#[tokio::test]
async fn soft_deleted_job_leaves_active_views() {
    let app = TestApp::new().await;
    let id = create_job(&app, app.user1.id).await;
    app.call(
        "PUT",
        &format!("/jobs/{id}/soft-delete"),
        Some(&app.admin_token),
        None,
    )
    .await;

    let (status, _) = app
        .call("GET", &format!("/jobs/{id}"), Some(&app.admin_token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = app.call("GET", "/jobs", Some(&app.admin_token), None).await;
    assert_eq!(body["meta"]["total"], 0);

    let (status, _) = app
        .call(
            "PUT",
            &format!("/jobs/{id}"),
            Some(&app.admin_token),
            Some(job_body(app.user1.id)),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn trash_is_scoped_to_caller() {
    let app = TestApp::new().await;
    let mine = create_job(&app, app.user1.id).await;
    let theirs = create_job(&app, app.user2.id).await;
    for id in [&mine, &theirs] {
        app.call(
            "PUT",
            &format!("/jobs/{id}/soft-delete"),
            Some(&app.admin_token),
            None,
        )
        .await;
    }

    let (status, body) = app
        .call("GET", "/jobs/trash", Some(&app.user1_token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let items = body["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], mine.as_str());

    let (_, body) = app
        .call("GET", "/jobs/trash", Some(&app.admin_token), None)
        .await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn restore_returns_job_to_active() {
    let app = TestApp::new().await;
    let id = create_job(&app, app.user1.id).await;
    let restore = format!("/jobs/{id}/restore");

    let (status, body) = app.call("PUT", &restore, Some(&app.user1_token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "job record is not deleted");

    app.call(
        "PUT",
        &format!("/jobs/{id}/soft-delete"),
        Some(&app.user1_token),
        None,
    )
    .await;
    let (status, _) = app.call("PUT", &restore, Some(&app.user2_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.call("PUT", &restore, Some(&app.user1_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["deleted_at"].is_null());

    let (status, _) = app
        .call("GET", &format!("/jobs/{id}"), Some(&app.user1_token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn hard_delete_is_admin_only_and_final() {
    let app = TestApp::new().await;
    let id = create_job(&app, app.user1.id).await;
    let uri = format!("/jobs/{id}");

    let (status, _) = app.call("DELETE", &uri, Some(&app.user1_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.call("DELETE", &uri, Some(&app.admin_token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.call("DELETE", &uri, Some(&app.admin_token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app
        .call("PUT", &format!("{uri}/restore"), Some(&app.admin_token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_validates_input() {
    let app = TestApp::new().await;

    let mut body = job_body(app.user1.id);
    body["company"] = json!("  ");
    let (status, _) = app
        .call("POST", "/jobs", Some(&app.admin_token), Some(body))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut body = job_body(app.user1.id);
    body["end_date"] = json!("2022-01-01");
    let (status, _) = app
        .call("POST", "/jobs", Some(&app.admin_token), Some(body))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .call(
            "POST",
            "/jobs",
            Some(&app.admin_token),
            Some(job_body(Uuid::now_v7())),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .call("POST", "/jobs", Some(&app.user1_token), Some(job_body(app.user1.id)))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn invalid_id_is_bad_request() {
    let app = TestApp::new().await;
    let (status, _) = app
        .call("GET", "/jobs/not-an-id", Some(&app.admin_token), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn list_paginates_and_searches() {
    let app = TestApp::new().await;
    for n in 0..23 {
        let mut body = job_body(app.user1.id);
        body["company"] = json!(format!("Company {n:02}"));
        let (status, _) = app
            .call("POST", "/jobs", Some(&app.admin_token), Some(body))
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = app
        .call(
            "GET",
            "/jobs?page=3&limit=10&sortBy=company&order=asc",
            Some(&app.user1_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 23);
    assert_eq!(body["meta"]["pages"], 3);
    assert_eq!(body["meta"]["sortBy"], "company");
    let items = body["data"].as_array().unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(items[0]["company"], "Company 20");

    let (_, body) = app
        .call(
            "GET",
            "/jobs?search=company%2007&sortBy=password_hash",
            Some(&app.user1_token),
            None,
        )
        .await;
    assert_eq!(body["meta"]["total"], 1);
    assert_eq!(body["meta"]["sortBy"], "id");
}

#[tokio::test]
async fn empty_list_reports_one_page() {
    let app = TestApp::new().await;
    let (status, body) = app.call("GET", "/jobs", Some(&app.admin_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));
    assert_eq!(body["meta"]["total"], 0);
    assert_eq!(body["meta"]["pages"], 1);
    assert_eq!(body["meta"]["page"], 1);
    assert_eq!(body["meta"]["limit"], 10);
}

#[tokio::test]
async fn alumni_jobs_listing() {
    let app = TestApp::new().await;
    create_job(&app, app.user1.id).await;
    create_job(&app, app.user2.id).await;

    let (status, body) = app
        .call(
            "GET",
            &format!("/jobs/alumni/{}", app.user1.id),
            Some(&app.admin_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, _) = app
        .call(
            "GET",
            &format!("/jobs/alumni/{}", Uuid::now_v7()),
            Some(&app.admin_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
