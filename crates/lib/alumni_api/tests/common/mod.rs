//! Shared fixture for router integration tests: an in-memory store with one
//! admin and two regular alumni, and a temporary upload directory.

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use alumni_api::{AppState, config::ApiConfig};
use alumni_core::auth::password::hash_password;
use alumni_core::models::{Alumni, NewAlumni};
use alumni_core::seed::ensure_roles;
use alumni_core::store::Store;

pub const SECRET: &str = "integration-test-secret-0123456789abcdef";
pub const PASSWORD: &str = "rahasia123";
pub const API_KEY: &str = "check-key-42";

pub struct TestApp {
    pub state: AppState,
    pub uploads: TempDir,
    pub admin: Alumni,
    pub user1: Alumni,
    pub user2: Alumni,
    pub admin_token: String,
    pub user1_token: String,
    pub user2_token: String,
}

impl TestApp {
    pub async fn new() -> Self {
        let uploads = tempfile::tempdir().unwrap();
        let store = Store::memory();
        let roles = ensure_roles(&store).await.unwrap();
        let hash = hash_password(PASSWORD).unwrap();

        let mut people = Vec::new();
        for (n, role_id) in [(0, roles.admin.id), (1, roles.user.id), (2, roles.user.id)] {
            let a = store
                .alumni
                .create(NewAlumni {
                    student_number: format!("43422000{n}"),
                    name: format!("Alumni {n}"),
                    major: "Teknik Informatika".into(),
                    entry_year: 2018,
                    graduation_year: 2022,
                    email: format!("alumni{n}@example.com"),
                    password_hash: hash.clone(),
                    phone: None,
                    address: None,
                    role_id,
                })
                .await
                .unwrap();
            people.push(a);
        }

        let config = ApiConfig::new("127.0.0.1:0", SECRET)
            .with_api_key(Some(API_KEY.into()))
            .with_upload_dir(uploads.path());
        let state = AppState::new(store, config).unwrap();
        let token = |a: &Alumni| state.tokens.issue(a.id, &a.email, &a.role).unwrap();
        let admin_token = token(&people[0]);
        let user1_token = token(&people[1]);
        let user2_token = token(&people[2]);
        let mut people = people.into_iter();
        Self {
            admin: people.next().unwrap(),
            user1: people.next().unwrap(),
            user2: people.next().unwrap(),
            admin_token,
            user1_token,
            user2_token,
            state,
            uploads,
        }
    }

    pub fn router(&self) -> Router {
        alumni_api::router(self.state.clone())
    }

    /// Send a request and decode the JSON body (`Null` when empty).
    pub async fn send(&self, req: Request<Body>) -> (StatusCode, Value) {
        let resp = self.router().oneshot(req).await.unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap()
        };
        (status, json)
    }

    pub async fn call(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        self.send(json_request(method, uri, token, body)).await
    }
}

pub fn json_request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(t) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {t}"));
    }
    match body {
        Some(v) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(v.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

const BOUNDARY: &str = "alumni-test-boundary";

/// A multipart upload with an `alumni_id` field and a `file` field.
pub fn multipart_request(
    uri: &str,
    token: &str,
    alumni_id: &str,
    file_name: &str,
    content_type: &str,
    bytes: &[u8],
) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"alumni_id\"\r\n\r\n{alumni_id}\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

/// Every regular file under `dir`, recursively.
pub fn files_under(dir: &std::path::Path) -> Vec<std::path::PathBuf> {
    let mut out = Vec::new();
    let Ok(entries) = std::fs::read_dir(dir) else {
        return out;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            out.extend(files_under(&path));
        } else {
            out.push(path);
        }
    }
    out
}
