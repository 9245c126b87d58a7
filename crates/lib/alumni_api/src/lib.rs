//! # alumni_api
//!
//! HTTP API library for the alumni records service.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod services;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post, put};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use alumni_core::auth::AuthError;
use alumni_core::auth::jwt::TokenService;
use alumni_core::store::Store;
use alumni_core::uploads::FileStorage;

use crate::config::ApiConfig;
use crate::handlers::{alumni, auth, files, jobs, roles};
use crate::middleware::auth::{require_admin, require_auth, require_user_or_admin};

/// Body limit for upload routes. Per-category limits are enforced by the
/// handler, so this only has to sit above the largest of them.
pub const UPLOAD_BODY_LIMIT: usize = 10 * 1024 * 1024;

/// Shared application state passed to all handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Record store (PostgreSQL, MongoDB or in-memory).
    pub store: Store,
    /// API configuration.
    pub config: ApiConfig,
    /// Access token issuer/verifier built from `config.jwt_secret`.
    pub tokens: TokenService,
    /// Upload directory.
    pub storage: FileStorage,
}

impl AppState {
    /// Build the state. Fails when the JWT secret is too short.
    pub fn new(store: Store, config: ApiConfig) -> Result<Self, AuthError> {
        let tokens = TokenService::new(&config.jwt_secret)?;
        let storage = FileStorage::new(config.upload_dir.clone());
        Ok(Self {
            store,
            config,
            tokens,
            storage,
        })
    }
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Public routes (no auth required)
    let public = Router::new()
        .route("/login", post(auth::login_handler))
        .route("/alumni/check/{key}", post(auth::check_alumni_handler));

    // Any authenticated caller; ownership is checked per handler
    let authenticated = Router::new()
        .route("/profile", get(auth::profile_handler))
        .route(
            "/files/alumni/{alumni_id}",
            get(files::list_alumni_files_handler),
        )
        .route(
            "/files/upload/foto",
            post(files::upload_photo_handler).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route(
            "/files/upload/sertifikat",
            post(files::upload_certificate_handler)
                .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        );

    let user_or_admin = Router::new()
        .route("/alumni", get(alumni::list_alumni_handler))
        .route("/alumni/{id}", get(alumni::get_alumni_handler))
        .route("/roles", get(roles::list_roles_handler))
        .route("/roles/{id}", get(roles::get_role_handler))
        .route("/jobs", get(jobs::list_jobs_handler))
        .route("/jobs/trash", get(jobs::trash_jobs_handler))
        .route("/jobs/{id}", get(jobs::get_job_handler))
        .route("/jobs/{id}/soft-delete", put(jobs::soft_delete_job_handler))
        .route("/jobs/{id}/restore", put(jobs::restore_job_handler))
        .route("/files", get(files::list_files_handler))
        .route("/files/{id}", get(files::get_file_handler))
        .route_layer(axum::middleware::from_fn(require_user_or_admin));

    let admin = Router::new()
        .route("/alumni", post(alumni::create_alumni_handler))
        .route(
            "/alumni/{id}",
            put(alumni::update_alumni_handler).delete(alumni::delete_alumni_handler),
        )
        .route("/roles", post(roles::create_role_handler))
        .route(
            "/roles/{id}",
            put(roles::update_role_handler).delete(roles::delete_role_handler),
        )
        .route("/jobs", post(jobs::create_job_handler))
        .route(
            "/jobs/{id}",
            put(jobs::update_job_handler).delete(jobs::delete_job_handler),
        )
        .route(
            "/jobs/alumni/{alumni_id}",
            get(jobs::list_alumni_jobs_handler),
        )
        .route("/files/{id}", delete(files::delete_file_handler))
        .route_layer(axum::middleware::from_fn(require_admin));

    // Protected routes (require auth)
    let protected = Router::new()
        .merge(authenticated)
        .merge(user_or_admin)
        .merge(admin)
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
