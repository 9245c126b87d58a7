//! API server configuration.

use std::path::PathBuf;

/// Configuration for the API server.
///
/// | Variable     | Meaning                                          | Default     |
/// |--------------|--------------------------------------------------|-------------|
/// | `BIND_HOST`  | Listener host                                    | `0.0.0.0`   |
/// | `APP_PORT`   | Listener port                                    | `3000`      |
/// | `JWT_SECRET` | HS256 signing secret, at least 32 characters     | required    |
/// | `API_KEY`    | Key for `POST /alumni/check/{key}`               | unset (off) |
/// | `UPLOAD_DIR` | Root directory for uploaded files                | `uploads`   |
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "0.0.0.0:3000").
    pub bind_addr: String,
    /// JWT signing secret.
    pub jwt_secret: String,
    /// Shared key for the alumni check endpoint. `None` disables it.
    pub api_key: Option<String>,
    /// Root directory for uploads.
    pub upload_dir: PathBuf,
}

impl ApiConfig {
    pub fn new(bind_addr: impl Into<String>, jwt_secret: impl Into<String>) -> Self {
        Self {
            bind_addr: bind_addr.into(),
            jwt_secret: jwt_secret.into(),
            api_key: None,
            upload_dir: PathBuf::from("uploads"),
        }
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key.filter(|k| !k.trim().is_empty());
        self
    }

    pub fn with_upload_dir(mut self, upload_dir: impl Into<PathBuf>) -> Self {
        self.upload_dir = upload_dir.into();
        self
    }
}
