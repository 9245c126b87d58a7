//! The JSON response envelope: `{success, message, data?, meta?}`.

use alumni_core::listing::PageMeta;
use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<PageMeta>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Successful response carrying `data`.
    pub fn ok(message: impl Into<String>, data: T) -> Json<Self> {
        Json(Self {
            success: true,
            message: message.into(),
            data: Some(data),
            meta: None,
        })
    }

    /// Successful paginated response.
    pub fn page(message: impl Into<String>, data: T, meta: PageMeta) -> Json<Self> {
        Json(Self {
            success: true,
            message: message.into(),
            data: Some(data),
            meta: Some(meta),
        })
    }
}

impl ApiResponse<()> {
    /// Successful response without data.
    pub fn done(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            success: true,
            message: message.into(),
            data: None,
            meta: None,
        })
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            meta: None,
        }
    }
}
