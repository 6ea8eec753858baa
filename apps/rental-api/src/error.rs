//! # API Error Types
//!
//! Every failure leaves the handlers as an [`ApiError`] and is rendered
//! with an `errors` key.
//!
//! ## Response Mapping
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  RentalError::NotFound          → 404 ["Not Found"]                    │
//! │  RentalError::Validation        → 400 {record: {field: [message]}}     │
//! │  malformed request body         → 400 ["Bad Request"]                  │
//! │  StoreError::Conflict / Missing → 409 ["Conflict"]                     │
//! │  StoreError::Unavailable        → 503 ["Service Unavailable"]          │
//! │  StoreError::Backend            → 500 ["Internal Server Error"]        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Internal details are logged, never rendered.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::{error, warn};

use reel_core::{RentalError, StoreError, ValidationErrors, NOT_FOUND_MESSAGE};

/// Errors returned by the HTTP handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Not Found")]
    NotFound,

    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<RentalError> for ApiError {
    fn from(err: RentalError) -> Self {
        match err {
            RentalError::NotFound { .. } => ApiError::NotFound,
            RentalError::Validation(errors) => ApiError::Validation(errors),
            RentalError::Store(store) => match store {
                StoreError::Conflict { .. } | StoreError::Missing { .. } => {
                    ApiError::Conflict(store.to_string())
                }
                StoreError::Unavailable(msg) => ApiError::Unavailable(msg),
                StoreError::Backend(msg) => ApiError::Internal(msg),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match &self {
            ApiError::NotFound => json!({ "errors": [NOT_FOUND_MESSAGE] }),
            ApiError::Validation(errors) => json!({ "errors": errors }),
            ApiError::BadRequest(detail) => {
                warn!(detail = %detail, "Malformed request");
                json!({ "errors": ["Bad Request"] })
            }
            ApiError::Conflict(detail) => {
                warn!(detail = %detail, "Concurrent modification");
                json!({ "errors": ["Conflict"] })
            }
            ApiError::Unavailable(detail) => {
                error!(detail = %detail, "Store unavailable");
                json!({ "errors": ["Service Unavailable"] })
            }
            ApiError::Internal(detail) => {
                error!(detail = %detail, "Internal error");
                json!({ "errors": ["Internal Server Error"] })
            }
        };

        (status, Json(body)).into_response()
    }
}
