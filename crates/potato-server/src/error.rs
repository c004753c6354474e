//! HTTP error types for potato.
//!
//! Maps domain errors from `potato-core` into plain-text HTTP responses.

use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};

use potato_core::PasteError;

/// Realm announced in `WWW-Authenticate` challenges.
pub const AUTH_REALM: &str = "Restricted";

/// Application-level error returned from HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Unknown or malformed paste identifier.
    NotFound,
    /// Missing or wrong basic-auth credentials.
    Unauthorized,
    /// Internal server error; the message is returned to the client.
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound => (StatusCode::NOT_FOUND, "Not found").into_response(),
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                [(
                    header::WWW_AUTHENTICATE,
                    format!("Basic realm=\"{AUTH_REALM}\""),
                )],
                "Unauthorized",
            )
                .into_response(),
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, msg).into_response()
            }
        }
    }
}

impl From<PasteError> for AppError {
    fn from(err: PasteError) -> Self {
        match err {
            PasteError::NotFound => Self::NotFound,
            PasteError::Exhausted { .. } | PasteError::Storage(_) => {
                Self::Internal(err.to_string())
            }
        }
    }
}

impl From<askama::Error> for AppError {
    fn from(err: askama::Error) -> Self {
        Self::Internal(format!("template rendering failed: {err}"))
    }
}
