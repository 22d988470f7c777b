use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use mirrorboard_core::LayoutError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`LayoutError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `mirrorboard_core`.
    #[error(transparent)]
    Layout(#[from] LayoutError),

    /// Reading or writing the layout file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The named resource does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- LayoutError variants ---
            AppError::Layout(err) => match err {
                LayoutError::UnknownWidgetType(_) => {
                    (StatusCode::NOT_FOUND, "UNKNOWN_WIDGET_TYPE", err.to_string())
                }
                LayoutError::CollisionRejected { .. } => {
                    (StatusCode::BAD_REQUEST, "COLLISION", err.to_string())
                }
                LayoutError::OutOfBounds { .. } => {
                    (StatusCode::BAD_REQUEST, "OUT_OF_BOUNDS", err.to_string())
                }
                LayoutError::PlacementExhausted { .. } => {
                    (StatusCode::CONFLICT, "NO_SPACE", err.to_string())
                }
                LayoutError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
            },

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Io(err) => {
                tracing::error!(error = %err, "Layout file I/O error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
