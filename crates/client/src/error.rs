use mirrorboard_core::LayoutError;

/// Errors from the layout backend transport.
///
/// Callers of [`crate::LayoutPersistence`] never see these; load falls back to
/// the default layout and save reports `false`. They surface from
/// [`crate::LayoutBackend`] implementations and are logged.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    /// The HTTP request itself failed (network, DNS, timeout, decode).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend returned a non-2xx status code.
    #[error("Backend API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The backend returned a layout that breaks the layout invariants.
    #[error("Invalid layout from backend: {0}")]
    InvalidLayout(#[from] LayoutError),
}

/// Pass successful responses through; turn anything else into
/// [`PersistenceError::Api`] with the body text.
pub(crate) async fn ensure_success(
    response: reqwest::Response,
) -> Result<reqwest::Response, PersistenceError> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        return Err(PersistenceError::Api {
            status: status.as_u16(),
            body,
        });
    }
    Ok(response)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use axum::http;

    use super::*;

    fn response(status: u16, body: &'static str) -> reqwest::Response {
        http::Response::builder()
            .status(status)
            .body(body)
            .unwrap()
            .into()
    }

    #[tokio::test]
    async fn success_passes_through() {
        let response = ensure_success(response(200, "{}")).await.unwrap();
        assert_eq!(response.status(), 200);
    }

    #[tokio::test]
    async fn error_status_keeps_body() {
        let err = ensure_success(response(503, "maintenance")).await.unwrap_err();
        assert_matches!(
            err,
            PersistenceError::Api { status: 503, ref body } if body == "maintenance"
        );
    }
}
