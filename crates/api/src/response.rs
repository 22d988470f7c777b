//! Shared response types for API handlers.
//!
//! Listing endpoints use a `{ "data": ... }` envelope. The layout and setup
//! status endpoints return their payload bare, since the dashboard client
//! reads those shapes directly.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// Acknowledgement returned by write endpoints.
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
    pub message: &'static str,
}
