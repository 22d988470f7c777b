//! Route definitions for the saved dashboard layout.

use axum::routing::get;
use axum::Router;

use crate::handlers::layout;
use crate::state::AppState;

/// Layout routes, merged under `/api`.
///
/// ```text
/// GET  /layout          -> get_layout
/// POST /layout          -> save_layout
/// GET  /layout/globals  -> get_globals
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/layout", get(layout::get_layout).post(layout::save_layout))
        .route("/layout/globals", get(layout::get_globals))
}
