use axum::routing::{get, post};
use axum::Router;

use crate::handlers::setup;
use crate::state::AppState;

/// Widget setup routes, merged under `/api`.
///
/// ```text
/// POST /setup/{widget}         -> configure_widget
/// GET  /setup/{widget}/status  -> get_setup_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/setup/{widget}", post(setup::configure_widget))
        .route("/setup/{widget}/status", get(setup::get_setup_status))
}
