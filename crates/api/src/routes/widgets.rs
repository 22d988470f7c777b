use axum::routing::get;
use axum::Router;

use crate::handlers::widgets;
use crate::state::AppState;

/// Widget registry routes, merged under `/api`.
///
/// ```text
/// GET /widgets  -> list_widgets
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/widgets", get(widgets::list_widgets))
}
