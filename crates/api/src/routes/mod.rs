pub mod health;
pub mod layout;
pub mod setup;
pub mod widgets;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// /layout                        get, save
/// /layout/globals                dashboard-wide settings (GET)
/// /widgets                       widget type registry (GET)
/// /setup/{widget}                store widget config (POST)
/// /setup/{widget}/status         widget setup status (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(layout::router())
        .merge(widgets::router())
        .merge(setup::router())
}
