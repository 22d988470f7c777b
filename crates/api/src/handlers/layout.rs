//! Handlers for the saved dashboard layout.

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use mirrorboard_core::{DashboardGlobals, DashboardLayout};

use crate::error::{AppError, AppResult};
use crate::response::{DataResponse, SuccessResponse};
use crate::state::AppState;

/// GET /api/layout
///
/// The saved layout, or the default empty 6x4 board if none was saved.
pub async fn get_layout(State(state): State<AppState>) -> AppResult<Json<DashboardLayout>> {
    Ok(Json(state.layout.current().await))
}

/// POST /api/layout
///
/// Replace the saved layout. The body must be a valid layout: positive grid
/// size, unique ids, every widget inside the grid and no overlaps.
///
/// Stored settings survive a save that leaves them out: a missing `global`
/// keeps the stored one, and a widget without `config` keeps the stored
/// config of its type.
pub async fn save_layout(
    State(state): State<AppState>,
    body: Bytes,
) -> AppResult<Json<SuccessResponse>> {
    let mut layout: DashboardLayout = serde_json::from_slice(&body)
        .map_err(|e| AppError::BadRequest(format!("Invalid layout JSON: {e}")))?;
    layout.validate()?;

    if layout.last_modified.is_empty() {
        layout.touch(chrono::Utc::now());
    }

    let saved = state
        .layout
        .update(|stored| {
            layout.carry_over(stored);
            *stored = layout;
            Ok(())
        })
        .await?;

    tracing::info!(
        widget_count = saved.widgets.len(),
        columns = saved.grid_columns,
        rows = saved.grid_rows,
        "Layout saved",
    );

    Ok(Json(SuccessResponse {
        success: true,
        message: "Layout saved successfully",
    }))
}

/// GET /api/layout/globals
///
/// Dashboard-wide settings with defaults filled in. The grid size is the
/// saved layout's.
pub async fn get_globals(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<DashboardGlobals>>> {
    let layout = state.layout.current().await;
    let timezone = state.env.timezone();
    let globals = DashboardGlobals::for_layout(&layout, timezone.as_deref())?;

    Ok(Json(DataResponse { data: globals }))
}
