use axum::extract::State;
use axum::Json;
use mirrorboard_core::WidgetType;

use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/widgets
///
/// Every registered widget type, in registration order.
pub async fn list_widgets(State(state): State<AppState>) -> Json<DataResponse<Vec<WidgetType>>> {
    let widgets = state.registry.iter().cloned().collect();
    Json(DataResponse { data: widgets })
}
