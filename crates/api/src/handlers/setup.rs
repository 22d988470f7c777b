//! Handlers for widget setup: status checks and storing widget config.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::Json;
use mirrorboard_core::{DashboardLayout, LayoutError, SetupStatus, WidgetConfig, WidgetType};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /api/setup/{widget}/status
///
/// Whether widget type `widget` has its required config keys (taken from the
/// first instance of that type in the saved layout) and environment
/// variables. Unknown types are 404.
pub async fn get_setup_status(
    State(state): State<AppState>,
    Path(widget): Path<String>,
) -> AppResult<Json<SetupStatus>> {
    let widget_type = lookup(&state, &widget)?;
    let layout = state.layout.current().await;
    let status = status_for(&state, widget_type, &layout);

    tracing::debug!(
        widget_type = %widget,
        configured = status.configured,
        missing = ?status.missing,
        "Setup status checked",
    );

    Ok(Json(status))
}

/// POST /api/setup/{widget}
///
/// Store config values for every instance of widget type `widget`. The body
/// is a JSON object that must carry every required config key; keys the type
/// does not declare are dropped. Responds with the resulting setup status.
///
/// 400 lists the missing keys, 404 when the type is unknown or has no
/// instance on the dashboard.
pub async fn configure_widget(
    State(state): State<AppState>,
    Path(widget): Path<String>,
    body: Bytes,
) -> AppResult<Json<SetupStatus>> {
    let widget_type = lookup(&state, &widget)?;

    let values: WidgetConfig = serde_json::from_slice(&body)
        .map_err(|e| AppError::BadRequest(format!("Invalid setup JSON: {e}")))?;

    let missing = widget_type.missing_config(&values);
    if !missing.is_empty() {
        return Err(AppError::BadRequest(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )));
    }

    let values: WidgetConfig = values
        .into_iter()
        .filter(|(key, _)| widget_type.accepts_config_key(key))
        .collect();

    let layout = state
        .layout
        .update(|layout| {
            let mut instances = layout
                .widgets
                .iter_mut()
                .filter(|w| w.widget_id == widget)
                .peekable();
            if instances.peek().is_none() {
                return Err(AppError::NotFound(format!(
                    "No '{widget}' widget on the dashboard"
                )));
            }
            for instance in instances {
                instance.config.extend(values.clone());
            }
            layout.touch(chrono::Utc::now());
            Ok(())
        })
        .await?;

    let status = status_for(&state, widget_type, &layout);
    tracing::info!(
        widget_type = %widget,
        keys = ?values.keys().collect::<Vec<_>>(),
        configured = status.configured,
        "Widget configured",
    );

    Ok(Json(status))
}

fn lookup<'a>(state: &'a AppState, widget: &str) -> AppResult<&'a WidgetType> {
    state
        .registry
        .get(widget)
        .ok_or_else(|| LayoutError::UnknownWidgetType(widget.to_string()).into())
}

fn status_for(state: &AppState, widget_type: &WidgetType, layout: &DashboardLayout) -> SetupStatus {
    let config = layout
        .widgets
        .iter()
        .find(|w| w.widget_id == widget_type.id)
        .map(|w| w.config.clone())
        .unwrap_or_default();

    widget_type.setup_status(&config, |key| state.env.is_set(key))
}
