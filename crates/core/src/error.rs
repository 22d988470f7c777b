/// Errors raised by the layout engine.
///
/// Stale references (moving or removing a widget that is already gone) are
/// not errors; see [`crate::store::MoveOutcome::UnknownWidget`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[error("No space available for a {width}x{height} '{widget_id}' widget")]
    PlacementExhausted {
        widget_id: String,
        width: u32,
        height: u32,
    },

    #[error("Widget '{id}' would overlap widget '{conflicting_id}'")]
    CollisionRejected { id: String, conflicting_id: String },

    #[error("Unknown widget type: {0}")]
    UnknownWidgetType(String),

    #[error("Widget '{id}' does not fit within a {columns}x{rows} grid")]
    OutOfBounds { id: String, columns: u32, rows: u32 },

    #[error("Validation failed: {0}")]
    Validation(String),
}
