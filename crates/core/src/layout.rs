//! Persisted dashboard layout format.
//!
//! Field names follow the JSON shape served at `/api/layout`:
//! `{version, gridColumns, gridRows, widgets: [{id, widgetId, position, config}],
//! lastModified, global}`.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::LayoutError;
use crate::position::GridPosition;
use crate::types::{format_timestamp, Timestamp};

/// Layout format version written by this crate.
pub const LAYOUT_VERSION: &str = "1.0";

/// Grid width used when nothing has been saved yet.
pub const DEFAULT_GRID_COLUMNS: u32 = 6;

/// Grid height used when nothing has been saved yet.
pub const DEFAULT_GRID_ROWS: u32 = 4;

/// Widget-specific settings. Opaque to the grid engine.
pub type WidgetConfig = serde_json::Map<String, serde_json::Value>;

/// One placed widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetInstance {
    /// Unique within the layout.
    pub id: String,
    /// Widget type, a weak reference into the [`crate::registry::WidgetRegistry`].
    pub widget_id: String,
    pub position: GridPosition,
    #[serde(default, skip_serializing_if = "WidgetConfig::is_empty")]
    pub config: WidgetConfig,
}

impl WidgetInstance {
    pub fn new(id: impl Into<String>, widget_id: impl Into<String>, position: GridPosition) -> Self {
        Self {
            id: id.into(),
            widget_id: widget_id.into(),
            position,
            config: WidgetConfig::new(),
        }
    }

    pub fn with_config(mut self, config: WidgetConfig) -> Self {
        self.config = config;
        self
    }
}

/// The full dashboard: grid dimensions plus placed widgets.
///
/// Invariant: no two widgets' rectangles overlap. [`DashboardLayout::validate`]
/// checks it; [`crate::store::LayoutStore`] maintains it during editing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardLayout {
    pub version: String,
    pub grid_columns: u32,
    pub grid_rows: u32,
    #[serde(default)]
    pub widgets: Vec<WidgetInstance>,
    /// RFC 3339 timestamp of the last save. Empty when never saved.
    #[serde(default)]
    pub last_modified: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global: Option<serde_json::Map<String, serde_json::Value>>,
}

impl Default for DashboardLayout {
    /// An empty 6x4 board, stamped now.
    fn default() -> Self {
        let mut layout = Self::empty(DEFAULT_GRID_COLUMNS, DEFAULT_GRID_ROWS);
        layout.touch(chrono::Utc::now());
        layout
    }
}

impl DashboardLayout {
    /// An empty board of the given size with no timestamp.
    pub fn empty(grid_columns: u32, grid_rows: u32) -> Self {
        Self {
            version: LAYOUT_VERSION.to_string(),
            grid_columns,
            grid_rows,
            widgets: Vec::new(),
            last_modified: String::new(),
            global: None,
        }
    }

    /// Stamp `lastModified`.
    pub fn touch(&mut self, now: Timestamp) {
        self.last_modified = format_timestamp(now);
    }

    pub fn widget(&self, id: &str) -> Option<&WidgetInstance> {
        self.widgets.iter().find(|w| w.id == id)
    }

    pub fn widget_mut(&mut self, id: &str) -> Option<&mut WidgetInstance> {
        self.widgets.iter_mut().find(|w| w.id == id)
    }

    pub fn contains_widget(&self, id: &str) -> bool {
        self.widget(id).is_some()
    }

    /// First widget (in list order) whose rectangle overlaps `candidate`,
    /// skipping the widget with id `ignore`.
    pub fn first_collision(
        &self,
        candidate: &GridPosition,
        ignore: Option<&str>,
    ) -> Option<&WidgetInstance> {
        self.widgets
            .iter()
            .filter(|w| Some(w.id.as_str()) != ignore)
            .find(|w| w.position.overlaps(candidate))
    }

    /// Whether `candidate` is free of every widget except `ignore`.
    pub fn is_free(&self, candidate: &GridPosition, ignore: Option<&str>) -> bool {
        self.first_collision(candidate, ignore).is_none()
    }

    /// Fill in what a save leaves out, taking it from the layout it replaces.
    ///
    /// A missing `global` map keeps the stored one. A widget posted without
    /// config takes the stored config of the same widget type. The grid size
    /// kept in `global` is then synced to `gridColumns`/`gridRows`.
    pub fn carry_over(&mut self, previous: &DashboardLayout) {
        if self.global.is_none() {
            self.global = previous.global.clone();
        }

        for widget in self.widgets.iter_mut().filter(|w| w.config.is_empty()) {
            let stored = previous
                .widgets
                .iter()
                .find(|p| p.widget_id == widget.widget_id && !p.config.is_empty());
            if let Some(stored) = stored {
                widget.config = stored.config.clone();
            }
        }

        if let Some(global) = self.global.as_mut() {
            global.insert("grid_columns".to_string(), self.grid_columns.into());
            global.insert("grid_rows".to_string(), self.grid_rows.into());
        }
    }

    /// Check dimensions, bounds, id uniqueness and the no-overlap invariant.
    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.grid_columns == 0 || self.grid_rows == 0 {
            return Err(LayoutError::Validation(format!(
                "Grid must be at least 1x1, got {}x{}",
                self.grid_columns, self.grid_rows
            )));
        }

        let mut seen = HashSet::with_capacity(self.widgets.len());
        for (idx, widget) in self.widgets.iter().enumerate() {
            if widget.id.is_empty() {
                return Err(LayoutError::Validation(format!(
                    "Widget at index {idx} has an empty id"
                )));
            }
            if !seen.insert(widget.id.as_str()) {
                return Err(LayoutError::Validation(format!(
                    "Duplicate widget id '{}'",
                    widget.id
                )));
            }
            if !widget.position.size().is_valid() {
                return Err(LayoutError::Validation(format!(
                    "Widget '{}' must span at least one cell",
                    widget.id
                )));
            }
            if !widget.position.fits_within(self.grid_columns, self.grid_rows) {
                return Err(LayoutError::OutOfBounds {
                    id: widget.id.clone(),
                    columns: self.grid_columns,
                    rows: self.grid_rows,
                });
            }
            if let Some(other) = self.widgets[..idx]
                .iter()
                .find(|other| other.position.overlaps(&widget.position))
            {
                return Err(LayoutError::CollisionRejected {
                    id: widget.id.clone(),
                    conflicting_id: other.id.clone(),
                });
            }
        }

        Ok(())
    }
}

/// Build a unique instance id of the form `{widget_id}-{millis}`.
///
/// When the id is already taken (two adds within the same millisecond) the
/// timestamp is bumped until it is unique.
pub fn instance_id(widget_id: &str, created_at: Timestamp, layout: &DashboardLayout) -> String {
    let mut millis = created_at.timestamp_millis();
    loop {
        let candidate = format!("{widget_id}-{millis}");
        if !layout.contains_widget(&candidate) {
            return candidate;
        }
        millis += 1;
    }
}
