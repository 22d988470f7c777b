//! The layout store: the only thing that mutates a [`DashboardLayout`]
//! while the dashboard is being edited.
//!
//! Every operation either leaves the layout collision-free or leaves it
//! untouched. Edits go through `&mut self`, so they are applied one at a time.

use std::sync::Arc;

use crate::error::LayoutError;
use crate::layout::{instance_id, DashboardLayout, WidgetInstance};
use crate::placement::find_placement;
use crate::position::{GridPosition, WidgetSize};
use crate::registry::WidgetRegistry;
use crate::types::Timestamp;

/// Result of [`LayoutStore::move_widget`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The widget now occupies the requested position.
    Moved,
    /// The requested position equals the current one.
    Unchanged,
    /// No widget with that id exists (it was removed mid-interaction).
    UnknownWidget,
    /// The target overlaps another widget or leaves the grid. The widget
    /// keeps its previous position.
    Rejected(LayoutError),
}

#[derive(Debug)]
pub struct LayoutStore {
    layout: DashboardLayout,
    registry: Arc<WidgetRegistry>,
    dirty: bool,
}

impl LayoutStore {
    /// A store over the default empty board.
    pub fn new(registry: Arc<WidgetRegistry>) -> Self {
        Self {
            layout: DashboardLayout::default(),
            registry,
            dirty: false,
        }
    }

    /// A store over an existing layout, which must satisfy
    /// [`DashboardLayout::validate`].
    pub fn from_layout(
        layout: DashboardLayout,
        registry: Arc<WidgetRegistry>,
    ) -> Result<Self, LayoutError> {
        layout.validate()?;
        Ok(Self {
            layout,
            registry,
            dirty: false,
        })
    }

    pub fn layout(&self) -> &DashboardLayout {
        &self.layout
    }

    pub fn into_layout(self) -> DashboardLayout {
        self.layout
    }

    pub fn registry(&self) -> &WidgetRegistry {
        &self.registry
    }

    /// Whether anything changed since the store was hydrated or last saved.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Record that the current layout has been persisted.
    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    /// Replace the whole layout (hydration). Clears the dirty flag.
    pub fn replace_layout(&mut self, layout: DashboardLayout) -> Result<(), LayoutError> {
        layout.validate()?;
        tracing::debug!(
            widget_count = layout.widgets.len(),
            columns = layout.grid_columns,
            rows = layout.grid_rows,
            "Layout hydrated",
        );
        self.layout = layout;
        self.dirty = false;
        Ok(())
    }

    /// Place a new widget of type `widget_id` at the first free slot.
    ///
    /// The type must be registered. On [`LayoutError::PlacementExhausted`]
    /// the layout is unchanged.
    pub fn add_widget(
        &mut self,
        widget_id: &str,
        size: WidgetSize,
    ) -> Result<&WidgetInstance, LayoutError> {
        self.add_widget_created_at(widget_id, size, chrono::Utc::now())
    }

    /// [`Self::add_widget`] with the type's registered default size.
    pub fn add_widget_with_default_size(
        &mut self,
        widget_id: &str,
    ) -> Result<&WidgetInstance, LayoutError> {
        let size = self.registry.default_size(widget_id)?;
        self.add_widget(widget_id, size)
    }

    /// [`Self::add_widget`] with an explicit creation time, which determines
    /// the instance id.
    pub fn add_widget_created_at(
        &mut self,
        widget_id: &str,
        size: WidgetSize,
        created_at: Timestamp,
    ) -> Result<&WidgetInstance, LayoutError> {
        if !self.registry.contains(widget_id) {
            return Err(LayoutError::UnknownWidgetType(widget_id.to_string()));
        }
        if !size.is_valid() {
            return Err(LayoutError::Validation(format!(
                "Widget size must be at least 1x1, got {}x{}",
                size.width, size.height
            )));
        }

        let Some(position) = find_placement(&self.layout, size.width, size.height) else {
            tracing::warn!(
                widget_type = %widget_id,
                width = size.width,
                height = size.height,
                "No space available for widget",
            );
            return Err(LayoutError::PlacementExhausted {
                widget_id: widget_id.to_string(),
                width: size.width,
                height: size.height,
            });
        };

        let id = instance_id(widget_id, created_at, &self.layout);
        tracing::info!(
            widget_id = %id,
            x = position.x,
            y = position.y,
            width = position.width,
            height = position.height,
            "Widget added",
        );

        self.layout
            .widgets
            .push(WidgetInstance::new(id, widget_id, position));
        self.dirty = true;

        let idx = self.layout.widgets.len() - 1;
        Ok(&self.layout.widgets[idx])
    }

    /// Move (and optionally resize) widget `id` to `new_position`.
    pub fn move_widget(&mut self, id: &str, new_position: GridPosition) -> MoveOutcome {
        let Some(current) = self.layout.widget(id).map(|w| w.position) else {
            tracing::debug!(widget_id = %id, "Ignoring move of unknown widget");
            return MoveOutcome::UnknownWidget;
        };

        if current == new_position {
            return MoveOutcome::Unchanged;
        }

        if !new_position.fits_within(self.layout.grid_columns, self.layout.grid_rows) {
            tracing::debug!(widget_id = %id, ?new_position, "Move rejected: out of bounds");
            return MoveOutcome::Rejected(LayoutError::OutOfBounds {
                id: id.to_string(),
                columns: self.layout.grid_columns,
                rows: self.layout.grid_rows,
            });
        }

        if let Some(other) = self.layout.first_collision(&new_position, Some(id)) {
            tracing::debug!(
                widget_id = %id,
                conflicting_id = %other.id,
                "Move rejected: collision",
            );
            return MoveOutcome::Rejected(LayoutError::CollisionRejected {
                id: id.to_string(),
                conflicting_id: other.id.clone(),
            });
        }

        if let Some(widget) = self.layout.widget_mut(id) {
            widget.position = new_position;
        }
        self.dirty = true;

        tracing::info!(
            widget_id = %id,
            x = new_position.x,
            y = new_position.y,
            "Widget moved",
        );
        MoveOutcome::Moved
    }

    /// Remove widget `id`. Returns `false` if it was not present.
    pub fn remove_widget(&mut self, id: &str) -> bool {
        let before = self.layout.widgets.len();
        self.layout.widgets.retain(|w| w.id != id);
        let removed = self.layout.widgets.len() != before;

        if removed {
            self.dirty = true;
            tracing::info!(widget_id = %id, "Widget removed");
        }
        removed
    }

    /// Change the grid dimensions. Fails, leaving the grid as it was, if any
    /// widget would end up outside the new bounds.
    pub fn resize_grid(&mut self, columns: u32, rows: u32) -> Result<(), LayoutError> {
        if columns == 0 || rows == 0 {
            return Err(LayoutError::Validation(format!(
                "Grid must be at least 1x1, got {columns}x{rows}"
            )));
        }

        if let Some(outside) = self
            .layout
            .widgets
            .iter()
            .find(|w| !w.position.fits_within(columns, rows))
        {
            return Err(LayoutError::OutOfBounds {
                id: outside.id.clone(),
                columns,
                rows,
            });
        }

        if (columns, rows) != (self.layout.grid_columns, self.layout.grid_rows) {
            self.layout.grid_columns = columns;
            self.layout.grid_rows = rows;
            self.dirty = true;
            tracing::info!(columns, rows, "Grid resized");
        }
        Ok(())
    }
}
