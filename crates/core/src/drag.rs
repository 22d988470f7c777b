//! Pointer-driven drag of a single widget.
//!
//! `Idle -> Dragging -> Idle`. While dragging, pointer moves produce a
//! snapped preview cell but never touch the layout; the drop commits through
//! [`LayoutStore::move_widget`], which may reject it. Pointer-up is the only
//! way out of a drag.

use crate::error::LayoutError;
use crate::geometry::{resolve_cell, GeometryProvider, Point};
use crate::layout::{DashboardLayout, WidgetInstance};
use crate::position::GridPosition;
use crate::store::{LayoutStore, MoveOutcome};

/// What the pointer went down on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    /// The widget body; may start a drag.
    Surface,
    /// A control inside the widget (button, input, select, textarea, link).
    /// Never starts a drag, so the control keeps working in edit mode.
    Interactive,
}

impl PointerTarget {
    /// Classify an element by its tag name.
    pub fn from_tag(tag: &str) -> Self {
        match tag.to_ascii_lowercase().as_str() {
            "button" | "input" | "select" | "textarea" | "a" => Self::Interactive,
            _ => Self::Surface,
        }
    }
}

/// An in-progress drag.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveDrag {
    pub widget_id: String,
    /// Pointer position minus the widget's top-left corner at pointer-down.
    pub grab_offset: Point,
    /// Position of the widget when the drag started.
    pub start_position: GridPosition,
    /// Most recent snapped cell, for the drop preview.
    pub preview: Option<GridPosition>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(ActiveDrag),
}

/// Result of releasing the pointer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// No drag was in progress.
    NotDragging,
    /// The widget now sits at this position.
    Moved(GridPosition),
    /// Dropped on its own cell.
    Unchanged,
    /// The dragged widget disappeared during the drag.
    WidgetGone,
    /// The store refused the move; the widget snaps back.
    Rejected(LayoutError),
}

#[derive(Debug, Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    /// Id of the widget being dragged, if any.
    pub fn dragged_widget(&self) -> Option<&str> {
        match &self.state {
            DragState::Dragging(drag) => Some(drag.widget_id.as_str()),
            DragState::Idle => None,
        }
    }

    /// Begin dragging `widget`. Returns whether a drag started.
    ///
    /// `widget_origin` is the widget's rendered top-left corner in the same
    /// coordinate space as `pointer`. Outside edit mode, on an interactive
    /// target, or while another drag is active this does nothing.
    pub fn pointer_down(
        &mut self,
        widget: &WidgetInstance,
        pointer: Point,
        widget_origin: Point,
        target: PointerTarget,
        edit_mode: bool,
    ) -> bool {
        if !edit_mode || target == PointerTarget::Interactive || self.is_dragging() {
            return false;
        }

        tracing::debug!(widget_id = %widget.id, "Drag started");
        self.state = DragState::Dragging(ActiveDrag {
            widget_id: widget.id.clone(),
            grab_offset: pointer - widget_origin,
            start_position: widget.position,
            preview: None,
        });
        true
    }

    /// Update the preview cell for the current pointer position.
    ///
    /// Re-measures the grid on every call. Returns `None` when idle.
    pub fn pointer_move(
        &mut self,
        pointer: Point,
        provider: &dyn GeometryProvider,
        layout: &DashboardLayout,
    ) -> Option<GridPosition> {
        let DragState::Dragging(drag) = &mut self.state else {
            return None;
        };

        let position = snapped_position(drag, pointer, provider, layout);
        drag.preview = Some(position);
        Some(position)
    }

    /// Finish the drag and commit the snapped position to `store`.
    ///
    /// Always returns the controller to idle.
    pub fn pointer_up(
        &mut self,
        pointer: Point,
        provider: &dyn GeometryProvider,
        store: &mut LayoutStore,
    ) -> DropOutcome {
        let DragState::Dragging(drag) = std::mem::take(&mut self.state) else {
            return DropOutcome::NotDragging;
        };

        let position = snapped_position(&drag, pointer, provider, store.layout());

        match store.move_widget(&drag.widget_id, position) {
            MoveOutcome::Moved => DropOutcome::Moved(position),
            MoveOutcome::Unchanged => DropOutcome::Unchanged,
            MoveOutcome::UnknownWidget => DropOutcome::WidgetGone,
            MoveOutcome::Rejected(err) => {
                tracing::debug!(widget_id = %drag.widget_id, error = %err, "Drop rejected");
                DropOutcome::Rejected(err)
            }
        }
    }
}

fn snapped_position(
    drag: &ActiveDrag,
    pointer: Point,
    provider: &dyn GeometryProvider,
    layout: &DashboardLayout,
) -> GridPosition {
    // The widget may have been resized since pointer-down.
    let size = layout
        .widget(&drag.widget_id)
        .map(|w| w.position.size())
        .unwrap_or_else(|| drag.start_position.size());

    let metrics = provider.measure();
    let (col, row) = resolve_cell(
        pointer - drag.grab_offset,
        &metrics,
        layout.grid_columns,
        layout.grid_rows,
        size.width,
        size.height,
    );
    GridPosition::at(col, row, size)
}
