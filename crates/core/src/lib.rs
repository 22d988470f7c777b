//! Dashboard grid layout engine.
//!
//! Pure, I/O-free building blocks shared by the backend (`mirrorboard-api`)
//! and the edit-session client (`mirrorboard-client`): the layout data model,
//! collision detection, first-fit placement, pixel-to-cell snapping, the
//! layout store and the drag controller.

pub mod drag;
pub mod error;
pub mod geometry;
pub mod globals;
pub mod layout;
pub mod placement;
pub mod position;
pub mod registry;
pub mod store;
pub mod types;

pub use drag::{DragController, DropOutcome, PointerTarget};
pub use error::LayoutError;
pub use geometry::{GeometryProvider, GridMetrics, Point};
pub use globals::DashboardGlobals;
pub use layout::{DashboardLayout, WidgetConfig, WidgetInstance};
pub use position::{GridPosition, WidgetSize};
pub use registry::{SetupStatus, WidgetRegistry, WidgetType};
pub use store::{LayoutStore, MoveOutcome};
