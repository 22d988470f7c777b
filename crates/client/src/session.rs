//! One dashboard editing session.
//!
//! Owns the layout store and the drag controller, hydrates from the backend,
//! and saves when edit mode is switched off with unsaved changes.

use std::sync::Arc;

use mirrorboard_core::drag::{DragController, DropOutcome, PointerTarget};
use mirrorboard_core::geometry::{GeometryProvider, Point};
use mirrorboard_core::{
    DashboardLayout, GridPosition, LayoutError, LayoutStore, WidgetInstance, WidgetRegistry,
    WidgetSize,
};

use crate::persistence::{LayoutBackend, LayoutPersistence, RequestSequencer, RequestTicket};

/// A load issued by [`EditSession::hydrate_request`], detached from the
/// session so several can be in flight.
pub struct HydrateRequest<B> {
    ticket: RequestTicket,
    persistence: Arc<LayoutPersistence<B>>,
}

impl<B: LayoutBackend> HydrateRequest<B> {
    pub async fn run(self) -> HydrateResponse {
        HydrateResponse {
            ticket: self.ticket,
            layout: self.persistence.load().await,
        }
    }
}

/// A completed load, ready for [`EditSession::apply_hydrate`].
pub struct HydrateResponse {
    ticket: RequestTicket,
    layout: DashboardLayout,
}

pub struct EditSession<B> {
    persistence: Arc<LayoutPersistence<B>>,
    sequencer: RequestSequencer,
    store: LayoutStore,
    drag: DragController,
    edit_mode: bool,
}

impl<B: LayoutBackend> EditSession<B> {
    /// A session over the default board. Call [`Self::hydrate`] to load the
    /// saved layout.
    pub fn new(persistence: LayoutPersistence<B>, registry: Arc<WidgetRegistry>) -> Self {
        Self {
            persistence: Arc::new(persistence),
            sequencer: RequestSequencer::new(),
            store: LayoutStore::new(registry),
            drag: DragController::new(),
            edit_mode: false,
        }
    }

    pub fn layout(&self) -> &DashboardLayout {
        self.store.layout()
    }

    pub fn store(&self) -> &LayoutStore {
        &self.store
    }

    pub fn drag(&self) -> &DragController {
        &self.drag
    }

    pub fn is_edit_mode(&self) -> bool {
        self.edit_mode
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.store.is_dirty()
    }

    // -----------------------------------------------------------------------
    // Hydration
    // -----------------------------------------------------------------------

    /// Start a load. Any request issued earlier becomes stale.
    pub fn hydrate_request(&self) -> HydrateRequest<B> {
        HydrateRequest {
            ticket: self.sequencer.issue(),
            persistence: Arc::clone(&self.persistence),
        }
    }

    /// Apply a finished load. Returns `false` if a newer load was issued
    /// after this one, in which case the response is discarded.
    pub fn apply_hydrate(&mut self, response: HydrateResponse) -> bool {
        if !self.sequencer.is_latest(response.ticket) {
            tracing::debug!("Discarding stale layout response");
            return false;
        }

        if let Err(err) = self.store.replace_layout(response.layout) {
            // The adapter validates what it loads; this only trips on a
            // backend that skips validation.
            tracing::warn!(error = %err, "Loaded layout is invalid, using default");
            let _ = self.store.replace_layout(DashboardLayout::default());
        }
        true
    }

    /// Load the saved layout into the store.
    pub async fn hydrate(&mut self) {
        let response = self.hydrate_request().run().await;
        self.apply_hydrate(response);
    }

    // -----------------------------------------------------------------------
    // Edit mode
    // -----------------------------------------------------------------------

    pub fn enter_edit_mode(&mut self) {
        if !self.edit_mode {
            self.edit_mode = true;
            tracing::info!("Entered edit mode");
        }
    }

    /// Leave edit mode, saving if anything changed.
    ///
    /// Returns whether the layout on the backend matches the store afterwards.
    /// On a failed save the edits stay in memory and the session stays dirty,
    /// so the next exit retries.
    pub async fn exit_edit_mode(&mut self) -> bool {
        self.edit_mode = false;
        tracing::info!("Exited edit mode");

        if !self.store.is_dirty() {
            return true;
        }

        let saved = self.persistence.save(self.store.layout()).await;
        if saved {
            self.store.mark_saved();
        } else {
            tracing::warn!("Layout changes kept locally, save will be retried");
        }
        saved
    }

    pub async fn toggle_edit_mode(&mut self) -> bool {
        if self.edit_mode {
            self.exit_edit_mode().await
        } else {
            self.enter_edit_mode();
            true
        }
    }

    // -----------------------------------------------------------------------
    // Widget edits
    // -----------------------------------------------------------------------

    /// Add a widget at its registered default size.
    pub fn add_widget(&mut self, widget_id: &str) -> Result<&WidgetInstance, LayoutError> {
        self.store.add_widget_with_default_size(widget_id)
    }

    /// Add a widget at an explicit size, checked against the type's minimum.
    pub fn add_widget_sized(
        &mut self,
        widget_id: &str,
        size: WidgetSize,
    ) -> Result<&WidgetInstance, LayoutError> {
        self.store.registry().validate_size(widget_id, size)?;
        self.store.add_widget(widget_id, size)
    }

    pub fn remove_widget(&mut self, id: &str) -> bool {
        self.store.remove_widget(id)
    }

    // -----------------------------------------------------------------------
    // Pointer events
    // -----------------------------------------------------------------------

    /// Start dragging widget `id`. Returns whether a drag started.
    pub fn pointer_down(
        &mut self,
        id: &str,
        pointer: Point,
        widget_origin: Point,
        target: PointerTarget,
    ) -> bool {
        let Some(widget) = self.store.layout().widget(id) else {
            return false;
        };
        self.drag
            .pointer_down(widget, pointer, widget_origin, target, self.edit_mode)
    }

    pub fn pointer_move(
        &mut self,
        pointer: Point,
        provider: &dyn GeometryProvider,
    ) -> Option<GridPosition> {
        self.drag.pointer_move(pointer, provider, self.store.layout())
    }

    pub fn pointer_up(&mut self, pointer: Point, provider: &dyn GeometryProvider) -> DropOutcome {
        self.drag.pointer_up(pointer, provider, &mut self.store)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;

    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use mirrorboard_core::geometry::{GridMetrics, StaticGeometry};

    use super::*;
    use crate::error::PersistenceError;

    /// Backend that serves a fixed layout and records saves.
    #[derive(Default)]
    struct FakeBackend {
        layout: Mutex<Option<DashboardLayout>>,
        saves: AtomicUsize,
        fail_saves: AtomicBool,
    }

    #[async_trait]
    impl LayoutBackend for FakeBackend {
        async fn fetch_layout(&self) -> Result<DashboardLayout, PersistenceError> {
            let layout = self.layout.lock().unwrap().clone();
            layout.ok_or(PersistenceError::Api {
                status: 404,
                body: "no layout".into(),
            })
        }

        async fn store_layout(&self, layout: &DashboardLayout) -> Result<(), PersistenceError> {
            if self.fail_saves.load(Ordering::SeqCst) {
                return Err(PersistenceError::Api {
                    status: 500,
                    body: "disk full".into(),
                });
            }
            self.saves.fetch_add(1, Ordering::SeqCst);
            *self.layout.lock().unwrap() = Some(layout.clone());
            Ok(())
        }
    }

    fn session(backend: FakeBackend) -> EditSession<FakeBackend> {
        EditSession::new(
            LayoutPersistence::new(backend),
            Arc::new(WidgetRegistry::builtin()),
        )
    }

    fn saved_layout() -> DashboardLayout {
        let mut layout = DashboardLayout::empty(6, 4);
        layout.widgets.push(WidgetInstance::new(
            "tesla-1",
            "tesla",
            GridPosition::new(5, 3, 1, 1),
        ));
        layout
    }

    fn backend_with(layout: DashboardLayout) -> FakeBackend {
        let backend = FakeBackend::default();
        *backend.layout.lock().unwrap() = Some(layout);
        backend
    }

    fn saves(session: &EditSession<FakeBackend>) -> usize {
        session.persistence.backend().saves.load(Ordering::SeqCst)
    }

    #[tokio::test]
    async fn hydrate_loads_saved_layout() {
        let mut session = session(backend_with(saved_layout()));
        session.hydrate().await;
        assert!(session.layout().contains_widget("tesla-1"));
        assert!(!session.has_unsaved_changes());
    }

    #[tokio::test]
    async fn hydrate_without_saved_layout_uses_default() {
        let mut session = session(FakeBackend::default());
        session.hydrate().await;
        assert_eq!(session.layout().grid_columns, 6);
        assert!(session.layout().widgets.is_empty());
    }

    #[tokio::test]
    async fn stale_hydrate_response_is_discarded() {
        let mut session = session(backend_with(saved_layout()));

        let older = session.hydrate_request();
        let newer = session.hydrate_request();

        let newer_response = newer.run().await;
        // The backend changes between the two responses.
        *session.persistence.backend().layout.lock().unwrap() = Some(DashboardLayout::empty(3, 3));
        let older_response = older.run().await;

        assert!(session.apply_hydrate(newer_response));
        assert!(!session.apply_hydrate(older_response));
        assert_eq!(session.layout().grid_columns, 6);
        assert!(session.layout().contains_widget("tesla-1"));
    }

    #[tokio::test]
    async fn exit_without_changes_does_not_save() {
        let mut session = session(backend_with(saved_layout()));
        session.hydrate().await;

        session.enter_edit_mode();
        assert!(session.exit_edit_mode().await);
        assert_eq!(saves(&session), 0);
    }

    #[tokio::test]
    async fn exit_with_changes_saves_once() {
        let mut session = session(backend_with(saved_layout()));
        session.hydrate().await;

        session.enter_edit_mode();
        let weather = session.add_widget("weather").unwrap().position;
        assert_eq!(weather, GridPosition::new(0, 0, 1, 1));

        assert!(session.exit_edit_mode().await);
        assert_eq!(saves(&session), 1);
        assert!(!session.has_unsaved_changes());
        assert!(!session.is_edit_mode());

        let stored = session.persistence.backend().layout.lock().unwrap().clone().unwrap();
        assert_eq!(stored.widgets.len(), 2);
    }

    #[tokio::test]
    async fn failed_save_keeps_edits_for_retry() {
        let mut session = session(backend_with(saved_layout()));
        session.hydrate().await;
        session.persistence.backend().fail_saves.store(true, Ordering::SeqCst);

        session.enter_edit_mode();
        assert!(session.remove_widget("tesla-1"));
        assert!(!session.exit_edit_mode().await);
        assert!(session.has_unsaved_changes());
        assert!(!session.layout().contains_widget("tesla-1"));

        session.persistence.backend().fail_saves.store(false, Ordering::SeqCst);
        session.enter_edit_mode();
        assert!(session.exit_edit_mode().await);
        assert!(!session.has_unsaved_changes());
    }

    #[tokio::test]
    async fn toggle_switches_modes() {
        let mut session = session(FakeBackend::default());
        assert!(session.toggle_edit_mode().await);
        assert!(session.is_edit_mode());
        assert!(session.toggle_edit_mode().await);
        assert!(!session.is_edit_mode());
    }

    #[test]
    fn sized_add_respects_minimum() {
        let mut session = session(FakeBackend::default());
        assert_matches!(
            session.add_widget_sized("calendar", WidgetSize::new(1, 1)),
            Err(LayoutError::Validation(_))
        );
        assert!(session.add_widget_sized("calendar", WidgetSize::new(3, 2)).is_ok());
    }

    #[test]
    fn drag_only_in_edit_mode() {
        let mut session = session(FakeBackend::default());
        let id = session.add_widget("weather").unwrap().id.clone();
        let geometry = StaticGeometry(GridMetrics::uniform(6, 4, 100.0, 10.0));

        assert!(!session.pointer_down(&id, Point::new(10.0, 10.0), Point::default(), PointerTarget::Surface));

        session.enter_edit_mode();
        assert!(session.pointer_down(&id, Point::new(10.0, 10.0), Point::default(), PointerTarget::Surface));
        assert_eq!(
            session.pointer_move(Point::new(340.0, 10.0), &geometry),
            Some(GridPosition::new(3, 0, 1, 1))
        );
        assert_eq!(
            session.pointer_up(Point::new(340.0, 10.0), &geometry),
            DropOutcome::Moved(GridPosition::new(3, 0, 1, 1))
        );
        assert!(session.has_unsaved_changes());
    }

    #[test]
    fn pointer_down_on_unknown_widget() {
        let mut session = session(FakeBackend::default());
        session.enter_edit_mode();
        assert!(!session.pointer_down("ghost", Point::default(), Point::default(), PointerTarget::Surface));
    }
}
