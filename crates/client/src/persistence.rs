//! Loading and saving the dashboard layout.
//!
//! [`LayoutPersistence`] never fails towards its caller: a load that cannot
//! reach the backend yields the default empty board, and a failed save
//! reports `false`. The transport sits behind [`LayoutBackend`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use mirrorboard_core::DashboardLayout;

use crate::config::ClientConfig;
use crate::error::{ensure_success, PersistenceError};

/// Transport for the persisted layout.
#[async_trait]
pub trait LayoutBackend: Send + Sync {
    async fn fetch_layout(&self) -> Result<DashboardLayout, PersistenceError>;

    async fn store_layout(&self, layout: &DashboardLayout) -> Result<(), PersistenceError>;
}

/// [`LayoutBackend`] over `GET`/`POST {api_url}/api/layout`.
pub struct HttpLayoutBackend {
    client: reqwest::Client,
    api_url: String,
}

impl HttpLayoutBackend {
    pub fn new(config: &ClientConfig) -> Result<Self, PersistenceError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self::with_client(client, config.api_url.clone()))
    }

    /// Reuse an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, api_url: String) -> Self {
        Self { client, api_url }
    }

    fn layout_url(&self) -> String {
        format!("{}/api/layout", self.api_url)
    }
}

#[async_trait]
impl LayoutBackend for HttpLayoutBackend {
    async fn fetch_layout(&self) -> Result<DashboardLayout, PersistenceError> {
        let response = self.client.get(self.layout_url()).send().await?;
        let response = ensure_success(response).await?;
        let layout = response.json::<DashboardLayout>().await?;
        layout.validate()?;
        Ok(layout)
    }

    async fn store_layout(&self, layout: &DashboardLayout) -> Result<(), PersistenceError> {
        let response = self
            .client
            .post(self.layout_url())
            .json(layout)
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }
}

/// Load/save adapter with fallbacks.
pub struct LayoutPersistence<B = HttpLayoutBackend> {
    backend: B,
}

impl LayoutPersistence<HttpLayoutBackend> {
    pub fn http(config: &ClientConfig) -> Result<Self, PersistenceError> {
        Ok(Self::new(HttpLayoutBackend::new(config)?))
    }
}

impl<B: LayoutBackend> LayoutPersistence<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Fetch the saved layout, or the default 6x4 board if that fails.
    pub async fn load(&self) -> DashboardLayout {
        match self.backend.fetch_layout().await {
            Ok(layout) => {
                tracing::debug!(widget_count = layout.widgets.len(), "Layout loaded");
                layout
            }
            Err(err) => {
                tracing::warn!(error = %err, "Failed to load layout, using default");
                DashboardLayout::default()
            }
        }
    }

    /// Stamp `lastModified` and store the layout. Returns whether it was
    /// accepted.
    pub async fn save(&self, layout: &DashboardLayout) -> bool {
        let mut stamped = layout.clone();
        stamped.touch(chrono::Utc::now());

        match self.backend.store_layout(&stamped).await {
            Ok(()) => {
                tracing::info!(
                    widget_count = stamped.widgets.len(),
                    last_modified = %stamped.last_modified,
                    "Layout saved",
                );
                true
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to save layout");
                false
            }
        }
    }
}

/// Ticket identifying one issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestTicket(u64);

/// Orders overlapping requests so only the newest response is applied.
///
/// Every request takes a ticket from [`RequestSequencer::issue`]; when its
/// response arrives, [`RequestSequencer::is_latest`] says whether a newer
/// request has been issued in the meantime.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: AtomicU64,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self) -> RequestTicket {
        RequestTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_latest(&self, ticket: RequestTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }
}
