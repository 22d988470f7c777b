//! Widget setup status lookups.
//!
//! A widget renders a "not connected" placeholder until the backend reports
//! it configured. Any failure to ask counts as not configured.

use std::sync::Arc;
use std::time::Duration;

use mirrorboard_core::{SetupStatus, WidgetRegistry};

use crate::config::ClientConfig;
use crate::error::{ensure_success, PersistenceError};

pub struct SetupClient {
    client: reqwest::Client,
    api_url: String,
    registry: Arc<WidgetRegistry>,
}

impl SetupClient {
    pub fn new(config: &ClientConfig, registry: Arc<WidgetRegistry>) -> Result<Self, PersistenceError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            registry,
        })
    }

    /// Setup status of `widget_id`, or a not-configured status if the
    /// backend cannot be asked.
    pub async fn setup_status(&self, widget_id: &str) -> SetupStatus {
        match self.fetch_status(widget_id).await {
            Ok(status) => status,
            Err(err) => {
                tracing::warn!(widget_type = %widget_id, error = %err, "Setup status unavailable");
                self.unconfigured(widget_id)
            }
        }
    }

    async fn fetch_status(&self, widget_id: &str) -> Result<SetupStatus, PersistenceError> {
        let response = self
            .client
            .get(format!("{}/api/setup/{}/status", self.api_url, widget_id))
            .send()
            .await?;

        let response = ensure_success(response).await?;
        Ok(response.json::<SetupStatus>().await?)
    }

    fn unconfigured(&self, widget_id: &str) -> SetupStatus {
        match self.registry.get(widget_id) {
            Some(widget) => SetupStatus::unconfigured(widget),
            None => SetupStatus {
                configured: false,
                missing: Vec::new(),
            },
        }
    }
}
