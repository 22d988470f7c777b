use std::collections::HashSet;
use std::sync::Arc;

use mirrorboard_core::WidgetRegistry;

use crate::config::ServerConfig;
use crate::storage::LayoutFile;

/// Where setup checks look up environment variables.
#[derive(Debug, Clone)]
pub enum EnvSource {
    /// The server's own process environment.
    Process,
    /// A fixed set of variable names treated as set.
    Fixed(HashSet<String>),
}

impl EnvSource {
    /// Whether `key` is set to a non-empty value.
    pub fn is_set(&self, key: &str) -> bool {
        match self {
            EnvSource::Process => std::env::var(key).is_ok_and(|v| !v.trim().is_empty()),
            EnvSource::Fixed(keys) => keys.contains(key),
        }
    }

    /// Value of the `TZ` variable, for the dashboard timezone default.
    pub fn timezone(&self) -> Option<String> {
        match self {
            EnvSource::Process => std::env::var("TZ").ok(),
            EnvSource::Fixed(_) => None,
        }
    }
}

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// The saved dashboard layout.
    pub layout: Arc<LayoutFile>,
    /// Known widget types.
    pub registry: Arc<WidgetRegistry>,
    /// Environment used for widget setup checks.
    pub env: Arc<EnvSource>,
}
