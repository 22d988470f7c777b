//! Widget type registry.
//!
//! An explicit value built once at startup and shared (behind `Arc`) with
//! the layout store, the backend routes and anything that renders widgets.
//! Widget instances refer to types by id only; the registry is consulted,
//! never owned by a layout.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::LayoutError;
use crate::layout::WidgetConfig;
use crate::position::WidgetSize;

/// Grouping used by the "add widget" picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetCategory {
    Home,
    Media,
    Productivity,
    Other,
}

/// A setting a widget needs before it can show data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigRequirement {
    pub key: String,
    pub label: String,
    pub description: String,
    /// Optional requirements are listed for the setup form but never make a
    /// widget count as unconfigured.
    pub optional: bool,
}

impl ConfigRequirement {
    pub fn required(key: &str, label: &str, description: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            description: description.to_string(),
            optional: false,
        }
    }

    pub fn optional(key: &str, label: &str, description: &str) -> Self {
        Self {
            optional: true,
            ..Self::required(key, label, description)
        }
    }
}

/// Metadata for one kind of widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetType {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub category: WidgetCategory,
    pub default_size: WidgetSize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_size: Option<WidgetSize>,
    /// Keys expected in the widget instance's `config`.
    pub required_config: Vec<ConfigRequirement>,
    /// Environment variables the backend needs for this widget.
    pub required_env: Vec<ConfigRequirement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_hint: Option<String>,
}

impl WidgetType {
    pub fn new(
        id: &str,
        name: &str,
        description: &str,
        icon: &str,
        category: WidgetCategory,
        default_size: WidgetSize,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            icon: icon.to_string(),
            category,
            default_size,
            min_size: None,
            required_config: Vec::new(),
            required_env: Vec::new(),
            config_message: None,
            config_hint: None,
        }
    }

    pub fn with_min_size(mut self, min_size: WidgetSize) -> Self {
        self.min_size = Some(min_size);
        self
    }

    pub fn with_config(mut self, requirement: ConfigRequirement) -> Self {
        self.required_config.push(requirement);
        self
    }

    pub fn with_env(mut self, requirement: ConfigRequirement) -> Self {
        self.required_env.push(requirement);
        self
    }

    pub fn with_setup_text(mut self, message: &str, hint: &str) -> Self {
        self.config_message = Some(message.to_string());
        self.config_hint = Some(hint.to_string());
        self
    }

    /// Keys of non-optional requirements that are not satisfied.
    ///
    /// A config key counts as present when it exists and is not `null` or an
    /// empty string. `env_present` reports whether an environment variable is
    /// set; it is injected so the check stays pure.
    pub fn missing_requirements(
        &self,
        config: &WidgetConfig,
        env_present: impl Fn(&str) -> bool,
    ) -> Vec<String> {
        let mut missing = self.missing_config(config);
        missing.extend(
            self.required_env
                .iter()
                .filter(|req| !req.optional && !env_present(&req.key))
                .map(|req| req.key.clone()),
        );
        missing
    }

    /// Keys of non-optional config requirements absent from `config`.
    pub fn missing_config(&self, config: &WidgetConfig) -> Vec<String> {
        self.required_config
            .iter()
            .filter(|req| !req.optional && !config_value_present(config, &req.key))
            .map(|req| req.key.clone())
            .collect()
    }

    /// Whether `key` is one of this type's config keys, optional or not.
    pub fn accepts_config_key(&self, key: &str) -> bool {
        self.required_config.iter().any(|req| req.key == key)
    }

    pub fn setup_status(
        &self,
        config: &WidgetConfig,
        env_present: impl Fn(&str) -> bool,
    ) -> SetupStatus {
        let missing = self.missing_requirements(config, env_present);
        SetupStatus {
            configured: missing.is_empty(),
            missing,
        }
    }
}

/// Whether a widget has everything it needs, as served by
/// `GET /api/setup/{widget}/status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetupStatus {
    pub configured: bool,
    /// Keys of the unmet requirements.
    #[serde(default)]
    pub missing: Vec<String>,
}

impl SetupStatus {
    /// The "not connected" status: every non-optional requirement missing.
    pub fn unconfigured(widget: &WidgetType) -> Self {
        let missing = widget
            .required_config
            .iter()
            .chain(&widget.required_env)
            .filter(|req| !req.optional)
            .map(|req| req.key.clone())
            .collect();
        Self {
            configured: false,
            missing,
        }
    }
}

fn config_value_present(config: &WidgetConfig, key: &str) -> bool {
    match config.get(key) {
        None | Some(serde_json::Value::Null) => false,
        Some(serde_json::Value::String(s)) => !s.trim().is_empty(),
        Some(_) => true,
    }
}

/// All widget types known to the dashboard, in registration order.
#[derive(Debug, Clone, Default)]
pub struct WidgetRegistry {
    types: IndexMap<String, WidgetType>,
}

impl WidgetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with the dashboard's built-in widgets.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for widget in builtin_widgets() {
            if let Err(err) = registry.register(widget) {
                tracing::error!(error = %err, "Skipping built-in widget type");
            }
        }
        registry
    }

    /// Add a widget type. Ids must be unique and default sizes non-zero.
    pub fn register(&mut self, widget: WidgetType) -> Result<(), LayoutError> {
        if widget.id.is_empty() {
            return Err(LayoutError::Validation(
                "Widget type id must not be empty".to_string(),
            ));
        }
        if !widget.default_size.is_valid() {
            return Err(LayoutError::Validation(format!(
                "Widget type '{}' must have a default size of at least 1x1",
                widget.id
            )));
        }
        if self.types.contains_key(&widget.id) {
            return Err(LayoutError::Validation(format!(
                "Widget type '{}' is already registered",
                widget.id
            )));
        }

        tracing::debug!(widget_type = %widget.id, "Registered widget type");
        self.types.insert(widget.id.clone(), widget);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&WidgetType> {
        self.types.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.types.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &WidgetType> {
        self.types.values()
    }

    pub fn by_category(&self, category: WidgetCategory) -> Vec<&WidgetType> {
        self.iter().filter(|w| w.category == category).collect()
    }

    /// Default size of a registered type.
    pub fn default_size(&self, id: &str) -> Result<WidgetSize, LayoutError> {
        self.get(id)
            .map(|w| w.default_size)
            .ok_or_else(|| LayoutError::UnknownWidgetType(id.to_string()))
    }

    /// Check a requested size against the type's constraints.
    ///
    /// This is the boundary check the add-widget flow runs before asking the
    /// store for a placement; the store itself does not enforce minimums.
    pub fn validate_size(&self, id: &str, size: WidgetSize) -> Result<(), LayoutError> {
        let widget = self
            .get(id)
            .ok_or_else(|| LayoutError::UnknownWidgetType(id.to_string()))?;

        if !size.is_valid() {
            return Err(LayoutError::Validation(format!(
                "Widget size must be at least 1x1, got {}x{}",
                size.width, size.height
            )));
        }

        if let Some(min) = widget.min_size {
            if size.width < min.width || size.height < min.height {
                return Err(LayoutError::Validation(format!(
                    "'{}' needs at least {}x{} cells, got {}x{}",
                    id, min.width, min.height, size.width, size.height
                )));
            }
        }

        Ok(())
    }
}

fn builtin_widgets() -> Vec<WidgetType> {
    vec![
        WidgetType::new(
            "calendar",
            "Calendar",
            "Google Calendar with events and reminders",
            "📅",
            WidgetCategory::Productivity,
            WidgetSize::new(4, 4),
        )
        .with_min_size(WidgetSize::new(2, 2))
        .with_config(ConfigRequirement::required(
            "trash_day",
            "Trash Day",
            "Day of the week for trash pickup (e.g. \"Wednesday\")",
        ))
        .with_config(ConfigRequirement::required(
            "reminders",
            "Reminders",
            "Array of reminder objects with name and date",
        )),
        WidgetType::new(
            "weather",
            "Weather",
            "Current weather and forecast",
            "🌤️",
            WidgetCategory::Home,
            WidgetSize::new(1, 1),
        )
        .with_config(ConfigRequirement::required(
            "latitude",
            "Latitude",
            "Your location latitude (e.g. 39.7392)",
        ))
        .with_config(ConfigRequirement::required(
            "longitude",
            "Longitude",
            "Your location longitude (e.g. -104.9903)",
        ))
        .with_config(ConfigRequirement::optional(
            "location_name",
            "Location Name",
            "Display name for your location (e.g. \"Denver, CO\")",
        ))
        .with_env(ConfigRequirement::required(
            "OPENWEATHER_API_KEY",
            "OpenWeather API Key",
            "API key from openweathermap.org",
        ))
        .with_setup_text(
            "Weather Not Configured",
            "Add latitude and longitude to the widget config, and OPENWEATHER_API_KEY to .env",
        ),
        WidgetType::new(
            "tesla",
            "Tesla",
            "Tesla vehicle status and charging info",
            "🚗",
            WidgetCategory::Home,
            WidgetSize::new(1, 1),
        )
        .with_config(ConfigRequirement::required(
            "tesla_name",
            "Tesla Name",
            "The name of your Tesla vehicle",
        ))
        .with_env(ConfigRequirement::required(
            "TESSIE_API_KEY",
            "Tessie API Key",
            "API key from tessie.com",
        ))
        .with_env(ConfigRequirement::required(
            "TESSIE_VIN",
            "Tesla VIN",
            "Your Tesla vehicle identification number",
        ))
        .with_setup_text(
            "Tesla Not Connected",
            "Add TESSIE_API_KEY and TESSIE_VIN to your .env configuration",
        ),
        WidgetType::new(
            "plants",
            "Plant Sensors",
            "Soil moisture levels for plants",
            "🌱",
            WidgetCategory::Home,
            WidgetSize::new(1, 2),
        )
        .with_env(ConfigRequirement::required(
            "ECOWITT_API_KEY",
            "Ecowitt API Key",
            "Your Ecowitt API key",
        ))
        .with_env(ConfigRequirement::required(
            "ECOWITT_APPLICATION_KEY",
            "Ecowitt Application Key",
            "Your Ecowitt application key",
        ))
        .with_env(ConfigRequirement::required(
            "ECOWITT_GATEWAY_MAC",
            "Gateway MAC Address",
            "Your Ecowitt gateway MAC address",
        )),
        WidgetType::new(
            "meals",
            "Meal Calendar",
            "Upcoming meal planning",
            "🍽️",
            WidgetCategory::Productivity,
            WidgetSize::new(1, 1),
        )
        .with_config(ConfigRequirement::required(
            "calendar_url",
            "Calendar URL",
            "The URL of your meal calendar",
        ))
        .with_setup_text(
            "Meal Calendar Not Connected",
            "Add calendar_url to your widget configuration",
        ),
        WidgetType::new(
            "photos",
            "Photo Carousel",
            "Rotating photo display",
            "📸",
            WidgetCategory::Media,
            WidgetSize::new(1, 2),
        )
        .with_config(ConfigRequirement::optional(
            "photo_rotation_seconds",
            "Photo Rotation Interval",
            "Seconds between photo changes (default: 45)",
        )),
        WidgetType::new(
            "traeger",
            "Traeger Grill",
            "Grill temperature, probes, and pellet level",
            "🔥",
            WidgetCategory::Home,
            WidgetSize::new(1, 1),
        )
        .with_config(ConfigRequirement::required(
            "grill_name",
            "Grill Name",
            "The friendly name of your grill",
        ))
        .with_env(ConfigRequirement::required(
            "TRAEGER_USERNAME",
            "Traeger Username",
            "Your Traeger app email address",
        ))
        .with_env(ConfigRequirement::required(
            "TRAEGER_PASSWORD",
            "Traeger Password",
            "Your Traeger app password",
        ))
        .with_setup_text(
            "Traeger Not Connected",
            "Add TRAEGER_USERNAME and TRAEGER_PASSWORD to .env, and grill_name to the widget config",
        ),
    ]
}
