//! Dashboard-wide settings stored under the layout's `global` key.

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::LayoutError;
use crate::layout::{DashboardLayout, DEFAULT_GRID_COLUMNS, DEFAULT_GRID_ROWS};

pub const DEFAULT_TIMEZONE: &str = "America/Chicago";
pub const DEFAULT_NIGHT_MODE_START: &str = "22:00";
pub const DEFAULT_NIGHT_MODE_END: &str = "07:00";
pub const DEFAULT_PHOTO_ROTATION_SECONDS: u32 = 45;
pub const DEFAULT_REFRESH_INTERVAL_MINUTES: u32 = 5;

/// Typed view over `DashboardLayout::global`.
///
/// Missing, empty or zero fields fall back to the defaults, so a config file
/// that only sets `timezone` still yields a complete value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default = "DashboardGlobals::empty")]
pub struct DashboardGlobals {
    pub timezone: String,
    /// `HH:MM`, local time.
    pub night_mode_start: String,
    /// `HH:MM`, local time. May be earlier than the start (window wraps midnight).
    pub night_mode_end: String,
    pub photo_rotation_seconds: u32,
    pub refresh_interval_minutes: u32,
    pub grid_columns: u32,
    pub grid_rows: u32,
}

impl Default for DashboardGlobals {
    fn default() -> Self {
        Self::empty().with_defaults(None)
    }
}

impl DashboardGlobals {
    /// Parse the `global` map, filling gaps with defaults.
    ///
    /// `env_timezone` is the value of `TZ`, used when no timezone is stored.
    pub fn from_map(
        global: Option<&serde_json::Map<String, serde_json::Value>>,
        env_timezone: Option<&str>,
    ) -> Result<Self, LayoutError> {
        let parsed: Self = match global {
            Some(map) => serde_json::from_value(serde_json::Value::Object(map.clone()))
                .map_err(|e| LayoutError::Validation(format!("Invalid global settings: {e}")))?,
            None => Self::empty(),
        };
        Ok(parsed.with_defaults(env_timezone))
    }

    /// Settings for `layout`. The grid size always comes from the layout's
    /// own `gridColumns`/`gridRows`, not from the `global` map.
    pub fn for_layout(
        layout: &DashboardLayout,
        env_timezone: Option<&str>,
    ) -> Result<Self, LayoutError> {
        let mut globals = Self::from_map(layout.global.as_ref(), env_timezone)?;
        globals.grid_columns = layout.grid_columns;
        globals.grid_rows = layout.grid_rows;
        Ok(globals)
    }

    pub fn to_map(&self) -> serde_json::Map<String, serde_json::Value> {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(map)) => map,
            _ => serde_json::Map::new(),
        }
    }

    fn empty() -> Self {
        Self {
            timezone: String::new(),
            night_mode_start: String::new(),
            night_mode_end: String::new(),
            photo_rotation_seconds: 0,
            refresh_interval_minutes: 0,
            grid_columns: 0,
            grid_rows: 0,
        }
    }

    fn with_defaults(mut self, env_timezone: Option<&str>) -> Self {
        if self.timezone.is_empty() {
            self.timezone = env_timezone
                .filter(|tz| !tz.is_empty())
                .unwrap_or(DEFAULT_TIMEZONE)
                .to_string();
        }
        if self.night_mode_start.is_empty() {
            self.night_mode_start = DEFAULT_NIGHT_MODE_START.to_string();
        }
        if self.night_mode_end.is_empty() {
            self.night_mode_end = DEFAULT_NIGHT_MODE_END.to_string();
        }
        if self.photo_rotation_seconds == 0 {
            self.photo_rotation_seconds = DEFAULT_PHOTO_ROTATION_SECONDS;
        }
        if self.refresh_interval_minutes == 0 {
            self.refresh_interval_minutes = DEFAULT_REFRESH_INTERVAL_MINUTES;
        }
        if self.grid_columns == 0 {
            self.grid_columns = DEFAULT_GRID_COLUMNS;
        }
        if self.grid_rows == 0 {
            self.grid_rows = DEFAULT_GRID_ROWS;
        }
        self
    }

    /// Parsed night-mode window as `(start, end)`.
    pub fn night_window(&self) -> Result<(NaiveTime, NaiveTime), LayoutError> {
        Ok((
            parse_clock(&self.night_mode_start)?,
            parse_clock(&self.night_mode_end)?,
        ))
    }

    /// Whether `hour:minute` falls inside the night-mode window.
    ///
    /// The start is inclusive and the end exclusive. A window whose end is
    /// before its start spans midnight. An unparsable window is never active.
    pub fn is_night_mode(&self, hour: u32, minute: u32) -> bool {
        let Some(now) = NaiveTime::from_hms_opt(hour, minute, 0) else {
            return false;
        };
        let (start, end) = match self.night_window() {
            Ok(window) => window,
            Err(err) => {
                tracing::warn!(error = %err, "Ignoring night mode window");
                return false;
            }
        };

        if start <= end {
            start <= now && now < end
        } else {
            now >= start || now < end
        }
    }

    /// [`Self::is_night_mode`] for any time-of-day value.
    pub fn is_night_mode_at(&self, time: impl Timelike) -> bool {
        self.is_night_mode(time.hour(), time.minute())
    }
}

fn parse_clock(value: &str) -> Result<NaiveTime, LayoutError> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|_| LayoutError::Validation(format!("Expected HH:MM time, got '{value}'")))
}
