//! Engine configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_SEARCH_DISTANCE, FREEHAND_THROTTLE_PX, MAX_HISTORY_SIZE};

/// How the connector tool builds a connector from pointer input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectorInteractionMode {
    /// First click places the start anchor, second click the end.
    #[default]
    Click,
    /// Press places the start anchor, release the end.
    Drag,
}

/// Which keys select which tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HotkeyProfile {
    Qwerty,
    #[default]
    Smnrct,
    None,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown {var}: '{value}' (expected {expected})")]
    InvalidChoice { var: &'static str, value: String, expected: &'static str },
}

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub max_history_size: usize,
    pub search_distance: i32,
    pub connector_mode: ConnectorInteractionMode,
    pub hotkeys: HotkeyProfile,
    pub lasso_throttle_px: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_history_size: MAX_HISTORY_SIZE,
            search_distance: DEFAULT_SEARCH_DISTANCE,
            connector_mode: ConnectorInteractionMode::default(),
            hotkeys: HotkeyProfile::default(),
            lasso_throttle_px: FREEHAND_THROTTLE_PX,
        }
    }
}

impl EngineConfig {
    /// Build config from environment variables.
    ///
    /// Optional:
    /// - `ISOFLOW_MAX_HISTORY`: default 50
    /// - `ISOFLOW_SEARCH_DISTANCE`: default 10
    /// - `ISOFLOW_CONNECTOR_MODE`: `click` (default) or `drag`
    /// - `ISOFLOW_HOTKEYS`: `smnrct` (default), `qwerty` or `none`
    /// - `ISOFLOW_LASSO_THROTTLE_PX`: default 5
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidChoice`] for an unrecognised mode or
    /// hotkey profile.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| match std::env::var(key) {
            Ok(value) => Some(value),
            Err(_) => None,
        })
    }

    /// Build config from an arbitrary key lookup.
    ///
    /// Malformed numbers fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Same as [`EngineConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            max_history_size: parse_or("ISOFLOW_MAX_HISTORY", lookup("ISOFLOW_MAX_HISTORY"), defaults.max_history_size),
            search_distance: parse_or(
                "ISOFLOW_SEARCH_DISTANCE",
                lookup("ISOFLOW_SEARCH_DISTANCE"),
                defaults.search_distance,
            ),
            connector_mode: parse_connector_mode(lookup("ISOFLOW_CONNECTOR_MODE").as_deref())?,
            hotkeys: parse_hotkeys(lookup("ISOFLOW_HOTKEYS").as_deref())?,
            lasso_throttle_px: parse_or(
                "ISOFLOW_LASSO_THROTTLE_PX",
                lookup("ISOFLOW_LASSO_THROTTLE_PX"),
                defaults.lasso_throttle_px,
            ),
        })
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, raw: Option<String>, default: T) -> T {
    let Some(raw) = raw else {
        return default;
    };
    if let Ok(value) = raw.trim().parse::<T>() {
        value
    } else {
        tracing::warn!(key, value = %raw, "ignoring malformed config value");
        default
    }
}

/// Parse a connector interaction mode name.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidChoice`] for anything but `click` or `drag`.
pub fn parse_connector_mode(raw: Option<&str>) -> Result<ConnectorInteractionMode, ConfigError> {
    match raw.map(str::trim).unwrap_or("click") {
        "click" => Ok(ConnectorInteractionMode::Click),
        "drag" => Ok(ConnectorInteractionMode::Drag),
        other => Err(ConfigError::InvalidChoice {
            var: "ISOFLOW_CONNECTOR_MODE",
            value: other.to_string(),
            expected: "'click' or 'drag'",
        }),
    }
}

fn parse_hotkeys(raw: Option<&str>) -> Result<HotkeyProfile, ConfigError> {
    match raw.map(str::trim).unwrap_or("smnrct") {
        "smnrct" => Ok(HotkeyProfile::Smnrct),
        "qwerty" => Ok(HotkeyProfile::Qwerty),
        "none" => Ok(HotkeyProfile::None),
        other => Err(ConfigError::InvalidChoice {
            var: "ISOFLOW_HOTKEYS",
            value: other.to_string(),
            expected: "'smnrct', 'qwerty' or 'none'",
        }),
    }
}
