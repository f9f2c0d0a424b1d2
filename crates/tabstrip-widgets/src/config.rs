#![forbid(unsafe_code)]

//! Skin configuration for tab displayers.
//!
//! [`DisplayerConfig`] groups every tunable of a displayer. With the
//! `config` feature it loads from TOML or JSON; missing fields keep their
//! defaults.
//!
//! ```toml
//! repaint_policy = ["ON_SELECTION_CHANGE", "ALL_ON_MOUSE_ENTER_TABS_AREA"]
//! attention_period_ms = 500
//!
//! [layout]
//! pixels_to_add_to_selection = 4
//!
//! [metrics]
//! show_close_buttons = false
//! ```

#[cfg(feature = "config")]
use std::path::Path;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};
use tabstrip_layout::{
    ClipThresholds, MIN_LEFT_CLIPPED_WIDTH, MIN_RIGHT_CLIPPED_WIDTH, TabMetricsConfig,
};
use web_time::Duration;

use crate::autoscroll::AUTOSCROLL_PERIOD;
use crate::state::{ATTENTION_PERIOD, RepaintPolicy};

/// Complete displayer configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct DisplayerConfig {
    /// Names of [`RepaintPolicy`] flags, e.g. `"ON_SELECTION_CHANGE"`.
    pub repaint_policy: Vec<String>,
    /// Blink period of attention tabs.
    pub attention_period_ms: u64,
    /// Step period of drag autoscroll.
    pub autoscroll_period_ms: u64,
    /// Clipping and selection widening.
    pub layout: LayoutConfig,
    /// Tab measurements.
    pub metrics: MetricsConfig,
}

impl Default for DisplayerConfig {
    fn default() -> Self {
        Self {
            repaint_policy: RepaintPolicy::DEFAULT
                .iter_names()
                .map(|(name, _)| name.to_string())
                .collect(),
            attention_period_ms: ATTENTION_PERIOD.as_millis() as u64,
            autoscroll_period_ms: AUTOSCROLL_PERIOD.as_millis() as u64,
            layout: LayoutConfig::default(),
            metrics: MetricsConfig::default(),
        }
    }
}

/// Scrolling layout parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct LayoutConfig {
    pub min_left_clipped_width: i32,
    pub min_right_clipped_width: i32,
    pub pixels_to_add_to_selection: i32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            min_left_clipped_width: MIN_LEFT_CLIPPED_WIDTH,
            min_right_clipped_width: MIN_RIGHT_CLIPPED_WIDTH,
            pixels_to_add_to_selection: 0,
        }
    }
}

/// Tab measurement parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct MetricsConfig {
    /// Pixels per display column of tab text.
    pub char_width: i32,
    pub tab_height: i32,
    pub horizontal_padding: i32,
    pub icon_gap: i32,
    pub close_button_width: i32,
    pub close_button_gap: i32,
    pub show_close_buttons: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        let m = TabMetricsConfig::default();
        Self {
            char_width: 7,
            tab_height: m.tab_height,
            horizontal_padding: m.horizontal_padding,
            icon_gap: m.icon_gap,
            close_button_width: m.close_button_width,
            close_button_gap: m.close_button_gap,
            show_close_buttons: m.show_close_buttons,
        }
    }
}

impl DisplayerConfig {
    /// Load from a TOML string.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s).map_err(ConfigError::Toml)?;
        config.validated()
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s).map_err(ConfigError::Json)?;
        config.validated()
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Serialize to TOML.
    #[cfg(feature = "config")]
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string(self).map_err(ConfigError::TomlSer)
    }

    /// Check every parameter.
    ///
    /// Returns a list of problems; empty means valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.layout.min_left_clipped_width <= 0 {
            errors.push(format!(
                "layout.min_left_clipped_width must be > 0, got {}",
                self.layout.min_left_clipped_width
            ));
        }
        if self.layout.min_right_clipped_width <= 0 {
            errors.push(format!(
                "layout.min_right_clipped_width must be > 0, got {}",
                self.layout.min_right_clipped_width
            ));
        }
        if self.layout.pixels_to_add_to_selection < 0 {
            errors.push(format!(
                "layout.pixels_to_add_to_selection must be >= 0, got {}",
                self.layout.pixels_to_add_to_selection
            ));
        }

        let m = &self.metrics;
        if m.char_width <= 0 {
            errors.push(format!("metrics.char_width must be > 0, got {}", m.char_width));
        }
        if m.tab_height <= 0 {
            errors.push(format!("metrics.tab_height must be > 0, got {}", m.tab_height));
        }
        for (name, value) in [
            ("horizontal_padding", m.horizontal_padding),
            ("icon_gap", m.icon_gap),
            ("close_button_width", m.close_button_width),
            ("close_button_gap", m.close_button_gap),
        ] {
            if value < 0 {
                errors.push(format!("metrics.{name} must be >= 0, got {value}"));
            }
        }

        for name in &self.repaint_policy {
            if RepaintPolicy::from_name(name).is_none() {
                errors.push(format!("repaint_policy: unknown flag {name:?}"));
            }
        }

        if self.attention_period_ms == 0 {
            errors.push("attention_period_ms must be > 0".into());
        }
        if self.autoscroll_period_ms == 0 {
            errors.push("autoscroll_period_ms must be > 0".into());
        }

        errors
    }

    #[cfg(feature = "config")]
    fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Repaint policy from the flag names; unknown names are skipped.
    #[must_use]
    pub fn to_repaint_policy(&self) -> RepaintPolicy {
        self.repaint_policy
            .iter()
            .filter_map(|name| RepaintPolicy::from_name(name))
            .fold(RepaintPolicy::empty(), |acc, flag| acc | flag)
    }

    #[must_use]
    pub fn to_clip_thresholds(&self) -> ClipThresholds {
        ClipThresholds {
            min_left: self.layout.min_left_clipped_width,
            min_right: self.layout.min_right_clipped_width,
        }
    }

    #[must_use]
    pub fn to_tab_metrics(&self) -> TabMetricsConfig {
        TabMetricsConfig {
            tab_height: self.metrics.tab_height,
            horizontal_padding: self.metrics.horizontal_padding,
            icon_gap: self.metrics.icon_gap,
            close_button_width: self.metrics.close_button_width,
            close_button_gap: self.metrics.close_button_gap,
            show_close_buttons: self.metrics.show_close_buttons,
        }
    }

    #[must_use]
    pub fn attention_period(&self) -> Duration {
        Duration::from_millis(self.attention_period_ms)
    }

    #[must_use]
    pub fn autoscroll_period(&self) -> Duration {
        Duration::from_millis(self.autoscroll_period_ms)
    }
}

/// Errors raised while loading a [`DisplayerConfig`].
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "config")]
    Toml(toml::de::Error),
    /// TOML serialization error.
    #[cfg(feature = "config")]
    TomlSer(toml::ser::Error),
    /// JSON parse error.
    #[cfg(feature = "config")]
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "config")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "config")]
            Self::TomlSer(e) => write!(f, "TOML serialize error: {e}"),
            #[cfg(feature = "config")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "config")]
            Self::TomlSer(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}
