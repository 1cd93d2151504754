//! Application configuration.
//!
//! Defaults are compiled in; a JSON object stored under [`STORAGE_KEY`] in
//! localStorage overrides them field by field.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const STORAGE_KEY: &str = "pm_config";

/// Zoom limits and the tuning constants of the viewport animation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub min_scale: f64,
    pub max_scale: f64,
    /// Increment used by the zoom buttons. Wheel zoom uses half of it.
    pub scale_step: f64,
    pub limit_expansion_factor: f64,
    pub wheel_interval_ms: f64,
    /// Fraction of the remaining distance covered by each animation frame.
    pub animation_speed: f64,
    pub animation_threshold: f64,
    /// Scale used when focusing a point picked from search.
    pub focus_scale: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            min_scale: 0.3,
            max_scale: 5.0,
            scale_step: 0.15,
            limit_expansion_factor: 3.0,
            wheel_interval_ms: 16.0,
            animation_speed: 0.15,
            animation_threshold: 0.001,
            focus_scale: 2.0,
        }
    }
}

impl ViewportConfig {
    /// Repairs out-of-range values instead of rejecting them.
    pub fn sanitized(mut self) -> Self {
        let d = Self::default();
        let positive = |v: f64, fallback: f64| if v.is_finite() && v > 0.0 { v } else { fallback };
        self.min_scale = positive(self.min_scale, d.min_scale);
        self.max_scale = positive(self.max_scale, d.max_scale);
        if self.min_scale > self.max_scale {
            std::mem::swap(&mut self.min_scale, &mut self.max_scale);
        }
        self.scale_step = positive(self.scale_step, d.scale_step);
        self.limit_expansion_factor = if self.limit_expansion_factor.is_finite() {
            self.limit_expansion_factor.max(1.0)
        } else {
            d.limit_expansion_factor
        };
        self.wheel_interval_ms = if self.wheel_interval_ms.is_finite() {
            self.wheel_interval_ms.max(0.0)
        } else {
            d.wheel_interval_ms
        };
        self.animation_speed = positive(self.animation_speed, d.animation_speed).min(1.0);
        self.animation_threshold = positive(self.animation_threshold, d.animation_threshold);
        self.focus_scale = positive(self.focus_scale, d.focus_scale);
        self
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data_url: String,
    pub image_url: String,
    /// One of `error`, `warn`, `info`, `debug`, `trace`.
    pub log_level: String,
    pub debug_panel: bool,
    pub viewport: ViewportConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_url: "data/promotorias-data.json".to_string(),
            image_url: "img/mapa.png".to_string(),
            log_level: "info".to_string(),
            debug_panel: false,
            viewport: ViewportConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let mut cfg: AppConfig = serde_json::from_str(raw)?;
        cfg.viewport = cfg.viewport.sanitized();
        Ok(cfg)
    }

    pub fn log_level(&self) -> log::Level {
        self.log_level.parse().unwrap_or(log::Level::Info)
    }

    fn from_storage() -> Result<Option<Self>, ConfigError> {
        let store = web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .ok_or(ConfigError::Storage)?;
        match store.get_item(STORAGE_KEY).map_err(|_| ConfigError::Storage)? {
            Some(raw) => Self::from_json(&raw).map(Some),
            None => Ok(None),
        }
    }

    /// Defaults merged with the localStorage override, if any.
    /// Never fails: a broken override is reported and ignored.
    pub fn load() -> Self {
        match Self::from_storage() {
            Ok(Some(cfg)) => cfg,
            Ok(None) => Self::default(),
            Err(e) => {
                log::warn!("ignoring stored config: {e}");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_override_keeps_other_defaults() {
        let cfg = AppConfig::from_json(
            r#"{"debug_panel": true, "viewport": {"limit_expansion_factor": 5}}"#,
        )
        .unwrap();
        assert!(cfg.debug_panel);
        assert_eq!(cfg.viewport.limit_expansion_factor, 5.0);
        assert_eq!(cfg.viewport.max_scale, 5.0);
        assert_eq!(cfg.viewport.scale_step, 0.15);
        assert_eq!(cfg.data_url, "data/promotorias-data.json");
    }

    #[test]
    fn malformed_override_is_an_error() {
        assert!(matches!(
            AppConfig::from_json("{not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn sanitize_repairs_bad_values() {
        let cfg = ViewportConfig {
            min_scale: 8.0,
            max_scale: 2.0,
            scale_step: -1.0,
            limit_expansion_factor: 0.2,
            wheel_interval_ms: f64::NAN,
            animation_speed: 3.0,
            animation_threshold: 0.0,
            focus_scale: 2.0,
        }
        .sanitized();
        assert_eq!((cfg.min_scale, cfg.max_scale), (2.0, 8.0));
        assert_eq!(cfg.scale_step, 0.15);
        assert_eq!(cfg.limit_expansion_factor, 1.0);
        assert_eq!(cfg.wheel_interval_ms, 16.0);
        assert_eq!(cfg.animation_speed, 1.0);
        assert_eq!(cfg.animation_threshold, 0.001);
    }

    #[test]
    fn unknown_log_level_falls_back_to_info() {
        let cfg = AppConfig {
            log_level: "chatty".into(),
            ..Default::default()
        };
        assert_eq!(cfg.log_level(), log::Level::Info);
        let cfg = AppConfig {
            log_level: "debug".into(),
            ..Default::default()
        };
        assert_eq!(cfg.log_level(), log::Level::Debug);
    }
}
