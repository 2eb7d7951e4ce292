// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Engine configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DentaviewError, Result};

/// Persistent engine settings.
///
/// Detection and enhancement thresholds are deliberately absent: they are
/// fixed constants of the algorithms, not tunables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Preset id used when no explicit preset is requested.
    pub default_preset: String,
    /// Overlay the matched camera profile's optimizations in auto-enhance.
    pub auto_camera_profile: bool,
    /// Run feature detection before enhancing in auto-enhance.
    pub detect_before_enhance: bool,
    /// Tracing filter used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_preset: "smart-enhance".into(),
            auto_camera_profile: true,
            detect_before_enhance: true,
            log_filter: "info".into(),
        }
    }
}

impl EngineConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|err| DentaviewError::Config(format!("malformed config JSON: {err}")))?;
        if config.default_preset.trim().is_empty() {
            return Err(DentaviewError::Config(
                "default_preset must not be empty".into(),
            ));
        }
        Ok(config)
    }

    /// Load a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&contents)
    }

    /// Write the configuration as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_fills_defaults() {
        let config = EngineConfig::from_json_str(r#"{"default_preset": "dental-mode"}"#)
            .expect("valid config");
        assert_eq!(config.default_preset, "dental-mode");
        assert!(config.auto_camera_profile);
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn malformed_json_is_config_error() {
        let err = EngineConfig::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, DentaviewError::Config(_)));
    }

    #[test]
    fn empty_preset_rejected() {
        let err = EngineConfig::from_json_str(r#"{"default_preset": "  "}"#).unwrap_err();
        assert!(matches!(err, DentaviewError::Config(_)));
    }

    #[test]
    fn save_then_load_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("dentaview.json");
        let config = EngineConfig {
            auto_camera_profile: false,
            ..EngineConfig::default()
        };
        config.save(&path).expect("save");
        assert_eq!(EngineConfig::load(&path).expect("load"), config);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = EngineConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, DentaviewError::Io(_)));
    }
}
