#![forbid(unsafe_code)]

//! Tunables for the preview runtime.
//!
//! Every field defaults to the value the runtime otherwise hard-codes, so
//! `PreviewConfig::default()` behaves exactly like an unconfigured runtime.
//!
//! # Loading
//!
//! ```toml
//! # livepane.toml
//! dock_margin = 16.0
//! min_free_extent = 64.0
//! max_evaluation_passes = 32
//! ```
//!
//! ```rust,ignore
//! let config = PreviewConfig::from_toml_file("livepane.toml")?;
//! let config = PreviewConfig::from_json_str(json)?;
//! ```

#[cfg(feature = "config")]
use std::path::Path;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::reactive::listener::DEFAULT_MAX_PASSES;

/// Gap kept between a docked viewport and the container edge, in pixels.
pub const DEFAULT_DOCK_MARGIN: f64 = 16.0;

/// Smallest width/height a free viewport is shrunk to, in pixels.
pub const DEFAULT_MIN_FREE_EXTENT: f64 = 64.0;

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct PreviewConfig {
    /// Margin used by the docked layouts and the free-state shrink rule.
    pub dock_margin: f64,

    /// Lower bound for width/height when shrinking a free viewport.
    pub min_free_extent: f64,

    /// Cap on evaluation passes when handlers trigger further changes.
    pub max_evaluation_passes: u32,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            dock_margin: DEFAULT_DOCK_MARGIN,
            min_free_extent: DEFAULT_MIN_FREE_EXTENT,
            max_evaluation_passes: DEFAULT_MAX_PASSES,
        }
    }
}

impl PreviewConfig {
    /// Load from a TOML string.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str::<Self>(s)?.validated()
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str::<Self>(s)?.validated()
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Validate all parameters are within acceptable ranges.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !self.dock_margin.is_finite() || self.dock_margin < 0.0 {
            errors.push(format!(
                "dock_margin must be finite and >= 0, got {}",
                self.dock_margin
            ));
        }

        if !self.min_free_extent.is_finite() || self.min_free_extent <= 0.0 {
            errors.push(format!(
                "min_free_extent must be finite and > 0, got {}",
                self.min_free_extent
            ));
        }

        if self.max_evaluation_passes == 0 {
            errors.push("max_evaluation_passes must be > 0".into());
        }

        errors
    }

    /// Return `self` if valid, otherwise every validation error at once.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

/// Errors that can occur when loading a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error reading a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parse error.
    #[cfg(feature = "config")]
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON parse error.
    #[cfg(feature = "config")]
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Validation errors.
    #[error("validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_hardcoded_values() {
        let config = PreviewConfig::default();
        assert_eq!(config.dock_margin, 16.0);
        assert_eq!(config.min_free_extent, 64.0);
        assert_eq!(config.max_evaluation_passes, DEFAULT_MAX_PASSES);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn validate_reports_every_problem() {
        let config = PreviewConfig {
            dock_margin: -1.0,
            min_free_extent: f64::NAN,
            max_evaluation_passes: 0,
        };
        let errors = config.validate();
        assert_eq!(errors.len(), 3);
        assert!(errors[0].contains("dock_margin"));
        assert!(errors[1].contains("min_free_extent"));
        assert!(errors[2].contains("max_evaluation_passes"));
    }

    #[test]
    fn validated_wraps_errors() {
        let err = PreviewConfig {
            max_evaluation_passes: 0,
            ..PreviewConfig::default()
        }
        .validated()
        .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref e) if e.len() == 1));
        assert_eq!(
            err.to_string(),
            "validation errors: max_evaluation_passes must be > 0"
        );
    }

    #[cfg(feature = "config")]
    mod loading {
        use super::super::*;
        use std::io::Write;

        #[test]
        fn partial_toml_keeps_defaults() {
            let config = PreviewConfig::from_toml_str("dock_margin = 8.0\n").unwrap();
            assert_eq!(config.dock_margin, 8.0);
            assert_eq!(config.min_free_extent, DEFAULT_MIN_FREE_EXTENT);
        }

        #[test]
        fn json_roundtrip() {
            let config = PreviewConfig {
                dock_margin: 4.0,
                min_free_extent: 32.0,
                max_evaluation_passes: 8,
            };
            let json = serde_json::to_string(&config).unwrap();
            assert_eq!(PreviewConfig::from_json_str(&json).unwrap(), config);
        }

        #[test]
        fn invalid_toml_is_a_parse_error() {
            let err = PreviewConfig::from_toml_str("dock_margin = \"wide\"").unwrap_err();
            assert!(matches!(err, ConfigError::Toml(_)));
        }

        #[test]
        fn invalid_values_fail_validation() {
            let err = PreviewConfig::from_json_str(r#"{"min_free_extent": 0}"#).unwrap_err();
            assert!(matches!(err, ConfigError::Validation(_)));
        }

        #[test]
        fn loads_from_file() {
            let mut file = tempfile::NamedTempFile::new().unwrap();
            writeln!(file, "max_evaluation_passes = 3").unwrap();
            let config = PreviewConfig::from_toml_file(file.path()).unwrap();
            assert_eq!(config.max_evaluation_passes, 3);
        }

        #[test]
        fn missing_file_is_io_error() {
            let err = PreviewConfig::from_json_file("/nonexistent/livepane.json").unwrap_err();
            assert!(matches!(err, ConfigError::Io(_)));
        }
    }
}
