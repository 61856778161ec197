//! GVA Configuration Management
//!
//! Handles configuration from environment variables and TOML files
//! with sensible defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Variant-disease association table (tab-separated)
    pub variants_path: PathBuf,

    /// Gene-disease association table (tab-separated)
    pub genes_path: PathBuf,

    /// Minimum normalized similarity for accepting a sentence match.
    /// Below this, an aligned sentence is more likely wrong than right.
    pub threshold: f64,

    /// Annotator provenance tag for externally sourced associations
    pub annotator: String,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            variants_path: PathBuf::from("vdas_version_2_mesh.tsv"),
            genes_path: PathBuf::from("gdas_version_1_mesh.tsv"),
            threshold: 0.70,
            annotator: "BeFree@example.com".to_string(),
            logging: LoggingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(path) = std::env::var("GVA_VARIANTS") {
            config.variants_path = PathBuf::from(path);
        }
        if let Ok(path) = std::env::var("GVA_GENES") {
            config.genes_path = PathBuf::from(path);
        }
        if let Ok(threshold) = std::env::var("GVA_THRESHOLD") {
            config.threshold = threshold.parse().map_err(|_| ConfigError::InvalidValue {
                key: "GVA_THRESHOLD".to_string(),
                value: threshold,
            })?;
        }
        if let Ok(annotator) = std::env::var("GVA_ANNOTATOR") {
            config.annotator = annotator;
        }
        if let Ok(level) = std::env::var("GVA_LOG_LEVEL") {
            config.logging.level = level;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::FileReadError {
            path: path.clone(),
            source: e,
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path,
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(ConfigError::InvalidValue {
                key: "threshold".to_string(),
                value: self.threshold.to_string(),
            });
        }
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// JSON format for logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = AppConfig::default();
        assert_eq!(config.threshold, 0.70);
        assert_eq!(config.logging.level, "info");
        assert!(config.variants_path.to_string_lossy().ends_with(".tsv"));
    }

    #[test]
    fn threshold_out_of_range_rejected() {
        let config = AppConfig {
            threshold: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn parse_toml() {
        let toml = r#"
            variants_path = "v.tsv"
            genes_path = "g.tsv"
            threshold = 0.8
            annotator = "curator@example.com"

            [logging]
            level = "debug"
            json_format = false
        "#;
        let config: AppConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.threshold, 0.8);
        assert_eq!(config.annotator, "curator@example.com");
        assert_eq!(config.logging.level, "debug");
    }
}
