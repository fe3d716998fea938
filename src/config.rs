//! Configuration management for the fraud detection service

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub model: ModelConfig,
    pub training: TrainingConfig,
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,
    /// Bind port
    pub port: u16,
    /// Interval between metrics summary logs, in seconds
    pub metrics_interval_secs: u64,
}

/// Model artifact configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Path to the persisted model file
    pub path: String,
}

/// Training pipeline configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Path to the training dataset (CSV)
    pub data_path: String,
    /// Fraction of rows held out for evaluation
    pub test_size: f64,
    /// Seed for the split and the oversampler
    pub seed: u64,
    /// Number of boosting iterations
    pub iterations: usize,
    /// Maximum tree depth
    pub max_depth: u32,
    /// Shrinkage applied to each tree's contribution
    pub learning_rate: f32,
    /// Neighbors considered when synthesizing minority samples
    pub smote_neighbors: usize,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (json, pretty)
    pub format: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            metrics_interval_secs: 30,
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: "models/fraud_gbdt.model".to_string(),
        }
    }
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            data_path: "data/transactions.csv".to_string(),
            test_size: 0.2,
            seed: 42,
            iterations: 100,
            max_depth: 6,
            learning_rate: 0.1,
            smote_neighbors: 5,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default file location.
    ///
    /// A missing file is not an error: defaults apply, and `KENAM_`-prefixed
    /// environment variables (e.g. `KENAM_SERVER__PORT`) override both.
    pub fn load() -> Result<Self> {
        Self::load_from_path("config/config.toml")
    }

    /// Load configuration from a specific path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()).required(false))
            .add_source(Environment::with_prefix("KENAM").separator("__"))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.model.path, "models/fraud_gbdt.model");
        assert_eq!(config.training.test_size, 0.2);
        assert_eq!(config.training.seed, 42);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = AppConfig::load_from_path("config/does-not-exist.toml").unwrap();
        assert_eq!(config.server.port, AppConfig::default().server.port);
        assert_eq!(config.training.iterations, 100);
    }
}
