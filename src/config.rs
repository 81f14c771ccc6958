//! Configuration management for the fraud verdict service

use anyhow::{bail, Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Env var naming an alternative config file
pub const CONFIG_PATH_ENV: &str = "CARD_FRAUD_CONFIG";

/// Default config file location
pub const DEFAULT_CONFIG_PATH: &str = "config/config.toml";

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub model: ModelConfig,
    pub server: ServerConfig,
    pub form: FormConfig,
    pub logging: LoggingConfig,
    pub metrics: MetricsConfig,
}

/// Classifier artifact configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Path to the ONNX export of the trained classifier
    pub path: PathBuf,
    /// Class-1 probability cutoff for models without a label output
    pub decision_threshold: f32,
    /// Number of threads for ONNX inference (default: 1)
    pub onnx_threads: usize,
}

/// HTTP listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Amount widget bounds for the form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormConfig {
    /// Upper clamp for submitted amounts
    pub max_amount: f64,
    /// Value pre-filled on a fresh form
    pub default_amount: f64,
    pub amount_step: f64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (json, pretty)
    pub format: String,
}

/// Periodic metrics summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Seconds between summaries, 0 disables the reporter
    pub report_interval_secs: u64,
}

impl AppConfig {
    /// Load configuration from `$CARD_FRAUD_CONFIG` or the default path
    pub fn load() -> Result<Self> {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from_path(path)
    }

    /// Load configuration from a specific path.
    ///
    /// Layers built-in defaults, the file (if present) and `CARD_FRAUD__*`
    /// environment overrides, in that order.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let defaults = Config::try_from(&AppConfig::default())
            .context("Failed to build default configuration")?;

        let config = Config::builder()
            .add_source(defaults)
            .add_source(File::from(path.as_ref()).required(false))
            .add_source(
                Environment::with_prefix("CARD_FRAUD")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to build configuration")?;

        let config: AppConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings no request could be served with
    pub fn validate(&self) -> Result<()> {
        let threshold = self.model.decision_threshold;
        if !(threshold > 0.0 && threshold < 1.0) {
            bail!("model.decision_threshold must be in (0, 1), got {}", threshold);
        }
        if !(self.form.max_amount > 0.0) {
            bail!("form.max_amount must be positive, got {}", self.form.max_amount);
        }
        if !(0.0..=self.form.max_amount).contains(&self.form.default_amount) {
            bail!(
                "form.default_amount {} outside [0, {}]",
                self.form.default_amount,
                self.form.max_amount
            );
        }
        if !matches!(self.logging.format.as_str(), "json" | "pretty") {
            bail!("logging.format must be \"json\" or \"pretty\", got {:?}", self.logging.format);
        }
        Ok(())
    }

    /// Socket address string for the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model: ModelConfig {
                path: PathBuf::from("model/xgboost_fraud_model.onnx"),
                decision_threshold: 0.5,
                onnx_threads: 1,
            },
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8501,
            },
            form: FormConfig {
                max_amount: 100_000.0,
                default_amount: 100.0,
                amount_step: 10.0,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
            metrics: MetricsConfig {
                report_interval_secs: 60,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8501);
        assert_eq!(config.model.decision_threshold, 0.5);
        assert_eq!(config.form.max_amount, 100_000.0);
        assert_eq!(config.bind_address(), "0.0.0.0:8501");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = AppConfig::load_from_path("no/such/config.toml").unwrap();
        assert_eq!(config.model.path, PathBuf::from("model/xgboost_fraud_model.onnx"));
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[model]
path = "artifacts/clf.onnx"
decision_threshold = 0.7

[server]
port = 9000

[logging]
format = "json"
"#
        )
        .unwrap();

        let config = AppConfig::load_from_path(file.path()).unwrap();
        assert_eq!(config.model.path, PathBuf::from("artifacts/clf.onnx"));
        assert_eq!(config.model.decision_threshold, 0.7);
        assert_eq!(config.model.onnx_threads, 1);
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_validation() {
        let mut config = AppConfig::default();
        config.model.decision_threshold = 1.5;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.form.default_amount = -1.0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.logging.format = "xml".to_string();
        assert!(config.validate().is_err());
    }
}
