//! Application configuration loaded from environment variables.

use event_bus::DeliveryMode;
use thiserror::Error;

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// A variable was set to a value the application does not understand.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid value {value:?} for {var}, expected one of: {expected}")]
pub struct ConfigError {
    pub var: &'static str,
    pub value: String,
    pub expected: &'static str,
}

/// Checkout configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
/// - `LOG_FORMAT`: `text` or `json` (default: `text`)
/// - `EVENT_BUS_DELIVERY`: `strict` or `best-effort` (default: `strict`)
/// - `DATABASE_URL`: when set, the request ledger and the integration event
///   log are stored in PostgreSQL instead of memory
#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub log_format: LogFormat,
    pub delivery_mode: DeliveryMode,
    pub database_url: Option<String>,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Loads configuration through `lookup`, which returns a variable's value
    /// if it is set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let lookup = |var: &str| lookup(var).filter(|v: &String| !v.trim().is_empty());

        let log_format = match lookup("LOG_FORMAT") {
            None => defaults.log_format,
            Some(v) => match v.trim().to_ascii_lowercase().as_str() {
                "text" => LogFormat::Text,
                "json" => LogFormat::Json,
                _ => return Err(invalid("LOG_FORMAT", v, "text, json")),
            },
        };

        let delivery_mode = match lookup("EVENT_BUS_DELIVERY") {
            None => defaults.delivery_mode,
            Some(v) => match v.trim().to_ascii_lowercase().as_str() {
                "strict" => DeliveryMode::Strict,
                "best-effort" | "best_effort" => DeliveryMode::BestEffort,
                _ => return Err(invalid("EVENT_BUS_DELIVERY", v, "strict, best-effort")),
            },
        };

        Ok(Self {
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
            log_format,
            delivery_mode,
            database_url: lookup("DATABASE_URL"),
        })
    }
}

fn invalid(var: &'static str, value: String, expected: &'static str) -> ConfigError {
    ConfigError {
        var,
        value,
        expected,
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            delivery_mode: DeliveryMode::Strict,
            database_url: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|var| vars.get(var).cloned())
    }

    #[test]
    fn test_default_values() {
        let config = load(&[]).unwrap();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_format, LogFormat::Text);
        assert_eq!(config.delivery_mode, DeliveryMode::Strict);
        assert!(config.database_url.is_none());
    }

    #[test]
    fn test_reads_every_variable() {
        let config = load(&[
            ("RUST_LOG", "ordering=debug"),
            ("LOG_FORMAT", "JSON"),
            ("EVENT_BUS_DELIVERY", "best-effort"),
            ("DATABASE_URL", "postgres://localhost/checkout"),
        ])
        .unwrap();

        assert_eq!(config.log_level, "ordering=debug");
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.delivery_mode, DeliveryMode::BestEffort);
        assert_eq!(
            config.database_url.as_deref(),
            Some("postgres://localhost/checkout")
        );
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let config = load(&[("DATABASE_URL", ""), ("LOG_FORMAT", "  ")]).unwrap();
        assert!(config.database_url.is_none());
        assert_eq!(config.log_format, LogFormat::Text);
    }

    #[test]
    fn test_rejects_unknown_delivery_mode() {
        let err = load(&[("EVENT_BUS_DELIVERY", "eventually")]).unwrap_err();
        assert_eq!(err.var, "EVENT_BUS_DELIVERY");
        assert_eq!(err.value, "eventually");
    }
}
