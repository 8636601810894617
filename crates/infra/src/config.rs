//! Application configuration, read from `OPSDESK_*` environment variables.

use serde::Serialize;
use thiserror::Error;

use opsdesk_observability::LogFormat;

pub const DEFAULT_PROJECT_ID: &str = "opsdesk-dev";
pub const DEFAULT_EXPIRY_WINDOW_DAYS: i64 = 30;
pub const DEFAULT_CURRENCY: &str = "USD";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a boolean (true/false/1/0), got '{value}'")]
    InvalidBool { var: &'static str, value: String },

    #[error("{var} must be a whole number of days, got '{value}'")]
    InvalidDays { var: &'static str, value: String },

    #[error("{var}: {message}")]
    Invalid { var: &'static str, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppConfig {
    pub project_id: String,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub offline_cache: bool,
    pub log_format: LogFormat,
    /// Days ahead of an end date at which licenses/contracts show as expiring.
    pub expiry_window_days: i64,
    pub currency: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            project_id: DEFAULT_PROJECT_ID.to_string(),
            api_key: None,
            offline_cache: true,
            log_format: LogFormat::Json,
            expiry_window_days: DEFAULT_EXPIRY_WINDOW_DAYS,
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build config from any variable source. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| {
            lookup(var)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let offline_cache = match get("OPSDESK_OFFLINE_CACHE") {
            None => defaults.offline_cache,
            Some(value) => parse_bool(&value).ok_or(ConfigError::InvalidBool {
                var: "OPSDESK_OFFLINE_CACHE",
                value,
            })?,
        };

        let log_format = match get("OPSDESK_LOG_FORMAT") {
            None => defaults.log_format,
            Some(value) => value.parse().map_err(|e: opsdesk_observability::UnknownLogFormat| {
                ConfigError::Invalid {
                    var: "OPSDESK_LOG_FORMAT",
                    message: e.to_string(),
                }
            })?,
        };

        let expiry_window_days = match get("OPSDESK_EXPIRY_WINDOW_DAYS") {
            None => defaults.expiry_window_days,
            Some(value) => match value.parse::<i64>() {
                Ok(days) if days >= 0 => days,
                _ => {
                    return Err(ConfigError::InvalidDays {
                        var: "OPSDESK_EXPIRY_WINDOW_DAYS",
                        value,
                    });
                }
            },
        };

        let currency = match get("OPSDESK_CURRENCY") {
            None => defaults.currency,
            Some(code) if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) => {
                code.to_ascii_uppercase()
            }
            Some(code) => {
                return Err(ConfigError::Invalid {
                    var: "OPSDESK_CURRENCY",
                    message: format!("'{code}' is not a 3-letter currency code"),
                });
            }
        };

        let api_key = get("OPSDESK_API_KEY");
        if api_key.is_none() {
            tracing::warn!("OPSDESK_API_KEY is not set; hosted services will reject requests");
        }

        Ok(Self {
            project_id: get("OPSDESK_PROJECT_ID").unwrap_or(defaults.project_id),
            api_key,
            offline_cache,
            log_format,
            expiry_window_days,
            currency,
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| vars.get(var).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn reads_every_variable() {
        let config = AppConfig::from_lookup(lookup(&[
            ("OPSDESK_PROJECT_ID", "acme-prod"),
            ("OPSDESK_API_KEY", "AIzaSyExample"),
            ("OPSDESK_OFFLINE_CACHE", "off"),
            ("OPSDESK_LOG_FORMAT", "pretty"),
            ("OPSDESK_EXPIRY_WINDOW_DAYS", "45"),
            ("OPSDESK_CURRENCY", "eur"),
        ]))
        .unwrap();

        assert_eq!(config.project_id, "acme-prod");
        assert_eq!(config.api_key.as_deref(), Some("AIzaSyExample"));
        assert!(!config.offline_cache);
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.expiry_window_days, 45);
        assert_eq!(config.currency, "EUR");
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = AppConfig::from_lookup(lookup(&[("OPSDESK_PROJECT_ID", "  ")])).unwrap();
        assert_eq!(config.project_id, DEFAULT_PROJECT_ID);
    }

    #[test]
    fn malformed_values_are_errors() {
        let err = AppConfig::from_lookup(lookup(&[("OPSDESK_OFFLINE_CACHE", "maybe")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidBool {
                var: "OPSDESK_OFFLINE_CACHE",
                value: "maybe".to_string()
            }
        );

        let err = AppConfig::from_lookup(lookup(&[("OPSDESK_EXPIRY_WINDOW_DAYS", "-3")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDays { .. }));

        assert!(AppConfig::from_lookup(lookup(&[("OPSDESK_LOG_FORMAT", "xml")])).is_err());
        assert!(AppConfig::from_lookup(lookup(&[("OPSDESK_CURRENCY", "EURO")])).is_err());
    }

    #[test]
    fn api_key_is_not_serialized() {
        let config = AppConfig {
            api_key: Some("secret".to_string()),
            ..AppConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secret"));
    }
}
