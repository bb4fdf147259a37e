//! Logging initialization.

use serde::Deserialize;
use std::{env, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Text,
        })
    }
}

impl<'de> Deserialize<'de> for LogFormat {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(s.parse().unwrap_or_default())
    }
}

impl LogFormat {
    pub fn from_env() -> Self {
        env::var("LOG_FORMAT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }
}

/// Log output settings.
///
/// `RUST_LOG`, when set, always takes precedence over `filter`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub format: LogFormat,
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Text,
            filter: "info".to_string(),
        }
    }
}

impl LogConfig {
    pub fn from_env() -> Self {
        Self {
            format: LogFormat::from_env(),
            ..Self::default()
        }
    }
}

/// Installs the global subscriber. Later calls are no-ops.
#[cfg(feature = "tracing")]
pub fn init_logging(config: &LogConfig) {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.filter));

    let _ = match config.format {
        LogFormat::Text => fmt().with_env_filter(env_filter).try_init(),
        LogFormat::Json => fmt()
            .json()
            .with_current_span(false)
            .with_env_filter(env_filter)
            .try_init(),
    };
}

#[cfg(feature = "tracing")]
pub fn init_logging_from_env() {
    init_logging(&LogConfig::from_env());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_format_from_str() {
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("text".parse::<LogFormat>().unwrap(), LogFormat::Text);
        assert_eq!("anything".parse::<LogFormat>().unwrap(), LogFormat::Text);
        assert_eq!("".parse::<LogFormat>().unwrap(), LogFormat::Text);
    }

    #[test]
    fn log_config_deserializes_with_defaults() {
        let config: LogConfig = serde_json::from_str(r#"{"format": "Json"}"#).unwrap();
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.filter, "info");

        let config: LogConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, LogConfig::default());
    }

    #[cfg(feature = "tracing")]
    #[test]
    fn init_logging_is_idempotent() {
        init_logging(&LogConfig::default());
        init_logging(&LogConfig {
            format: LogFormat::Json,
            filter: "debug".to_string(),
        });
    }
}
