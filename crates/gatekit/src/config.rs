//! Configuration loading utilities.

use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[cfg(feature = "tracing")]
use crate::logging::{init_logging, LogConfig};

/// Error type for configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found.
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// Failed to parse configuration.
    #[error("Failed to parse config: {0}")]
    Parse(String),
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        Self::Parse(err.to_string())
    }
}

/// Supported config file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    DotEnv,
    Toml,
    Yaml,
    Json,
}

impl ConfigFormat {
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?;
        match ext.to_lowercase().as_str() {
            "env" => Some(Self::DotEnv),
            "toml" => Some(Self::Toml),
            "yaml" | "yml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    fn is_dotenv(path: &Path) -> bool {
        match Self::from_path(path) {
            Some(Self::DotEnv) => true,
            Some(_) => false,
            None => {
                let file_name = path.file_name().and_then(|s| s.to_str()).unwrap_or("");
                file_name.starts_with(".env") || file_name == "env"
            }
        }
    }
}

/// Configuration builder.
///
/// Sources are layered in this order, later ones winning:
/// `.env` files (exported into the process environment), at most one
/// TOML/YAML/JSON file, then environment variables.
///
/// Nested keys are read from the environment with a `__` separator, so
/// `BASIC_AUTH__USER` fills `basic_auth.user`. With a prefix set,
/// `GATEKIT_JWT_SECRET` fills `jwt_secret`.
///
/// # Example
///
/// ```ignore
/// use gatekit::ConfigBuilder;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct MyConfig {
///     jwt_secret: String,
/// }
///
/// let config: MyConfig = ConfigBuilder::new()
///     .with_dotenv()
///     .with_env_prefix("GATEKIT")
///     .with_config_file("gatekit.toml")
///     .build()?;
/// ```
#[derive(Default)]
pub struct ConfigBuilder {
    load_default_dotenv: bool,
    config_files: Vec<PathBuf>,
    env_prefix: Option<String>,
    #[cfg(feature = "tracing")]
    init_logging: bool,
}

impl ConfigBuilder {
    /// Create a new configuration builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load environment variables from `.env` file in current directory.
    pub fn with_dotenv(mut self) -> Self {
        self.load_default_dotenv = true;
        self
    }

    /// Load a configuration file.
    ///
    /// File format is detected from extension:
    /// - `.env` - Environment variables (multiple allowed)
    /// - `.toml` / `.yaml` / `.json` - Config file (last one used)
    pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_files.push(path.into());
        self
    }

    /// Only read environment variables starting with `{prefix}_`.
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    /// Initialize logging from environment variables (`LOG_FORMAT`, `RUST_LOG`).
    #[cfg(feature = "tracing")]
    pub fn with_logging_from_env(mut self) -> Self {
        self.init_logging = true;
        self
    }

    /// Build and return the configuration.
    pub fn build<C: DeserializeOwned>(self) -> Result<C, ConfigError> {
        if self.load_default_dotenv {
            let _ = dotenvy::dotenv();
        }

        let mut main_config_file: Option<&Path> = None;
        for path in &self.config_files {
            if ConfigFormat::is_dotenv(path) {
                if path.exists() {
                    let _ = dotenvy::from_path(path);
                }
            } else if ConfigFormat::from_path(path).is_some() {
                main_config_file = Some(path);
            }
        }

        #[cfg(feature = "tracing")]
        if self.init_logging {
            init_logging(&LogConfig::from_env());
        }

        let mut builder = config::Config::builder();
        if let Some(path) = main_config_file {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            builder = builder.add_source(config::File::from(path));
        }

        let mut env = config::Environment::default()
            .separator("__")
            .try_parsing(true);
        if let Some(prefix) = &self.env_prefix {
            env = env.prefix(prefix).prefix_separator("_");
        }

        Ok(builder.add_source(env).build()?.try_deserialize()?)
    }
}
