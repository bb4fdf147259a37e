//! Security configuration.

use gatekit_auth::BasicAuth;
use serde::Deserialize;
use std::fmt;

pub use gatekit::{ConfigBuilder, ConfigError, LogConfig};

#[cfg(feature = "jwt")]
use gatekit_auth::TokenCodec;

/// Settings consumed by [`RouterExt::with_security`](crate::RouterExt::with_security).
///
/// When both `jwt_secret` and `basic_auth` are set, bearer auth wins.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Shared HMAC secret for bearer tokens.
    pub jwt_secret: Option<String>,
    /// Static `{ user, password }` pair for basic auth.
    pub basic_auth: Option<BasicAuth>,
    /// Add permissive CORS headers.
    pub cors: bool,
    /// Log one record per request.
    pub log_requests: bool,
    pub log: LogConfig,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            basic_auth: None,
            cors: true,
            log_requests: true,
            log: LogConfig::default(),
        }
    }
}

impl fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "<redacted>"))
            .field("basic_auth", &self.basic_auth)
            .field("cors", &self.cors)
            .field("log_requests", &self.log_requests)
            .field("log", &self.log)
            .finish()
    }
}

impl SecurityConfig {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let config: SecurityConfig = SecurityConfig::builder()
    ///     .with_dotenv()
    ///     .with_env_prefix("GATEKIT")
    ///     .with_config_file("gatekit.toml")
    ///     .build()?;
    /// ```
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Codec for the configured secret, if any.
    #[cfg(feature = "jwt")]
    pub fn token_codec(&self) -> Option<TokenCodec> {
        self.jwt_secret.as_deref().map(TokenCodec::new)
    }
}

impl AsRef<SecurityConfig> for SecurityConfig {
    fn as_ref(&self) -> &SecurityConfig {
        self
    }
}
