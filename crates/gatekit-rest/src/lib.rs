//! # gatekit-rest
//!
//! Composes gatekit's authentication gates with CORS and request logging
//! decorators for axum routers.
//!
//! ```rust,ignore
//! use axum::{routing::get, Router};
//! use gatekit_rest::{RouterExt, SecurityConfig};
//!
//! let config: SecurityConfig = SecurityConfig::builder()
//!     .with_dotenv()
//!     .with_env_prefix("GATEKIT")
//!     .build()?;
//!
//! let app = Router::new()
//!     .route("/", get(|| async { "hello" }))
//!     .with_security(&config);
//! ```
//!
//! ## Features
//!
//! - `tracing` (default) - logging initialization via tracing-subscriber
//! - `jwt` (default) - bearer token gate

mod config;
mod layer;
mod router;
mod routes;

pub use config::{ConfigBuilder, ConfigError, LogConfig, SecurityConfig};
pub use layer::{
    CorsLayer, CorsService, LogRequest, RequestLogLayer, RequestSpan, ALLOW_HEADERS,
    ALLOW_METHODS, ALLOW_ORIGIN, DEFAULT_CONTENT_TYPE,
};
pub use router::RouterExt;
pub use routes::version_routes;

pub use gatekit::{build_info, write_json, BuildInfo, ErrorResponse, HandlerError, HandlerResult};

#[cfg(feature = "tracing")]
pub use gatekit::{init_logging, init_logging_from_env};
