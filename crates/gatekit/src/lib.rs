//! # gatekit
//!
//! Shared utilities for gatekit crates.
//!
//! This crate provides the pieces used by both `gatekit-auth` and
//! `gatekit-rest`: configuration loading, logging setup, the JSON error
//! responder and build metadata.
//!
//! ## Features
//!
//! - `tracing` - Enable logging initialization with tracing-subscriber

mod config;
mod error;
mod logging;
mod version;

pub use config::{ConfigBuilder, ConfigError, ConfigFormat};
pub use error::{write_json, BoxError, ErrorResponse, HandlerError, HandlerResult, HttpError};
pub use logging::{LogConfig, LogFormat};
pub use version::BuildInfo;

#[cfg(feature = "tracing")]
pub use logging::{init_logging, init_logging_from_env};
