//! Authentication building blocks for gatekit.
//!
//! Provides HS256 token issuance and verification, bcrypt password hashing,
//! and tower layers gating axum routers behind basic or bearer auth.
//!
//! # Example
//!
//! ```rust,ignore
//! use axum::{Router, routing::get};
//! use gatekit_auth::{AuthExt, TokenCodec, VerifiedClaims};
//!
//! let codec = TokenCodec::new("your-secret-key");
//!
//! let app = Router::new()
//!     .route("/protected", get(|VerifiedClaims(claims): VerifiedClaims| async move {
//!         format!("{claims:?}")
//!     }))
//!     .with_bearer_auth(codec);
//! ```
//!
//! Every rejection answers `401` with the same plain-text `Unauthorized`
//! body; the reason is only recorded in the log.

#[cfg(feature = "jwt")]
mod bearer;
#[cfg(feature = "jwt")]
mod jwt;
#[cfg(feature = "password")]
mod password;

mod basic;
mod error;
mod layer;

pub use basic::BasicAuth;
pub use error::{AuthError, BASIC_CHALLENGE};
pub use layer::{AuthExt, AuthLayer, AuthService, Gate};

#[cfg(feature = "jwt")]
pub use bearer::{unix_now, BearerAuth, VerifiedClaims};
#[cfg(feature = "jwt")]
pub use error::TokenError;
#[cfg(feature = "jwt")]
pub use jwt::{expiry, Claims, TokenCodec};

#[cfg(feature = "password")]
pub use error::HashError;
#[cfg(feature = "password")]
pub use password::{hash_password, verify_password, DEFAULT_COST};
