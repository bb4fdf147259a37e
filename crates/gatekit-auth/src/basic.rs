//! HTTP basic authentication against a single static user.

use axum::http::request::Parts;
use axum_extra::headers::authorization::Basic;
use axum_extra::headers::{Authorization, HeaderMapExt};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::fmt;
use subtle::ConstantTimeEq;

use crate::layer::Gate;
use crate::AuthError;

/// Gate accepting exactly one user/password pair.
#[derive(Clone, Deserialize)]
pub struct BasicAuth {
    user: String,
    password: String,
}

impl fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuth")
            .field("user", &self.user)
            .finish_non_exhaustive()
    }
}

impl BasicAuth {
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
        }
    }

    pub fn user(&self) -> &str {
        &self.user
    }
}

impl Gate for BasicAuth {
    fn check(&self, parts: &mut Parts) -> Result<(), AuthError> {
        let Some(credentials) = parts.headers.typed_get::<Authorization<Basic>>() else {
            tracing::debug!("basic auth credentials missing");
            return Err(AuthError::MissingCredentials);
        };

        let user_ok = credentials_eq(credentials.username(), &self.user);
        let password_ok = credentials_eq(credentials.password(), &self.password);
        if user_ok & password_ok {
            Ok(())
        } else {
            tracing::warn!(user = credentials.username(), "basic auth credentials rejected");
            Err(AuthError::InvalidCredentials)
        }
    }
}

/// Exact equality in time independent of where the inputs differ. Both sides
/// are hashed first so their lengths do not leak either.
fn credentials_eq(given: &str, expected: &str) -> bool {
    let given = Sha256::digest(given.as_bytes());
    let expected = Sha256::digest(expected.as_bytes());
    given.as_slice().ct_eq(expected.as_slice()).into()
}
