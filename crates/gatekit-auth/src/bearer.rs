//! Bearer token authentication.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderValue;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::jwt::{expiry, Claims, TokenCodec};
use crate::layer::Gate;
use crate::AuthError;

/// Claims of the token that authenticated the current request.
///
/// Inserted into request extensions by [`BearerAuth`] and usable directly
/// as a handler argument:
///
/// ```ignore
/// async fn me(VerifiedClaims(claims): VerifiedClaims) -> Json<Claims> {
///     Json(claims)
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedClaims(pub Claims);

impl<S: Send + Sync> FromRequestParts<S> for VerifiedClaims {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<VerifiedClaims>()
            .cloned()
            .ok_or(AuthError::MissingToken)
    }
}

/// Gate requiring `Authorization: Bearer <token>` with a valid, unexpired
/// token.
#[derive(Debug, Clone)]
pub struct BearerAuth {
    codec: TokenCodec,
}

impl BearerAuth {
    pub fn new(codec: TokenCodec) -> Self {
        Self { codec }
    }

    /// Runs every check against a single clock reading `now` (Unix seconds).
    ///
    /// Tokens whose `exp` is at or before `now` are refused, including tokens
    /// without a numeric `exp`.
    pub fn authorize(&self, header: Option<&HeaderValue>, now: i64) -> Result<Claims, AuthError> {
        let header = header
            .filter(|v| !v.is_empty())
            .ok_or(AuthError::MissingToken)?;
        let value = header.to_str().map_err(|_| AuthError::InvalidAuthHeader)?;

        let token = match value.split(' ').collect::<Vec<_>>()[..] {
            [scheme, token] if scheme.eq_ignore_ascii_case("bearer") => token,
            _ => return Err(AuthError::InvalidAuthHeader),
        };

        let claims = self.codec.parse(token)?;

        let exp = expiry(&claims);
        if exp <= now {
            return Err(AuthError::TokenExpired { exp });
        }

        Ok(claims)
    }
}

impl Gate for BearerAuth {
    fn check(&self, parts: &mut Parts) -> Result<(), AuthError> {
        match self.authorize(parts.headers.get(AUTHORIZATION), unix_now()) {
            Ok(claims) => {
                parts.extensions.insert(VerifiedClaims(claims));
                Ok(())
            }
            Err(e) => {
                match &e {
                    AuthError::MissingToken | AuthError::InvalidAuthHeader => {
                        tracing::debug!(error = %e, "bearer auth rejected")
                    }
                    _ => tracing::warn!(error = %e, "bearer auth rejected"),
                }
                Err(e)
            }
        }
    }
}

/// Current wall-clock time in Unix seconds.
pub fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
