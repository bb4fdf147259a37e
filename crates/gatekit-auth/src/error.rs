//! Authentication error types

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use gatekit::HandlerError;
use thiserror::Error;

/// Challenge sent with every basic-auth rejection.
pub const BASIC_CHALLENGE: &str = "Basic realm=Restricted";

/// Plain-text body of every gate rejection.
const UNAUTHORIZED_BODY: &str = "Unauthorized";

/// Token issuance and verification failures.
#[cfg(feature = "jwt")]
#[derive(Error, Debug)]
pub enum TokenError {
    #[error("failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),

    #[error("malformed token: {0}")]
    Malformed(String),

    #[error("unexpected signing method: {0}")]
    UnexpectedSigningMethod(String),

    #[error("token signature is invalid")]
    SignatureInvalid,
}

/// Password hashing failure.
#[cfg(feature = "password")]
#[derive(Error, Debug)]
#[error("password hashing failed: {0}")]
pub struct HashError(#[from] pub bcrypt::BcryptError);

/// Reasons a request was refused by a gate.
///
/// The reason is for logs only: every variant renders the same plain-text
/// `401 Unauthorized` response.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("missing basic auth credentials")]
    MissingCredentials,

    #[error("basic auth credentials do not match")]
    InvalidCredentials,

    #[error("missing authorization header")]
    MissingToken,

    #[error("authorization header is not a bearer token")]
    InvalidAuthHeader,

    #[cfg(feature = "jwt")]
    #[error("invalid token: {0}")]
    InvalidToken(#[from] TokenError),

    #[error("token expired at {exp}")]
    TokenExpired { exp: i64 },
}

impl AuthError {
    fn is_basic(&self) -> bool {
        matches!(self, Self::MissingCredentials | Self::InvalidCredentials)
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let mut response = (StatusCode::UNAUTHORIZED, UNAUTHORIZED_BODY).into_response();
        if self.is_basic() {
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                HeaderValue::from_static(BASIC_CHALLENGE),
            );
        }
        response
    }
}

#[cfg(feature = "jwt")]
impl From<TokenError> for HandlerError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Signing(_) => HandlerError::internal(err),
            _ => HandlerError::new(err, StatusCode::UNAUTHORIZED, "Unauthorized"),
        }
    }
}

#[cfg(feature = "password")]
impl From<HashError> for HandlerError {
    fn from(err: HashError) -> Self {
        HandlerError::internal(err)
    }
}
