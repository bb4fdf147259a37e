use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use jsonwebtoken::{crypto, encode, Algorithm, DecodingKey, EncodingKey, Header};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::error::TokenError;

/// Claims carried by a token: an unordered JSON object.
pub type Claims = serde_json::Map<String, Value>;

/// Creates and verifies HS256 tokens under a single shared secret.
///
/// Verification only checks structure and signature; liveness (`exp`) is
/// left to the caller, see [`expiry`].
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl<'de> Deserialize<'de> for TokenCodec {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            secret: String,
        }
        let raw = Raw::deserialize(deserializer)?;
        Ok(Self::new(raw.secret))
    }
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec").finish_non_exhaustive()
    }
}

/// The part of the JOSE header needed to pick a verifier.
#[derive(Deserialize)]
struct RawHeader {
    alg: String,
}

impl TokenCodec {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        let secret = secret.as_ref();
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
        }
    }

    /// Sign `claims` into a compact token.
    ///
    /// Fails only when `claims` cannot be serialized to JSON.
    pub fn create<T: Serialize>(&self, claims: &T) -> Result<String, TokenError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(TokenError::Signing)
    }

    /// Verify `token` and return its claims.
    ///
    /// Any declared algorithm outside the HMAC family is refused before the
    /// signature is looked at. A `null` payload yields empty claims.
    pub fn parse(&self, token: &str) -> Result<Claims, TokenError> {
        let mut segments = token.split('.');
        let (Some(header), Some(payload), Some(signature), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return Err(TokenError::Malformed(
                "token must have three segments".to_string(),
            ));
        };

        let RawHeader { alg } = decode_segment(header)?;
        let algorithm = match Algorithm::from_str(&alg) {
            Ok(alg @ (Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512)) => alg,
            _ => return Err(TokenError::UnexpectedSigningMethod(alg)),
        };

        let message = &token[..header.len() + 1 + payload.len()];
        let valid = crypto::verify(signature, message.as_bytes(), &self.decoding_key, algorithm)
            .map_err(|e| TokenError::Malformed(e.to_string()))?;
        if !valid {
            return Err(TokenError::SignatureInvalid);
        }

        match decode_segment::<Value>(payload)? {
            Value::Object(claims) => Ok(claims),
            Value::Null => Ok(Claims::new()),
            other => Err(TokenError::Malformed(format!(
                "claims must be a JSON object, got {other}"
            ))),
        }
    }
}

fn decode_segment<T: DeserializeOwned>(segment: &str) -> Result<T, TokenError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|e| TokenError::Malformed(e.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|e| TokenError::Malformed(e.to_string()))
}

/// Expiry of `claims` as Unix seconds.
///
/// A missing or non-numeric `exp` reads as `0`, so such tokens are always
/// treated as expired by [`BearerAuth`](crate::BearerAuth).
pub fn expiry(claims: &Claims) -> i64 {
    claims
        .get("exp")
        .and_then(Value::as_f64)
        .map(|exp| exp as i64)
        .unwrap_or(0)
}
