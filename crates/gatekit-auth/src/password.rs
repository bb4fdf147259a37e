//! One-way password hashing with bcrypt.
//!
//! Hashes are salted and self-describing (`$2b$<cost>$...`), so only the
//! hash string needs to be stored. Not suitable for secrets that must be
//! recovered later.
//!
//! bcrypt only reads the first 72 bytes of its input. Longer passwords are
//! refused with [`HashError`] instead of being silently truncated, so two
//! passwords sharing a 72-byte prefix never verify against each other.

use crate::error::HashError;

/// bcrypt cost factor used for every new hash.
pub const DEFAULT_COST: u32 = 10;

/// Hash a password with a fresh random salt.
///
/// Fails for passwords past bcrypt's 72-byte input limit.
pub fn hash_password(password: impl AsRef<[u8]>) -> Result<String, HashError> {
    Ok(bcrypt::non_truncating_hash(password, DEFAULT_COST)?)
}

/// Check `password` against a hash produced by [`hash_password`].
///
/// Returns `false` on mismatch, when `hash` is not a valid bcrypt hash, and
/// for passwords past bcrypt's 72-byte input limit.
pub fn verify_password(hash: &str, password: impl AsRef<[u8]>) -> bool {
    match bcrypt::non_truncating_verify(password, hash) {
        Ok(matches) => matches,
        Err(e) => {
            tracing::debug!(error = %e, "rejecting password verification");
            false
        }
    }
}
