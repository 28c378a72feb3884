//! Password hashing helpers.
//!
//! Thin wrappers over `bcrypt`; hash internals are not a concern of this
//! codebase. Cost 10 matches the original deployment.

use thiserror::Error;

const BCRYPT_COST: u32 = 10;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PasswordError {
    #[error("failed to hash password")]
    Hash,
}

pub fn hash_password(plain: &str) -> Result<String, PasswordError> {
    bcrypt::hash(plain, BCRYPT_COST).map_err(|_| PasswordError::Hash)
}

/// Constant-message verify: a malformed stored hash counts as a mismatch
/// rather than an error, so callers cannot distinguish the cases.
pub fn verify_password(plain: &str, hashed: &str) -> bool {
    bcrypt::verify(plain, hashed).unwrap_or(false)
}
