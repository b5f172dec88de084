//! Argon2id password hashing and verification.
//!
//! Hashes are stored as PHC strings, so the algorithm parameters and the
//! per-password random salt travel with the hash itself. Both operations are
//! deliberately slow; async callers should run them on a blocking thread.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use crate::error::CoreError;

/// Hash a plaintext password using Argon2id with a random salt.
///
/// Returns the PHC-formatted hash string (includes algorithm, params, salt, and hash).
pub fn hash_password(password: &str) -> Result<String, CoreError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| CoreError::Credential(format!("hashing failed: {e}")))?;
    Ok(hash.to_string())
}

/// Verify a plaintext password against a stored PHC-formatted Argon2id hash.
///
/// Returns `Ok(false)` on a mismatch. A stored value that is not a valid PHC
/// string is an error, not a mismatch.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, CoreError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| CoreError::Credential(format!("stored hash is malformed: {e}")))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(CoreError::Credential(format!("verification failed: {e}"))),
    }
}
