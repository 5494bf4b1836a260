//! Password hashing helpers (Argon2id, PHC string format).
//!
//! Kept deliberately thin: credential storage is an interface boundary,
//! not domain logic. The rest of the engine only ever sees the hash.

use argon2::{
    Argon2, PasswordHash,
    password_hash::{PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sea_orm::DbErr;

use crate::{EngineError, ResultEngine};

/// Hash a plaintext password with a fresh random salt.
pub fn hash_password(password: &str) -> ResultEngine<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| EngineError::Database(DbErr::Custom(format!("password hash: {err}"))))
}

/// Verify a plaintext password against a stored PHC hash.
///
/// A malformed stored hash counts as a mismatch: login must never turn a
/// corrupt row into a server fault.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}
