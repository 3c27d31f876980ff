//! Argon2id password hashing. Hashes are stored as PHC strings.
//!
//! Hashing is CPU-bound, so the async entry points run it on tokio's
//! blocking pool.

use anyhow::{anyhow, Result};
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use tokio::task;

pub async fn hash_password(password: String) -> Result<String> {
    task::spawn_blocking(move || hash_blocking(&password))
        .await
        .map_err(|e| anyhow!("password hashing task failed: {}", e))?
}

/// False for a wrong password and for a malformed stored hash.
pub async fn verify_password(password: String, stored_hash: String) -> bool {
    task::spawn_blocking(move || verify_blocking(&password, &stored_hash))
        .await
        .unwrap_or(false)
}

fn hash_blocking(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| anyhow!("failed to hash password: {}", e))
}

fn verify_blocking(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}
