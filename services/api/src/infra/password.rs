use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::domain::repository::PasswordPort;
use crate::error::ApiServiceError;

/// Argon2id password hashing with per-password random salts.
#[derive(Clone, Default)]
pub struct Argon2Password;

impl PasswordPort for Argon2Password {
    fn hash(&self, password: &str) -> Result<String, ApiServiceError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!("hash password: {e}"))?;
        Ok(hash.to_string())
    }

    fn verify(&self, password: &str, password_hash: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(password_hash) else {
            return false;
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}
