//! Argon2id password hasher.
//!
//! Parameters follow the OWASP password storage cheat sheet:
//! m=19456 (19 MiB), t=2, p=1.

use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};
use schoolhub_application::PasswordHasher as PasswordHasherPort;
use schoolhub_core::{AppError, AppResult};

const MEMORY_COST_KIB: u32 = 19_456;
const TIME_COST: u32 = 2;
const PARALLELISM: u32 = 1;

/// Salted one-way hasher for account passwords.
#[derive(Clone)]
pub struct Argon2PasswordHasher {
    argon2: Argon2<'static>,
}

impl Argon2PasswordHasher {
    /// Creates a hasher with the recommended Argon2id parameters.
    #[must_use]
    pub fn new() -> Self {
        let params = Params::new(MEMORY_COST_KIB, TIME_COST, PARALLELISM, None)
            .unwrap_or_else(|_| Params::default());

        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        }
    }
}

impl Default for Argon2PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasherPort for Argon2PasswordHasher {
    fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|error| AppError::Internal(format!("failed to hash password: {error}")))
    }

    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool> {
        // A stored value that is not a PHC string cannot match any password.
        let Ok(parsed_hash) = PasswordHash::new(hash) else {
            return Ok(false);
        };

        match self
            .argon2
            .verify_password(password.as_bytes(), &parsed_hash)
        {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(error) => Err(AppError::Internal(format!(
                "password verification failed: {error}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use schoolhub_application::PasswordHasher as PasswordHasherPort;
    use schoolhub_core::AppResult;

    use super::Argon2PasswordHasher;

    #[test]
    fn hash_verifies_original_password_only() -> AppResult<()> {
        let hasher = Argon2PasswordHasher::new();
        let hash = hasher.hash_password("pw123456")?;

        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify_password("pw123456", &hash)?);
        assert!(!hasher.verify_password("pw1234567", &hash)?);
        Ok(())
    }

    #[test]
    fn same_password_gets_distinct_salts() -> AppResult<()> {
        let hasher = Argon2PasswordHasher::new();
        assert_ne!(
            hasher.hash_password("pw123456")?,
            hasher.hash_password("pw123456")?
        );
        Ok(())
    }

    #[test]
    fn malformed_stored_hash_never_matches() -> AppResult<()> {
        let hasher = Argon2PasswordHasher::new();
        assert!(!hasher.verify_password("pw123456", "plaintext-legacy")?);
        Ok(())
    }
}
