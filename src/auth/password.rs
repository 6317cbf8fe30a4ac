//! Password hashing and verification using Argon2id
//!
//! Every user carries an individual salt (stored next to the hash), so
//! equal passwords never produce equal hashes. Hashing is deterministic
//! for a given (password, salt) pair; a password change always generates
//! a fresh salt.

use crate::error::AppError;
use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString,
    },
    Algorithm, Argon2, Params, Version,
};

/// Password hasher with fixed parameters
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    /// Create hasher with default parameters (OWASP recommended)
    pub fn new() -> Self {
        // m=64MiB, t=3 iterations, p=4 lanes
        let params = Params::new(65536, 3, 4, None).expect("Invalid Argon2 params");

        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

        Self { argon2 }
    }

    /// Generate a fresh per-user salt in B64 salt-string form
    pub fn generate_salt() -> String {
        SaltString::generate(&mut OsRng).as_str().to_string()
    }

    /// Hash a password with the given stored salt.
    /// Deterministic: identical (password, salt) inputs yield an identical
    /// PHC string
    pub fn hash(&self, password: &str, salt: &str) -> Result<String, AppError> {
        let salt = SaltString::from_b64(salt).map_err(|e| {
            tracing::error!("Invalid password salt: {:?}", e);
            AppError::Internal(format!("Invalid password salt: {}", e))
        })?;

        let password_hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| {
                tracing::error!("Failed to hash password: {:?}", e);
                AppError::Internal(format!("Failed to hash password: {}", e))
            })?
            .to_string();

        Ok(password_hash)
    }

    /// Verify a password against the stored (salt, hash) pair.
    ///
    /// The stored salt must agree with the salt embedded in the PHC
    /// string; a record where the two diverge never verifies. Comparison
    /// of the recomputed hash is constant-time inside the argon2 crate.
    pub fn verify(&self, password: &str, salt: &str, expected_hash: &str) -> Result<(), AppError> {
        let parsed_hash = PasswordHash::new(expected_hash).map_err(|e| {
            tracing::debug!("Failed to parse password hash: {:?}", e);
            AppError::Unauthorized
        })?;

        if parsed_hash.salt.map(|s| s.as_str()) != Some(salt) {
            tracing::debug!("Stored salt does not match hash salt");
            return Err(AppError::Unauthorized);
        }

        self.argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .map_err(|_| AppError::Unauthorized)
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = PasswordHasher::new();
        let password = "TestPassword123!";
        let salt = PasswordHasher::generate_salt();

        let hash = hasher.hash(password, &salt).unwrap();
        hasher.verify(password, &salt, &hash).unwrap();
    }

    #[test]
    fn test_hash_is_deterministic_for_fixed_salt() {
        let hasher = PasswordHasher::new();
        let salt = PasswordHasher::generate_salt();

        let hash1 = hasher.hash("TestPassword123!", &salt).unwrap();
        let hash2 = hasher.hash("TestPassword123!", &salt).unwrap();

        assert_eq!(hash1, hash2);
    }

    #[test]
    fn test_distinct_salts_produce_distinct_hashes() {
        let hasher = PasswordHasher::new();

        let salt1 = PasswordHasher::generate_salt();
        let salt2 = PasswordHasher::generate_salt();
        assert_ne!(salt1, salt2);

        let hash1 = hasher.hash("TestPassword123!", &salt1).unwrap();
        let hash2 = hasher.hash("TestPassword123!", &salt2).unwrap();

        assert_ne!(hash1, hash2);
        hasher.verify("TestPassword123!", &salt1, &hash1).unwrap();
        hasher.verify("TestPassword123!", &salt2, &hash2).unwrap();
    }

    #[test]
    fn test_verify_fails_with_wrong_password() {
        let hasher = PasswordHasher::new();
        let salt = PasswordHasher::generate_salt();

        let hash = hasher.hash("TestPassword123!", &salt).unwrap();
        assert!(hasher.verify("WrongPassword123!", &salt, &hash).is_err());
        // 单字符变化也必须失败
        assert!(hasher.verify("TestPassword123?", &salt, &hash).is_err());
    }

    #[test]
    fn test_verify_fails_with_mutated_salt() {
        let hasher = PasswordHasher::new();
        let salt = PasswordHasher::generate_salt();
        let hash = hasher.hash("TestPassword123!", &salt).unwrap();

        let mut mutated = salt.clone().into_bytes();
        // 翻转第一个字符，保持长度合法
        mutated[0] = if mutated[0] == b'a' { b'b' } else { b'a' };
        let mutated = String::from_utf8(mutated).unwrap();

        assert!(hasher.verify("TestPassword123!", &mutated, &hash).is_err());
    }

    #[test]
    fn test_verify_with_invalid_hash() {
        let hasher = PasswordHasher::new();
        let salt = PasswordHasher::generate_salt();

        assert!(hasher.verify("TestPassword123!", &salt, "invalid_hash").is_err());
        assert!(hasher.verify("TestPassword123!", &salt, "").is_err());
    }

    #[test]
    fn test_unicode_password() {
        let hasher = PasswordHasher::new();
        let salt = PasswordHasher::generate_salt();
        let password = "密码测试Test123!🔒";

        let hash = hasher.hash(password, &salt).unwrap();
        hasher.verify(password, &salt, &hash).unwrap();
        assert!(hasher.verify("密码测试Test123🔒", &salt, &hash).is_err());
    }
}
