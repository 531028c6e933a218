//! Password hashing
//!
//! Argon2id hashing and verification with per-password random salts. Hashes
//! are PHC strings, so parameters travel with the hash and old hashes stay
//! verifiable if defaults change.

use anyhow::{Context, Result};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Hash a plaintext password with Argon2id and a fresh random salt.
///
/// Returns the hash in PHC string format.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))
        .context("Password hashing failed")?;

    Ok(password_hash.to_string())
}

/// Verify a plaintext password against a stored PHC hash.
///
/// A wrong password is `Ok(false)`; only a malformed hash or a hasher
/// failure is an error.
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| anyhow::anyhow!("Invalid password hash format: {}", e))
        .context("Failed to parse password hash")?;

    let argon2 = Argon2::default();

    match argon2.verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(anyhow::anyhow!("Password verification failed: {}", e))
            .context("Password verification error"),
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(20))]

        /// For any password: the stored hash differs from the plaintext, is
        /// Argon2id, verifies against the original, and rejects a modified
        /// password.
        #[test]
        fn property_hash_never_leaks_and_roundtrips(
            password in "[a-zA-Z0-9!@#$%^&*()_+-=]{1,50}"
        ) {
            let hash = hash_password(&password).expect("Hashing should succeed");

            prop_assert_ne!(&hash, &password);
            prop_assert!(hash.starts_with("$argon2id$"));
            prop_assert!(!hash.contains(&password) || password.len() < 4);

            prop_assert!(verify_password(&password, &hash).expect("Verification should not error"));

            let wrong = format!("{}x", password);
            prop_assert!(!verify_password(&wrong, &hash).expect("Verification should not error"));
        }
    }
}
