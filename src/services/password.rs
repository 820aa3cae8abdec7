use argon2::{
    password_hash::{rand_core::OsRng, Error as HashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use once_cell::sync::Lazy;
use std::collections::HashSet;
use thiserror::Error;

use crate::config::SecurityConfig;

/// Attributes shorter than this are skipped by the similarity check, so a
/// two-letter username does not reject every password containing it.
const MIN_SIMILARITY_ATTR_LEN: usize = 3;

static COMMON_PASSWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "password", "password1", "password123", "passw0rd", "123456", "1234567", "12345678",
        "123456789", "1234567890", "qwerty", "qwerty123", "abc123", "iloveyou", "admin",
        "welcome", "welcome1", "monkey", "dragon", "letmein", "login", "princess", "sunshine",
        "master", "shadow", "football", "baseball", "superman", "batman", "trustno1", "696969",
        "access", "hunter2", "freedom", "whatever", "starwars", "secret",
    ]
    .into_iter()
    .collect()
});

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("failed to hash password: {0}")]
    Hash(String),

    #[error("stored password hash is malformed: {0}")]
    MalformedHash(String),
}

/// A rejected password, with the reason kept server-side only; clients never
/// see which rule fired.
#[derive(Debug, PartialEq, Eq, Error)]
pub enum PolicyViolation {
    #[error("password is shorter than {0} characters")]
    TooShort(usize),

    #[error("password is too common")]
    TooCommon,

    #[error("password is entirely numeric")]
    EntirelyNumeric,

    #[error("password is too similar to the {0}")]
    TooSimilar(&'static str),
}

/// Pluggable password strength policy, constructed from configuration at
/// startup.
#[derive(Debug, Clone)]
pub struct PasswordPolicy {
    min_length: usize,
}

impl PasswordPolicy {
    pub fn new(min_length: usize) -> Self {
        Self { min_length }
    }

    pub fn from_config(security: &SecurityConfig) -> Self {
        Self::new(security.min_password_length)
    }

    /// Validate a candidate password against every rule. Pure; the caller
    /// decides how a violation surfaces.
    pub fn check(&self, password: &str, username: &str, email: &str) -> Result<(), PolicyViolation> {
        if password.chars().count() < self.min_length {
            return Err(PolicyViolation::TooShort(self.min_length));
        }
        if COMMON_PASSWORDS.contains(password.to_lowercase().as_str()) {
            return Err(PolicyViolation::TooCommon);
        }
        if !password.is_empty() && password.chars().all(|c| c.is_ascii_digit()) {
            return Err(PolicyViolation::EntirelyNumeric);
        }
        if too_similar(password, username) {
            return Err(PolicyViolation::TooSimilar("username"));
        }
        let email_local = email.split('@').next().unwrap_or(email);
        if too_similar(password, email_local) {
            return Err(PolicyViolation::TooSimilar("email"));
        }
        Ok(())
    }
}

/// Case-insensitive containment in either direction.
fn too_similar(password: &str, attribute: &str) -> bool {
    if attribute.chars().count() < MIN_SIMILARITY_ATTR_LEN {
        return false;
    }
    let password = password.to_lowercase();
    let attribute = attribute.to_lowercase();
    password.contains(&attribute) || attribute.contains(&password)
}

/// Hash a password with Argon2id and a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::Hash(e.to_string()))?;
    Ok(hash.to_string())
}

/// Verify a password against a stored hash. A mismatch is `Ok(false)`; only
/// a corrupt hash is an error.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(hash).map_err(|e| PasswordError::MalformedHash(e.to_string()))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(HashError::Password) => Ok(false),
        Err(e) => Err(PasswordError::MalformedHash(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> PasswordPolicy {
        PasswordPolicy::new(8)
    }

    #[test]
    fn test_accepts_reasonable_password() {
        assert!(policy().check("top_secret", "john-doe", "john@doe.com").is_ok());
    }

    #[test]
    fn test_rejects_short_password() {
        assert_eq!(
            policy().check("short1", "alice", "alice@test.com"),
            Err(PolicyViolation::TooShort(8))
        );
    }

    #[test]
    fn test_rejects_common_password() {
        assert_eq!(
            policy().check("Password123", "alice", "alice@test.com"),
            Err(PolicyViolation::TooCommon)
        );
    }

    #[test]
    fn test_rejects_numeric_password() {
        assert_eq!(
            policy().check("86753091234", "alice", "alice@test.com"),
            Err(PolicyViolation::EntirelyNumeric)
        );
    }

    #[test]
    fn test_rejects_password_containing_username() {
        assert_eq!(
            policy().check("xx-john-doe-xx", "john-doe", "john@doe.com"),
            Err(PolicyViolation::TooSimilar("username"))
        );
    }

    #[test]
    fn test_rejects_password_matching_email_local_part() {
        assert_eq!(
            policy().check("johnjohnjohn", "someone", "johnjohnjohn@doe.com"),
            Err(PolicyViolation::TooSimilar("email"))
        );
    }

    #[test]
    fn test_short_username_does_not_trip_similarity() {
        assert!(policy().check("abracadabra1", "ab", "ab@test.com").is_ok());
    }

    #[test]
    fn test_hash_and_verify_round_trip() {
        let hash = hash_password("top_secret").unwrap();
        assert!(verify_password("top_secret", &hash).unwrap());
        assert!(!verify_password("not_the_password", &hash).unwrap());
    }

    #[test]
    fn test_malformed_hash_is_an_error() {
        assert!(verify_password("whatever", "not-a-phc-string").is_err());
    }
}
