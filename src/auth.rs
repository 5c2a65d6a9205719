// src/auth.rs
use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};
use std::collections::HashMap;

use crate::errors::{Result, SolveError};

type SecretDigest = [u8; 32];

/// Caller identity -> shared secret table, built once at startup and read-only afterwards.
///
/// Secrets are stored as SHA-256 digests so every comparison runs over the same
/// fixed-length input, whatever the length of the provided secret.
#[derive(Clone, Default)]
pub struct CredentialTable {
    entries: HashMap<String, SecretDigest>,
}

impl std::fmt::Debug for CredentialTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialTable")
            .field("callers", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl CredentialTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, email: impl Into<String>, secret: &SecretString) {
        self.entries
            .insert(email.into(), digest(secret.expose_secret()));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Checks `provided` against the secret registered for `email`.
    ///
    /// An unknown caller still pays for a full comparison (against an all-zero digest)
    /// and gets the same error as a wrong secret.
    pub fn verify(&self, email: &str, provided: &str) -> Result<()> {
        let provided = digest(provided);
        let (expected, known) = match self.entries.get(email) {
            Some(expected) => (expected, true),
            None => (&[0u8; 32], false),
        };

        if constant_time_eq(expected, &provided) & known {
            Ok(())
        } else {
            Err(SolveError::Unauthorized)
        }
    }
}

fn digest(secret: &str) -> SecretDigest {
    Sha256::digest(secret.as_bytes()).into()
}

fn constant_time_eq(a: &SecretDigest, b: &SecretDigest) -> bool {
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> CredentialTable {
        let mut table = CredentialTable::new();
        table.insert("student@example.com", &SecretString::from("my-secret"));
        table
    }

    #[test]
    fn test_verify_accepts_matching_secret() {
        assert!(table().verify("student@example.com", "my-secret").is_ok());
    }

    #[test]
    fn test_unknown_caller_and_wrong_secret_are_indistinguishable() {
        let table = table();
        let wrong = table.verify("student@example.com", "nope").unwrap_err();
        let unknown = table.verify("someone@else.com", "my-secret").unwrap_err();

        assert!(matches!(wrong, SolveError::Unauthorized));
        assert!(matches!(unknown, SolveError::Unauthorized));
        assert_eq!(wrong.to_string(), unknown.to_string());
    }

    #[test]
    fn test_secret_prefix_is_rejected() {
        assert!(table().verify("student@example.com", "my-secre").is_err());
        assert!(table().verify("student@example.com", "").is_err());
    }

    #[test]
    fn test_debug_does_not_print_secrets() {
        let rendered = format!("{:?}", table());
        assert!(rendered.contains("student@example.com"));
        assert!(!rendered.contains("my-secret"));
    }
}
