//! Password hashing seam.
//!
//! Hashing is a collaborator behind a trait so the auth service stays
//! testable without paying bcrypt cost in every test.

use crate::errors::{DomainError, DomainResult};

/// Hashes and verifies user passwords
pub trait PasswordHasher: Send + Sync {
    /// Hash a raw password for storage
    fn hash(&self, password: &str) -> DomainResult<String>;

    /// Check a raw password against a stored hash
    fn verify(&self, password: &str, hash: &str) -> DomainResult<bool>;
}

/// bcrypt-backed implementation
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl BcryptPasswordHasher {
    /// Create a hasher with an explicit cost factor
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self {
            cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl PasswordHasher for BcryptPasswordHasher {
    fn hash(&self, password: &str) -> DomainResult<String> {
        bcrypt::hash(password, self.cost).map_err(|e| DomainError::Internal {
            message: format!("Password hashing failed: {}", e),
        })
    }

    fn verify(&self, password: &str, hash: &str) -> DomainResult<bool> {
        bcrypt::verify(password, hash).map_err(|e| DomainError::Internal {
            message: format!("Password verification failed: {}", e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_round_trip() {
        // Minimum cost keeps the test fast
        let hasher = BcryptPasswordHasher::new(4);
        let hash = hasher.hash("correct horse battery staple").unwrap();

        assert!(hasher.verify("correct horse battery staple", &hash).unwrap());
        assert!(!hasher.verify("wrong password", &hash).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let hasher = BcryptPasswordHasher::new(4);
        let a = hasher.hash("same input").unwrap();
        let b = hasher.hash("same input").unwrap();
        assert_ne!(a, b);
    }
}
