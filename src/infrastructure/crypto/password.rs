//! Password hashing utilities

use bcrypt::{hash, verify, DEFAULT_COST};

use crate::shared::errors::InfraError;

/// Hash a password using bcrypt
pub fn hash_password(password: &str) -> Result<String, InfraError> {
    hash(password, DEFAULT_COST).map_err(|e| InfraError::Crypto(e.to_string()))
}

/// Verify a password against a stored bcrypt hash
pub fn verify_password(password: &str, hashed: &str) -> Result<bool, InfraError> {
    verify(password, hashed).map_err(|e| InfraError::Crypto(e.to_string()))
}
