//! Password hashing and bearer token minting.
//!
//! Passwords are stored as Argon2id PHC strings. A bearer token is
//! `<session id>.<secret>`; only the SHA-256 of the secret is stored.

use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::errors::AppError;

const SALT_SIZE: usize = 16; // 128 bits
const SECRET_SIZE: usize = 32; // 256 bits

/// Hash a password with Argon2id and a random salt.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let mut salt = [0u8; SALT_SIZE];
    OsRng.fill_bytes(&mut salt);

    let salt_string = SaltString::encode_b64(&salt)
        .map_err(|e| AppError::Internal(format!("Salt encoding failed: {}", e)))?;

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt_string)
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

    Ok(hash.to_string())
}

/// Check a password against a stored PHC string.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, AppError> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| AppError::Internal(format!("Stored password hash is invalid: {}", e)))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Fresh random token secret, hex encoded.
pub fn generate_secret() -> String {
    let mut secret = [0u8; SECRET_SIZE];
    OsRng.fill_bytes(&mut secret);
    to_hex(&secret)
}

pub fn hash_secret(secret: &str) -> Vec<u8> {
    Sha256::digest(secret.as_bytes()).to_vec()
}

/// Constant-time check of a presented secret against its stored hash.
pub fn secret_matches(secret: &str, stored_hash: &[u8]) -> bool {
    hash_secret(secret).ct_eq(stored_hash).into()
}

pub fn format_token(session_id: &str, secret: &str) -> String {
    format!("{}.{}", session_id, secret)
}

/// Split a token into `(session id, secret)`.
pub fn parse_token(token: &str) -> Option<(&str, &str)> {
    let (session_id, secret) = token.split_once('.')?;
    if session_id.is_empty() || secret.is_empty() {
        return None;
    }
    Some((session_id, secret))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_round_trip() {
        let hash = hash_password("correct horse").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("correct horse", &hash).unwrap());
        assert!(!verify_password("wrong horse", &hash).unwrap());
    }

    #[test]
    fn test_same_password_different_hashes() {
        let a = hash_password("same").unwrap();
        let b = hash_password("same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_secret_matching() {
        let secret = generate_secret();
        assert_eq!(secret.len(), SECRET_SIZE * 2);
        let stored = hash_secret(&secret);
        assert!(secret_matches(&secret, &stored));
        assert!(!secret_matches(&generate_secret(), &stored));
        assert!(!secret_matches(&secret, b"short"));
    }

    #[test]
    fn test_parse_token() {
        let token = format_token("abc", "def");
        assert_eq!(parse_token(&token), Some(("abc", "def")));
        assert_eq!(parse_token("no-dot"), None);
        assert_eq!(parse_token(".secret"), None);
        assert_eq!(parse_token("session."), None);
    }
}
