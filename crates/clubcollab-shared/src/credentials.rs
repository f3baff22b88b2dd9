use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::RngCore;

use crate::constants::{KDF_CONTEXT_RESET_TOKEN, RESET_TOKEN_SIZE};
use crate::error::CredentialError;

/// Hash a password with Argon2id and a fresh random salt, returning the PHC string.
pub fn hash_password(password: &str) -> Result<String, CredentialError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| CredentialError::HashingFailed(e.to_string()))
}

/// Verify a password against a stored PHC string.
///
/// A wrong password is `Ok(false)`; only a hash that cannot be parsed is an error.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, CredentialError> {
    let parsed =
        PasswordHash::new(stored_hash).map_err(|e| CredentialError::MalformedHash(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Generate a random password reset token, hex-encoded.
pub fn generate_reset_token() -> String {
    let mut token = [0u8; RESET_TOKEN_SIZE];
    rand::rngs::OsRng.fill_bytes(&mut token);
    hex::encode(token)
}

// BLAKE3 KDF with domain separation; only the digest is ever persisted
pub fn digest_reset_token(token: &str) -> String {
    let mut hasher = blake3::Hasher::new_derive_key(KDF_CONTEXT_RESET_TOKEN);
    hasher.update(token.as_bytes());
    hasher.finalize().to_hex().to_string()
}

/// Check a presented token against a stored digest.
pub fn reset_token_matches(token: &str, stored_digest: &str) -> bool {
    let Ok(stored) = blake3::Hash::from_hex(stored_digest) else {
        return false;
    };
    let mut hasher = blake3::Hasher::new_derive_key(KDF_CONTEXT_RESET_TOKEN);
    hasher.update(token.as_bytes());
    // blake3::Hash equality is constant-time
    hasher.finalize() == stored
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_verify_roundtrip() {
        let hash = hash_password("pw1").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("pw1", &hash).unwrap());
    }

    #[test]
    fn test_wrong_password_rejected() {
        let hash = hash_password("correct horse").unwrap();
        assert!(!verify_password("battery staple", &hash).unwrap());
    }

    #[test]
    fn test_same_password_different_salts() {
        let a = hash_password("pw").unwrap();
        let b = hash_password("pw").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_malformed_hash_is_error() {
        assert!(matches!(
            verify_password("pw", "plaintext-password"),
            Err(CredentialError::MalformedHash(_))
        ));
    }

    #[test]
    fn test_reset_token_shape() {
        let token = generate_reset_token();
        assert_eq!(token.len(), RESET_TOKEN_SIZE * 2);
        assert_ne!(token, generate_reset_token());
    }

    #[test]
    fn test_reset_token_digest() {
        let token = generate_reset_token();
        let digest = digest_reset_token(&token);

        assert_ne!(digest, token);
        assert!(reset_token_matches(&token, &digest));
        assert!(!reset_token_matches(&generate_reset_token(), &digest));
        assert!(!reset_token_matches(&token, "zz"));
    }
}
