use anyhow::Context;
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tracing::error;

/// Hashes a user's plaintext password into an argon2 PHC string, the only
/// form a password is ever stored in.
pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            error!(error = %e, "could not hash user password");
            anyhow::anyhow!("hash user password: {e}")
        })
}

/// Checks a plaintext against a stored user password hash.
// Login is out of scope for the service, so only the tests call this for now.
#[cfg_attr(not(test), allow(dead_code))]
pub fn verify_password(plain: &str, stored: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(stored)
        .map_err(|e| anyhow::anyhow!(e.to_string()))
        .context("stored user password is not a PHC string")?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_not_the_plaintext_and_verifies() {
        let hash = hash_password("s3cret-Passw0rd").expect("hashing should succeed");
        assert_ne!(hash, "s3cret-Passw0rd");
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("s3cret-Passw0rd", &hash).expect("verify should succeed"));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let hash = hash_password("correct-horse").expect("hashing should succeed");
        assert!(!verify_password("battery-staple", &hash).expect("verify should not error"));
    }

    #[test]
    fn same_password_gets_a_fresh_salt() {
        let a = hash_password("repeat").unwrap();
        let b = hash_password("repeat").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn hash_fits_the_password_column() {
        let hash = hash_password(&"p".repeat(72)).unwrap();
        assert!(hash.len() <= 255);
    }

    #[test]
    fn verify_names_the_malformed_hash() {
        let err = verify_password("anything", "not-a-valid-hash").unwrap_err();
        assert!(err.to_string().contains("not a PHC string"));
    }
}
