use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use std::fmt;

/// Plain-text password that never shows up in logs or `Debug` output.
#[derive(Clone)]
pub struct Password(String);

impl Password {
    pub fn new(password: impl Into<String>) -> Self {
        Self(password.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Hash a password with Argon2id and a fresh random salt.
pub fn hash_password(password: &Password) -> Result<String, anyhow::Error> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(password.as_str().as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?
        .to_string();

    Ok(hash)
}

/// Check a password against a stored PHC hash string.
///
/// A stored value that is not a valid hash never verifies.
pub fn verify_password(password: &Password, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };

    Argon2::default()
        .verify_password(password.as_str().as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_argon2_phc_string() {
        let hash = hash_password(&Password::new("raktar2024")).expect("Failed to hash password");
        assert!(hash.starts_with("$argon2"));
    }

    #[test]
    fn verifies_matching_password_only() {
        let password = Password::new("raktar2024");
        let hash = hash_password(&password).expect("Failed to hash password");

        assert!(verify_password(&password, &hash));
        assert!(!verify_password(&Password::new("raktar2025"), &hash));
    }

    #[test]
    fn salts_differ_per_hash() {
        let password = Password::new("raktar2024");
        let first = hash_password(&password).expect("Failed to hash password");
        let second = hash_password(&password).expect("Failed to hash password");

        assert_ne!(first, second);
        assert!(verify_password(&password, &second));
    }

    #[test]
    fn malformed_hash_does_not_verify() {
        assert!(!verify_password(&Password::new("anything"), "not-a-hash"));
        assert!(!verify_password(&Password::new(""), ""));
    }

    #[test]
    fn debug_hides_password() {
        let rendered = format!("{:?}", Password::new("secret"));
        assert!(!rendered.contains("secret"));
    }
}
