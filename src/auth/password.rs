use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use rand::thread_rng;

use crate::error::AppError;

const MIN_PASSWORD_LEN: usize = 8;

/// Salted argon2 hash in PHC string form.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::bad_request(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    let salt = SaltString::generate(&mut thread_rng());
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|err| AppError::internal_with_source("Password hashing failed", err))?
        .to_string();
    Ok(hash)
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|err| AppError::internal_with_source("Stored password hash is invalid", err))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::{hash_password, verify_password};
    use crate::error::AppError;

    #[test]
    fn hash_verifies_only_the_original_password() {
        let hash = hash_password("Correct horse 1").expect("hash should succeed");
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("Correct horse 1", &hash).expect("verify should run"));
        assert!(!verify_password("Correct horse 2", &hash).expect("verify should run"));
    }

    #[test]
    fn hashes_are_salted() {
        let first = hash_password("same-password").expect("hash should succeed");
        let second = hash_password("same-password").expect("hash should succeed");
        assert_ne!(first, second);
    }

    #[test]
    fn short_passwords_are_rejected() {
        let err = hash_password("short").expect_err("short password should fail");
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn garbage_hash_is_an_internal_error() {
        let err = verify_password("whatever", "plaintext").expect_err("bad hash should fail");
        assert!(matches!(err, AppError::Internal(_)));
    }
}
