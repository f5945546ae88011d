//! Argon2id password checks for the login flow.

use std::borrow::Cow;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{Error as HashError, PasswordHash, SaltString};
use argon2::{Algorithm, Argon2, Params, PasswordHasher, PasswordVerifier, Version};

use crate::error::AuthError;

/// Secret input fed to Argon2: the pepper, when configured, followed by
/// the password.
fn secret_input<'a>(password: &'a str, pepper: Option<&str>) -> Cow<'a, str> {
    match pepper {
        Some(pepper) => Cow::Owned(format!("{pepper}{password}")),
        None => Cow::Borrowed(password),
    }
}

/// Check `password` against a stored PHC string.
///
/// A mismatch is `Ok(false)`. Only a stored hash that cannot be parsed
/// or verified at all is an error.
pub fn verify_password(
    password: &str,
    stored_hash: &str,
    pepper: Option<&str>,
) -> Result<bool, AuthError> {
    let stored = PasswordHash::new(stored_hash)
        .map_err(|e| AuthError::Crypto(format!("stored password hash is unreadable: {e}")))?;
    let secret = secret_input(password, pepper);

    match Argon2::default().verify_password(secret.as_bytes(), &stored) {
        Ok(()) => Ok(true),
        Err(HashError::Password) => Ok(false),
        Err(e) => Err(AuthError::Crypto(format!("password check failed: {e}"))),
    }
}

/// Hash of a throwaway secret with the same Argon2id cost as stored
/// principal hashes (m=19456, t=2, p=1).
///
/// Login verifies against it when the email is unknown, so that branch
/// takes as long as a wrong password.
pub fn dummy_hash() -> Result<String, AuthError> {
    let params = Params::new(19456, 2, 1, None)
        .map_err(|e| AuthError::Crypto(format!("argon2 params: {e}")))?;
    let salt = SaltString::generate(&mut OsRng);
    Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
        .hash_password(b"campus-unknown-principal", &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Crypto(format!("dummy hash: {e}")))
}
