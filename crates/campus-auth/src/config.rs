//! Authentication configuration.

use campus_core::models::principal::DEFAULT_MIN_PASSWORD_LENGTH;

/// Configuration for the authentication service.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// PEM-encoded Ed25519 private key for session token signing.
    pub jwt_private_key_pem: String,
    /// PEM-encoded Ed25519 public key for session token verification.
    pub jwt_public_key_pem: String,
    /// Session token lifetime in seconds (default: 86_400 = 1 day).
    pub session_lifetime_secs: u64,
    /// JWT issuer (`iss` claim).
    pub jwt_issuer: String,
    /// Optional pepper prepended to passwords before Argon2id
    /// verification. Must match the pepper the principal repository
    /// hashes with.
    pub pepper: Option<String>,
    /// Minimum password length accepted at registration. Pass the same
    /// value to `TenantService::with_min_password_length`.
    pub min_password_length: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_private_key_pem: String::new(),
            jwt_public_key_pem: String::new(),
            session_lifetime_secs: 86_400,
            jwt_issuer: "campus".into(),
            pepper: None,
            min_password_length: DEFAULT_MIN_PASSWORD_LENGTH,
        }
    }
}
