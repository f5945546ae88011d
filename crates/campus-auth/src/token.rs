//! Session tokens: EdDSA-signed JWTs carrying the caller's identity,
//! tenant and role.
//!
//! Validating a token yields an [`AuthenticatedPrincipal`] without any
//! database lookup; this is the session source the request guard trusts.

use campus_core::models::principal::{AuthenticatedPrincipal, Role};
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::error::AuthError;

/// JWT claims embedded in every session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject — principal ID (UUID string).
    pub sub: String,
    /// Tenant ID (UUID string).
    pub tenant_id: String,
    pub role: Role,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
    /// Unique token ID (UUID string).
    pub jti: String,
}

impl SessionClaims {
    fn into_principal(self) -> Result<AuthenticatedPrincipal, AuthError> {
        let id = Uuid::parse_str(&self.sub)
            .map_err(|e| AuthError::TokenInvalid(format!("bad subject: {e}")))?;
        let tenant_id = Uuid::parse_str(&self.tenant_id)
            .map_err(|e| AuthError::TokenInvalid(format!("bad tenant id: {e}")))?;
        Ok(AuthenticatedPrincipal {
            id,
            tenant_id,
            role: self.role,
        })
    }
}

/// Issue a signed EdDSA (Ed25519) session token.
pub fn issue_session_token(
    principal: &AuthenticatedPrincipal,
    config: &AuthConfig,
) -> Result<String, AuthError> {
    let now = Utc::now().timestamp();
    let lifetime = i64::try_from(config.session_lifetime_secs).unwrap_or(i64::MAX);
    let claims = SessionClaims {
        sub: principal.id.to_string(),
        tenant_id: principal.tenant_id.to_string(),
        role: principal.role,
        iss: config.jwt_issuer.clone(),
        iat: now,
        exp: now.saturating_add(lifetime),
        jti: Uuid::new_v4().to_string(),
    };

    let key = EncodingKey::from_ed_pem(config.jwt_private_key_pem.as_bytes())
        .map_err(|e| AuthError::Crypto(format!("bad private key: {e}")))?;

    jsonwebtoken::encode(&Header::new(Algorithm::EdDSA), &claims, &key)
        .map_err(|e| AuthError::Crypto(format!("JWT encode: {e}")))
}

/// Decode and verify a session token (signature, expiry, issuer).
pub fn decode_session_token(token: &str, config: &AuthConfig) -> Result<SessionClaims, AuthError> {
    let key = DecodingKey::from_ed_pem(config.jwt_public_key_pem.as_bytes())
        .map_err(|e| AuthError::Crypto(format!("bad public key: {e}")))?;

    let mut validation = Validation::new(Algorithm::EdDSA);
    validation.set_issuer(&[&config.jwt_issuer]);
    validation.set_required_spec_claims(&["sub", "exp", "iat", "iss"]);

    jsonwebtoken::decode::<SessionClaims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::TokenInvalid(e.to_string()),
        })
}

/// Validate a session token and return the principal it names.
pub fn validate_session_token(
    token: &str,
    config: &AuthConfig,
) -> Result<AuthenticatedPrincipal, AuthError> {
    decode_session_token(token, config)?.into_principal()
}
