//! Principal domain model.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CampusError, CampusResult};

/// Shortest password accepted for a new principal unless configured
/// otherwise.
pub const DEFAULT_MIN_PASSWORD_LENGTH: usize = 8;

/// Role of a principal within its tenant. Immutable after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Owner,
    Admin,
    Teacher,
    Student,
    Parent,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Self::Owner,
        Self::Admin,
        Self::Teacher,
        Self::Student,
        Self::Parent,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Owner => "OWNER",
            Self::Admin => "ADMIN",
            Self::Teacher => "TEACHER",
            Self::Student => "STUDENT",
            Self::Parent => "PARENT",
        }
    }

    /// Owners and admins manage the whole institute.
    pub fn is_administrator(self) -> bool {
        matches!(self, Self::Owner | Self::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "OWNER" => Ok(Self::Owner),
            "ADMIN" => Ok(Self::Admin),
            "TEACHER" => Ok(Self::Teacher),
            "STUDENT" => Ok(Self::Student),
            "PARENT" => Ok(Self::Parent),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// Canonical form of an email address used as a login handle.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

/// Check the credentials of a principal about to be created and return
/// the normalized email.
///
/// Every path that creates a principal (registration and onboarding)
/// goes through here.
pub fn validate_new_credentials(
    email: &str,
    password: &str,
    min_password_length: usize,
) -> CampusResult<String> {
    let email = normalize_email(email);
    let well_formed = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty());
    if !well_formed || email.chars().any(char::is_whitespace) {
        return Err(CampusError::InvalidInput {
            message: "email address is malformed".into(),
        });
    }
    if password.chars().count() < min_password_length {
        return Err(CampusError::InvalidInput {
            message: format!("password must be at least {min_password_length} characters"),
        });
    }
    Ok(email)
}

/// A stored member of a tenant.
///
/// `(tenant_id, email)` is unique; the same email may belong to distinct
/// principals in different tenants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Principal {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
    /// Argon2id PHC-format hash.
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Principal {
    /// The narrow identity threaded into policy checks.
    pub fn authenticated(&self) -> AuthenticatedPrincipal {
        AuthenticatedPrincipal {
            id: self.id,
            tenant_id: self.tenant_id,
            role: self.role,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePrincipal {
    pub tenant_id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
    /// Raw password (hashed with Argon2id before storage).
    pub password: String,
}

/// Verified caller identity.
///
/// Produced once per request, either by a successful login or by
/// validating a session token, and passed explicitly to every guard
/// call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AuthenticatedPrincipal {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_string_roundtrip() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>(), Ok(role));
            assert_eq!(role.to_string(), role.as_str());
        }
        assert!("JANITOR".parse::<Role>().is_err());
    }

    #[test]
    fn emails_are_trimmed_and_lowercased() {
        assert_eq!(normalize_email("  Alice@Example.COM "), "alice@example.com");
    }

    #[test]
    fn new_credentials_are_normalized_and_checked() {
        assert_eq!(
            validate_new_credentials(" Bob@Example.com", "long-enough", 8).unwrap(),
            "bob@example.com"
        );
        for email in ["", "bob", "@example.com", "bob@", "bob smith@example.com"] {
            assert!(
                matches!(
                    validate_new_credentials(email, "long-enough", 8),
                    Err(CampusError::InvalidInput { .. })
                ),
                "{email:?} should be rejected"
            );
        }
        assert!(matches!(
            validate_new_credentials("bob@example.com", "abc", 8),
            Err(CampusError::InvalidInput { .. })
        ));
        assert!(validate_new_credentials("bob@example.com", "abc", 3).is_ok());
    }

    #[test]
    fn only_owner_and_admin_administer() {
        let admins: Vec<Role> = Role::ALL
            .into_iter()
            .filter(|r| r.is_administrator())
            .collect();
        assert_eq!(admins, vec![Role::Owner, Role::Admin]);
    }
}
