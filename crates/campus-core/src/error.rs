//! Error types for Campus.

use thiserror::Error;

use crate::decision::DenialReason;

#[derive(Debug, Error)]
pub enum CampusError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Entity already exists: {entity}")]
    AlreadyExists { entity: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Authentication failed: {reason}")]
    AuthenticationFailed { reason: String },

    /// A policy denial surfaced by a service operation that cannot
    /// continue (e.g. registration past the student quota).
    #[error("Access denied: {0}")]
    Denied(DenialReason),

    /// An action reached the guard without a registered policy rule.
    #[error("Unknown action: {action}")]
    UnknownAction { action: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Cryptography error: {0}")]
    Crypto(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CampusError {
    /// Message safe to show to end users. Programming and
    /// infrastructure errors collapse to a generic text.
    pub fn public_message(&self) -> String {
        match self {
            Self::UnknownAction { .. }
            | Self::Database(_)
            | Self::Crypto(_)
            | Self::Internal(_) => "internal error".into(),
            other => other.to_string(),
        }
    }
}

pub type CampusResult<T> = Result<T, CampusError>;
