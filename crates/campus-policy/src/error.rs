//! Policy error types.
//!
//! Denials are not errors; they are [`campus_core::Decision`] values.
//! This type covers the conditions a caller cannot branch on.

use campus_core::error::CampusError;
use campus_core::models::tenant::SubscriptionTier;
use thiserror::Error;

use crate::action::Action;

#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("unknown action: {0}")]
    UnknownAction(String),

    #[error("{action} requires a recipient")]
    MissingRecipient { action: Action },

    #[error("cannot upgrade from {from} to {to}")]
    InvalidTierTransition {
        from: SubscriptionTier,
        to: SubscriptionTier,
    },

    #[error("invalid lookup key: {0}")]
    InvalidLookupKey(String),
}

impl From<PolicyError> for CampusError {
    fn from(err: PolicyError) -> Self {
        match err {
            PolicyError::UnknownAction(action) => CampusError::UnknownAction { action },
            PolicyError::MissingRecipient { .. }
            | PolicyError::InvalidTierTransition { .. }
            | PolicyError::InvalidLookupKey(_) => {
                CampusError::InvalidInput {
                    message: err.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_action_maps_to_internal_kind() {
        let err: CampusError = PolicyError::UnknownAction("class.teleport".into()).into();
        assert!(matches!(err, CampusError::UnknownAction { ref action } if action == "class.teleport"));
        assert_eq!(err.public_message(), "internal error");
    }

    #[test]
    fn invalid_transition_is_invalid_input() {
        let err: CampusError = PolicyError::InvalidTierTransition {
            from: SubscriptionTier::Pro,
            to: SubscriptionTier::Basic,
        }
        .into();
        match err {
            CampusError::InvalidInput { message } => {
                assert_eq!(message, "cannot upgrade from PRO to BASIC");
            }
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn missing_recipient_is_invalid_input() {
        let err: CampusError = PolicyError::MissingRecipient {
            action: Action::MessageSend,
        }
        .into();
        match err {
            CampusError::InvalidInput { message } => {
                assert_eq!(message, "message.send requires a recipient");
            }
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }
}
