//! Access decisions.
//!
//! Authorization and entitlement checks return a [`Decision`] value
//! rather than an error, so callers branch on the reason without any
//! error handling. Only programming errors and storage failures travel
//! through [`crate::error::CampusError`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::tenant::SubscriptionTier;

/// Why a request was denied. Every variant is recoverable and carries a
/// stable machine-readable [`code`](DenialReason::code).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum DenialReason {
    /// The target belongs to a different tenant than the caller.
    CrossTenant,
    /// The caller's role may not perform the action on this target.
    InsufficientRole,
    /// The caller is not enrolled in the target class.
    NotEnrolled,
    /// The caller's role may not address a principal with this role.
    RecipientRoleNotAllowed,
    /// The tenant's tier is below the one the feature requires.
    TierInsufficient {
        required: SubscriptionTier,
        current: SubscriptionTier,
    },
    /// The tenant has used up a countable quota.
    QuotaExceeded { limit: u64, used: u64 },
}

impl DenialReason {
    pub fn code(&self) -> &'static str {
        match self {
            Self::CrossTenant => "cross_tenant",
            Self::InsufficientRole => "insufficient_role",
            Self::NotEnrolled => "not_enrolled",
            Self::RecipientRoleNotAllowed => "recipient_role_not_allowed",
            Self::TierInsufficient { .. } => "tier_insufficient",
            Self::QuotaExceeded { .. } => "quota_exceeded",
        }
    }
}

impl fmt::Display for DenialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CrossTenant => f.write_str("resource belongs to another institute"),
            Self::InsufficientRole => f.write_str("role does not permit this action"),
            Self::NotEnrolled => f.write_str("not enrolled in this class"),
            Self::RecipientRoleNotAllowed => f.write_str("recipient role not allowed"),
            Self::TierInsufficient { required, current } => {
                write!(f, "requires {required} subscription (current: {current})")
            }
            Self::QuotaExceeded { limit, used } => {
                write!(f, "quota exceeded ({used} of {limit} used)")
            }
        }
    }
}

/// Outcome of an authorization or entitlement check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", content = "reason", rename_all = "snake_case")]
pub enum Decision {
    Allowed,
    Denied(DenialReason),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }

    pub fn reason(&self) -> Option<DenialReason> {
        match self {
            Self::Allowed => None,
            Self::Denied(reason) => Some(*reason),
        }
    }

    /// Convert into a `Result`, for service code that treats a denial as
    /// the end of the operation.
    pub fn into_result(self) -> Result<(), DenialReason> {
        match self {
            Self::Allowed => Ok(()),
            Self::Denied(reason) => Err(reason),
        }
    }
}

impl From<DenialReason> for Decision {
    fn from(reason: DenialReason) -> Self {
        Self::Denied(reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        let cases = [
            (DenialReason::CrossTenant, "cross_tenant"),
            (DenialReason::InsufficientRole, "insufficient_role"),
            (DenialReason::NotEnrolled, "not_enrolled"),
            (
                DenialReason::RecipientRoleNotAllowed,
                "recipient_role_not_allowed",
            ),
            (
                DenialReason::TierInsufficient {
                    required: SubscriptionTier::Pro,
                    current: SubscriptionTier::Basic,
                },
                "tier_insufficient",
            ),
            (
                DenialReason::QuotaExceeded {
                    limit: 100,
                    used: 100,
                },
                "quota_exceeded",
            ),
        ];

        for (reason, code) in cases {
            assert_eq!(reason.code(), code);
            assert!(!reason.to_string().is_empty());
        }
    }

    #[test]
    fn quota_denial_serializes_limit_and_used() {
        let decision = Decision::Denied(DenialReason::QuotaExceeded {
            limit: 100,
            used: 100,
        });
        let json = serde_json::to_value(decision).unwrap();
        assert_eq!(json["decision"], "denied");
        assert_eq!(json["reason"]["code"], "quota_exceeded");
        assert_eq!(json["reason"]["limit"], 100);
        assert_eq!(json["reason"]["used"], 100);
    }

    #[test]
    fn into_result_maps_denial() {
        assert_eq!(Decision::Allowed.into_result(), Ok(()));
        assert_eq!(
            Decision::Denied(DenialReason::NotEnrolled).into_result(),
            Err(DenialReason::NotEnrolled)
        );
    }
}
