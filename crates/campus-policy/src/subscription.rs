//! Subscription policy: tier-gated features, countable quotas and tier
//! transitions.

pub mod service;

use std::fmt;

use campus_core::decision::{Decision, DenialReason};
use campus_core::models::tenant::{SubscriptionTier, Tenant, TierChange, UsageLimit};
use serde::{Deserialize, Serialize};

use crate::config::SubscriptionConfig;
use crate::error::PolicyError;

pub use service::{SubscriptionService, UsageCounter};

/// Features gated by subscription tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    Attendance,
    Homework,
    Messaging,
    Announcements,
    QrAttendance,
    ParentPortal,
    Notifications,
    Analytics,
    CustomBranding,
    ApiAccess,
}

impl Feature {
    pub const ALL: [Feature; 10] = [
        Self::Attendance,
        Self::Homework,
        Self::Messaging,
        Self::Announcements,
        Self::QrAttendance,
        Self::ParentPortal,
        Self::Notifications,
        Self::Analytics,
        Self::CustomBranding,
        Self::ApiAccess,
    ];

    /// Lowest tier that includes this feature.
    pub fn required_tier(self) -> SubscriptionTier {
        match self {
            Self::Attendance | Self::Homework | Self::Messaging | Self::Announcements => {
                SubscriptionTier::Basic
            }
            Self::QrAttendance | Self::ParentPortal | Self::Notifications | Self::Analytics => {
                SubscriptionTier::Pro
            }
            Self::CustomBranding | Self::ApiAccess => SubscriptionTier::Enterprise,
        }
    }
}

/// Countable resources bounded by a tenant quota.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuotaKind {
    Students,
    Classes,
}

impl QuotaKind {
    pub fn limit_for(self, tenant: &Tenant) -> UsageLimit {
        match self {
            Self::Students => tenant.student_limit,
            Self::Classes => tenant.class_limit,
        }
    }
}

impl fmt::Display for QuotaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Students => f.write_str("students"),
            Self::Classes => f.write_str("classes"),
        }
    }
}

/// What an entitlement check asks about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Feature(Feature),
    /// Room for one more of `kind`, given `used` already counted.
    Quota { kind: QuotaKind, used: u64 },
}

/// Allowed iff the limit is unlimited or `used < limit`.
pub fn check_quota(limit: UsageLimit, used: u64) -> Decision {
    match limit {
        UsageLimit::Unlimited => Decision::Allowed,
        UsageLimit::Max(max) if used < max => Decision::Allowed,
        UsageLimit::Max(max) => DenialReason::QuotaExceeded { limit: max, used }.into(),
    }
}

#[derive(Debug, Clone, Default)]
pub struct SubscriptionPolicy {
    config: SubscriptionConfig,
}

impl SubscriptionPolicy {
    pub fn new(config: SubscriptionConfig) -> Self {
        Self { config }
    }

    pub fn check_entitlement(&self, tenant: &Tenant, requirement: Requirement) -> Decision {
        match requirement {
            Requirement::Feature(feature) => {
                let required = feature.required_tier();
                if tenant.subscription_tier >= required {
                    Decision::Allowed
                } else {
                    DenialReason::TierInsufficient {
                        required,
                        current: tenant.subscription_tier,
                    }
                    .into()
                }
            }
            Requirement::Quota { kind, used } => check_quota(kind.limit_for(tenant), used),
        }
    }

    /// Subscription state for `tier` with its configured quotas.
    pub fn tier_change(&self, tier: SubscriptionTier) -> TierChange {
        let quota = self.config.quota(tier);
        TierChange {
            tier,
            student_limit: quota.students,
            class_limit: quota.classes,
        }
    }

    /// Validate an upgrade. Only a strict increase in rank is accepted.
    pub fn upgrade(
        &self,
        current: SubscriptionTier,
        target: SubscriptionTier,
    ) -> Result<TierChange, PolicyError> {
        if target.rank() <= current.rank() {
            return Err(PolicyError::InvalidTierTransition {
                from: current,
                to: target,
            });
        }
        Ok(self.tier_change(target))
    }

    /// Administrative override; any tier is accepted.
    pub fn set(&self, target: SubscriptionTier) -> TierChange {
        self.tier_change(target)
    }

    /// Cancellation drops straight to `Basic` and its quotas. There is no
    /// proration or grace period.
    pub fn cancel(&self) -> TierChange {
        self.tier_change(SubscriptionTier::Basic)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;

    fn tenant(tier: SubscriptionTier, student_limit: UsageLimit) -> Tenant {
        Tenant {
            id: Uuid::new_v4(),
            name: "Northside Academy".into(),
            code: "NORTH-01".into(),
            subdomain: "northside".into(),
            subscription_tier: tier,
            student_limit,
            class_limit: UsageLimit::Max(5),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn quota_is_strict() {
        assert_eq!(check_quota(UsageLimit::Max(100), 99), Decision::Allowed);
        assert_eq!(
            check_quota(UsageLimit::Max(100), 100),
            Decision::Denied(DenialReason::QuotaExceeded {
                limit: 100,
                used: 100
            })
        );
        assert!(!check_quota(UsageLimit::Max(100), 250).is_allowed());
        assert!(!check_quota(UsageLimit::Max(0), 0).is_allowed());
        assert!(check_quota(UsageLimit::Unlimited, u64::MAX).is_allowed());
    }

    #[test]
    fn enrolling_past_student_limit_reports_numbers() {
        let policy = SubscriptionPolicy::default();
        let t = tenant(SubscriptionTier::Pro, UsageLimit::Max(100));
        let d = policy.check_entitlement(
            &t,
            Requirement::Quota {
                kind: QuotaKind::Students,
                used: 100,
            },
        );
        assert_eq!(
            d,
            Decision::Denied(DenialReason::QuotaExceeded {
                limit: 100,
                used: 100
            })
        );
    }

    #[test]
    fn class_quota_uses_class_limit() {
        let policy = SubscriptionPolicy::default();
        let t = tenant(SubscriptionTier::Basic, UsageLimit::Unlimited);
        let d = policy.check_entitlement(
            &t,
            Requirement::Quota {
                kind: QuotaKind::Classes,
                used: 5,
            },
        );
        assert_eq!(d.reason().map(|r| r.code()), Some("quota_exceeded"));
    }

    #[test]
    fn feature_gating_reports_required_tier() {
        let policy = SubscriptionPolicy::default();
        let t = tenant(SubscriptionTier::Basic, UsageLimit::Max(50));
        let d = policy.check_entitlement(&t, Requirement::Feature(Feature::QrAttendance));
        assert_eq!(
            d,
            Decision::Denied(DenialReason::TierInsufficient {
                required: SubscriptionTier::Pro,
                current: SubscriptionTier::Basic,
            })
        );
        let d = policy.check_entitlement(&t, Requirement::Feature(Feature::Attendance));
        assert_eq!(d, Decision::Allowed);
    }

    #[test]
    fn features_are_monotonic_in_tier() {
        let policy = SubscriptionPolicy::default();
        for feature in Feature::ALL {
            let mut granted = false;
            for tier in SubscriptionTier::ALL {
                let t = tenant(tier, UsageLimit::Unlimited);
                let allowed = policy
                    .check_entitlement(&t, Requirement::Feature(feature))
                    .is_allowed();
                assert!(
                    allowed || !granted,
                    "{feature:?} granted below {tier} but not at {tier}"
                );
                granted |= allowed;
            }
            assert!(granted, "{feature:?} unavailable at every tier");
        }
    }

    #[test]
    fn upgrade_requires_strict_increase() {
        let policy = SubscriptionPolicy::default();
        let change = policy
            .upgrade(SubscriptionTier::Basic, SubscriptionTier::Pro)
            .unwrap();
        assert_eq!(change.tier, SubscriptionTier::Pro);
        assert_eq!(change.student_limit, UsageLimit::Max(500));

        assert!(matches!(
            policy.upgrade(SubscriptionTier::Pro, SubscriptionTier::Basic),
            Err(PolicyError::InvalidTierTransition { .. })
        ));
        assert!(matches!(
            policy.upgrade(SubscriptionTier::Pro, SubscriptionTier::Pro),
            Err(PolicyError::InvalidTierTransition { .. })
        ));
    }

    #[test]
    fn set_accepts_any_tier() {
        let policy = SubscriptionPolicy::default();
        let change = policy.set(SubscriptionTier::Basic);
        assert_eq!(change.tier, SubscriptionTier::Basic);
        assert_eq!(change.student_limit, UsageLimit::Max(50));
    }

    #[test]
    fn cancel_resets_to_basic_quotas() {
        let policy = SubscriptionPolicy::default();
        let change = policy.cancel();
        assert_eq!(
            change,
            TierChange {
                tier: SubscriptionTier::Basic,
                student_limit: UsageLimit::Max(50),
                class_limit: UsageLimit::Max(5),
            }
        );
    }

    #[test]
    fn enterprise_quotas_are_unlimited() {
        let change = SubscriptionPolicy::default().set(SubscriptionTier::Enterprise);
        assert!(change.student_limit.is_unlimited());
        assert!(change.class_limit.is_unlimited());
    }
}
