//! Subscription configuration.

use campus_core::models::tenant::{SubscriptionTier, UsageLimit};

/// Quotas granted by one tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierQuota {
    pub students: UsageLimit,
    pub classes: UsageLimit,
}

/// Default quotas per subscription tier.
///
/// Applied whenever a tenant's tier changes, including onboarding and
/// cancellation.
#[derive(Debug, Clone)]
pub struct SubscriptionConfig {
    pub basic: TierQuota,
    pub pro: TierQuota,
    pub enterprise: TierQuota,
}

impl SubscriptionConfig {
    pub fn quota(&self, tier: SubscriptionTier) -> TierQuota {
        match tier {
            SubscriptionTier::Basic => self.basic,
            SubscriptionTier::Pro => self.pro,
            SubscriptionTier::Enterprise => self.enterprise,
        }
    }
}

impl Default for SubscriptionConfig {
    fn default() -> Self {
        Self {
            basic: TierQuota {
                students: UsageLimit::Max(50),
                classes: UsageLimit::Max(5),
            },
            pro: TierQuota {
                students: UsageLimit::Max(500),
                classes: UsageLimit::Max(50),
            },
            enterprise: TierQuota {
                students: UsageLimit::Unlimited,
                classes: UsageLimit::Unlimited,
            },
        }
    }
}
