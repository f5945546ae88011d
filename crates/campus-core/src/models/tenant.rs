//! Tenant domain model.
//!
//! A tenant is one institute. It is the unit of data isolation: every
//! principal and resource belongs to exactly one tenant, and no access
//! ever crosses a tenant boundary.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stored integer meaning "no limit" for [`UsageLimit`] columns.
pub const UNLIMITED_SENTINEL: i64 = -1;

/// Subscription tier of a tenant.
///
/// Variants are declared in rank order, so the derived `Ord` is the
/// tier hierarchy `Basic < Pro < Enterprise`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionTier {
    Basic,
    Pro,
    Enterprise,
}

impl SubscriptionTier {
    /// All tiers, lowest first.
    pub const ALL: [SubscriptionTier; 3] = [Self::Basic, Self::Pro, Self::Enterprise];

    /// Numeric rank: `Basic = 1`, `Pro = 2`, `Enterprise = 3`.
    pub fn rank(self) -> u8 {
        match self {
            Self::Basic => 1,
            Self::Pro => 2,
            Self::Enterprise => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Basic => "BASIC",
            Self::Pro => "PRO",
            Self::Enterprise => "ENTERPRISE",
        }
    }
}

impl fmt::Display for SubscriptionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubscriptionTier {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "BASIC" => Ok(Self::Basic),
            "PRO" => Ok(Self::Pro),
            "ENTERPRISE" => Ok(Self::Enterprise),
            other => Err(format!("unknown subscription tier: {other}")),
        }
    }
}

/// Upper bound on a countable resource (students, classes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UsageLimit {
    Unlimited,
    Max(u64),
}

impl UsageLimit {
    pub fn is_unlimited(self) -> bool {
        matches!(self, Self::Unlimited)
    }

    /// Storage form: the limit itself, or [`UNLIMITED_SENTINEL`].
    pub fn to_stored(self) -> i64 {
        match self {
            Self::Unlimited => UNLIMITED_SENTINEL,
            Self::Max(n) => i64::try_from(n).unwrap_or(i64::MAX),
        }
    }

    /// Inverse of [`UsageLimit::to_stored`]. Any negative value reads as
    /// unlimited.
    pub fn from_stored(value: i64) -> Self {
        u64::try_from(value).map_or(Self::Unlimited, Self::Max)
    }
}

impl fmt::Display for UsageLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unlimited => f.write_str("unlimited"),
            Self::Max(n) => write!(f, "{n}"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tenant {
    pub id: Uuid,
    /// Human-readable institute name.
    pub name: String,
    /// Join code members supply at registration and login. Globally unique.
    pub code: String,
    /// Subdomain-style label used as an alternate lookup key. Globally unique.
    pub subdomain: String,
    pub subscription_tier: SubscriptionTier,
    pub student_limit: UsageLimit,
    pub class_limit: UsageLimit,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create a new tenant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTenant {
    pub name: String,
    pub code: String,
    pub subdomain: String,
    pub subscription_tier: SubscriptionTier,
    pub student_limit: UsageLimit,
    pub class_limit: UsageLimit,
}

/// New subscription state written by an upgrade, override or cancel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierChange {
    pub tier: SubscriptionTier,
    pub student_limit: UsageLimit,
    pub class_limit: UsageLimit,
}
