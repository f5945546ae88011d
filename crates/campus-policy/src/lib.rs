//! Campus Policy — tenant resolution, role policy, subscription
//! entitlements and the request guard that composes them.
//!
//! The policies themselves are pure functions over records the caller
//! has already loaded. The async services in [`tenant`] and
//! [`subscription::service`] wrap them around the repository traits
//! from `campus-core`.

pub mod action;
pub mod config;
pub mod error;
pub mod guard;
pub mod role;
pub mod subscription;
pub mod tenant;

pub use action::{Action, Rule};
pub use config::{SubscriptionConfig, TierQuota};
pub use error::PolicyError;
pub use guard::{AccessRequest, Entitlement, RequestGuard};
pub use role::Target;
pub use subscription::{
    Feature, QuotaKind, Requirement, SubscriptionPolicy, SubscriptionService, UsageCounter,
};
pub use tenant::{OnboardTenant, TenantLookup, TenantResolver, TenantService};
