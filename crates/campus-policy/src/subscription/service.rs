//! Subscription lifecycle and usage counting over the repositories.

use campus_core::error::CampusResult;
use campus_core::models::principal::Role;
use campus_core::models::resource::ResourceKind;
use campus_core::models::tenant::{SubscriptionTier, Tenant, TierChange};
use campus_core::repository::{PrincipalRepository, ResourceRepository, TenantRepository};
use tracing::info;
use uuid::Uuid;

use super::{QuotaKind, SubscriptionPolicy};

/// Applies tier changes validated by [`SubscriptionPolicy`].
///
/// Upgrade and set are separate operations: an upgrade must strictly
/// raise the tier, while set is an administrative override.
pub struct SubscriptionService<T: TenantRepository> {
    tenants: T,
    policy: SubscriptionPolicy,
}

impl<T: TenantRepository> SubscriptionService<T> {
    pub fn new(tenants: T, policy: SubscriptionPolicy) -> Self {
        Self { tenants, policy }
    }

    pub async fn upgrade(&self, tenant_id: Uuid, target: SubscriptionTier) -> CampusResult<Tenant> {
        let tenant = self.tenants.get_by_id(tenant_id).await?;
        let change = self.policy.upgrade(tenant.subscription_tier, target)?;
        self.apply(&tenant, change, "upgrade").await
    }

    pub async fn set_tier(&self, tenant_id: Uuid, target: SubscriptionTier) -> CampusResult<Tenant> {
        let tenant = self.tenants.get_by_id(tenant_id).await?;
        let change = self.policy.set(target);
        self.apply(&tenant, change, "set").await
    }

    /// Cancel the subscription. Always succeeds for an existing tenant
    /// and takes effect immediately.
    pub async fn cancel(&self, tenant_id: Uuid) -> CampusResult<Tenant> {
        let tenant = self.tenants.get_by_id(tenant_id).await?;
        let change = self.policy.cancel();
        self.apply(&tenant, change, "cancel").await
    }

    async fn apply(&self, tenant: &Tenant, change: TierChange, operation: &str) -> CampusResult<Tenant> {
        let updated = self.tenants.update_subscription(tenant.id, change).await?;
        info!(
            tenant_id = %tenant.id,
            operation,
            from = %tenant.subscription_tier,
            to = %updated.subscription_tier,
            student_limit = %updated.student_limit,
            class_limit = %updated.class_limit,
            "Subscription tier changed"
        );
        Ok(updated)
    }
}

/// Derives usage counters on demand from tenant-scoped counts.
pub struct UsageCounter<P: PrincipalRepository, R: ResourceRepository> {
    principals: P,
    resources: R,
}

impl<P: PrincipalRepository, R: ResourceRepository> UsageCounter<P, R> {
    pub fn new(principals: P, resources: R) -> Self {
        Self {
            principals,
            resources,
        }
    }

    pub async fn usage(&self, tenant_id: Uuid, kind: QuotaKind) -> CampusResult<u64> {
        match kind {
            QuotaKind::Students => self.student_usage(tenant_id).await,
            QuotaKind::Classes => self.class_usage(tenant_id).await,
        }
    }

    /// Student principals in the tenant.
    pub async fn student_usage(&self, tenant_id: Uuid) -> CampusResult<u64> {
        self.principals.count_by_role(tenant_id, Role::Student).await
    }

    /// Class resources in the tenant.
    pub async fn class_usage(&self, tenant_id: Uuid) -> CampusResult<u64> {
        self.resources
            .count_by_kind(tenant_id, ResourceKind::Class)
            .await
    }
}
