//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Tenant-scoped repositories
//! require a `tenant_id` parameter and implementations must filter every
//! query on it; this is the isolation contract the policy layer relies
//! on.

use uuid::Uuid;

use crate::error::CampusResult;
use crate::models::{
    enrollment::Enrollment,
    principal::{CreatePrincipal, Principal, Role},
    resource::{CreateResource, Resource, ResourceKind},
    tenant::{CreateTenant, Tenant, TierChange},
};

// ---------------------------------------------------------------------------
// Tenants (global scope)
// ---------------------------------------------------------------------------

pub trait TenantRepository: Send + Sync {
    fn create(&self, input: CreateTenant) -> impl Future<Output = CampusResult<Tenant>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = CampusResult<Tenant>> + Send;
    /// Exact match on the tenant join code.
    fn get_by_code(&self, code: &str) -> impl Future<Output = CampusResult<Tenant>> + Send;
    /// Exact match on the subdomain label.
    fn get_by_subdomain(
        &self,
        subdomain: &str,
    ) -> impl Future<Output = CampusResult<Tenant>> + Send;
    /// Overwrite tier and quotas in one write.
    fn update_subscription(
        &self,
        id: Uuid,
        change: TierChange,
    ) -> impl Future<Output = CampusResult<Tenant>> + Send;
    /// Remove a tenant record. Used to undo a half-finished onboarding;
    /// deleting a missing tenant is a no-op.
    fn delete(&self, id: Uuid) -> impl Future<Output = CampusResult<()>> + Send;
}

// ---------------------------------------------------------------------------
// Tenant-scoped repositories
// ---------------------------------------------------------------------------

pub trait PrincipalRepository: Send + Sync {
    fn create(
        &self,
        input: CreatePrincipal,
    ) -> impl Future<Output = CampusResult<Principal>> + Send;
    fn get_by_id(
        &self,
        tenant_id: Uuid,
        id: Uuid,
    ) -> impl Future<Output = CampusResult<Principal>> + Send;
    fn get_by_email(
        &self,
        tenant_id: Uuid,
        email: &str,
    ) -> impl Future<Output = CampusResult<Principal>> + Send;
    /// Number of principals holding `role` in the tenant.
    fn count_by_role(
        &self,
        tenant_id: Uuid,
        role: Role,
    ) -> impl Future<Output = CampusResult<u64>> + Send;
}

pub trait ResourceRepository: Send + Sync {
    fn create(&self, input: CreateResource)
    -> impl Future<Output = CampusResult<Resource>> + Send;
    fn get_by_id(
        &self,
        tenant_id: Uuid,
        id: Uuid,
    ) -> impl Future<Output = CampusResult<Resource>> + Send;
    /// Number of resources of `kind` in the tenant.
    fn count_by_kind(
        &self,
        tenant_id: Uuid,
        kind: ResourceKind,
    ) -> impl Future<Output = CampusResult<u64>> + Send;
    /// Resources of `kind` managed by `owner_id`.
    fn list_by_owner(
        &self,
        tenant_id: Uuid,
        owner_id: Uuid,
        kind: ResourceKind,
    ) -> impl Future<Output = CampusResult<Vec<Resource>>> + Send;
}

pub trait EnrollmentRepository: Send + Sync {
    fn enroll(
        &self,
        tenant_id: Uuid,
        class_id: Uuid,
        student_id: Uuid,
    ) -> impl Future<Output = CampusResult<Enrollment>> + Send;
    fn unenroll(
        &self,
        tenant_id: Uuid,
        class_id: Uuid,
        student_id: Uuid,
    ) -> impl Future<Output = CampusResult<()>> + Send;
    fn is_enrolled(
        &self,
        tenant_id: Uuid,
        class_id: Uuid,
        student_id: Uuid,
    ) -> impl Future<Output = CampusResult<bool>> + Send;
    fn list_for_class(
        &self,
        tenant_id: Uuid,
        class_id: Uuid,
    ) -> impl Future<Output = CampusResult<Vec<Enrollment>>> + Send;
}
