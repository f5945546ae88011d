//! Tenant resolution and onboarding.

use campus_core::error::{CampusError, CampusResult};
use campus_core::models::principal::{
    AuthenticatedPrincipal, CreatePrincipal, DEFAULT_MIN_PASSWORD_LENGTH, Principal, Role,
    validate_new_credentials,
};
use campus_core::models::tenant::{CreateTenant, SubscriptionTier, Tenant};
use campus_core::repository::{PrincipalRepository, TenantRepository};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::PolicyError;
use crate::subscription::SubscriptionPolicy;

/// Longest accepted code or subdomain label.
pub const MAX_LOOKUP_KEY_LEN: usize = 63;

/// How a request identifies its tenant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TenantLookup {
    Id(Uuid),
    Code(String),
    Subdomain(String),
}

/// Reject empty, overlong, or non `[A-Za-z0-9-]` keys before any query
/// is issued.
pub fn validate_lookup_key(key: &str) -> Result<(), PolicyError> {
    if key.is_empty() {
        return Err(PolicyError::InvalidLookupKey("key is empty".into()));
    }
    if key.len() > MAX_LOOKUP_KEY_LEN {
        return Err(PolicyError::InvalidLookupKey(format!(
            "key longer than {MAX_LOOKUP_KEY_LEN} characters"
        )));
    }
    if !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(PolicyError::InvalidLookupKey(format!(
            "key contains invalid characters: {key:?}"
        )));
    }
    Ok(())
}

/// Maps a [`TenantLookup`] to a tenant record. Exact matches only.
pub struct TenantResolver<T: TenantRepository> {
    tenants: T,
}

impl<T: TenantRepository> TenantResolver<T> {
    pub fn new(tenants: T) -> Self {
        Self { tenants }
    }

    /// Returns `InvalidInput` for a malformed key and `NotFound` when no
    /// tenant matches.
    pub async fn resolve(&self, lookup: &TenantLookup) -> CampusResult<Tenant> {
        match lookup {
            TenantLookup::Id(id) => self.tenants.get_by_id(*id).await,
            TenantLookup::Code(code) => {
                validate_lookup_key(code)?;
                self.tenants.get_by_code(code).await
            }
            TenantLookup::Subdomain(label) => {
                validate_lookup_key(label)?;
                self.tenants.get_by_subdomain(&label.to_ascii_lowercase()).await
            }
        }
    }

    /// The tenant an authenticated principal belongs to.
    pub async fn resolve_for(&self, principal: &AuthenticatedPrincipal) -> CampusResult<Tenant> {
        self.tenants.get_by_id(principal.tenant_id).await
    }
}

/// Input for onboarding a new institute and its owner.
#[derive(Debug, Clone)]
pub struct OnboardTenant {
    pub name: String,
    pub code: String,
    pub subdomain: String,
    pub owner_email: String,
    pub owner_name: String,
    pub owner_password: String,
}

/// Creates tenants at the `Basic` tier together with their owner.
pub struct TenantService<T: TenantRepository, P: PrincipalRepository> {
    tenants: T,
    principals: P,
    policy: SubscriptionPolicy,
    min_password_length: usize,
}

impl<T: TenantRepository, P: PrincipalRepository> TenantService<T, P> {
    pub fn new(tenants: T, principals: P, policy: SubscriptionPolicy) -> Self {
        Self {
            tenants,
            principals,
            policy,
            min_password_length: DEFAULT_MIN_PASSWORD_LENGTH,
        }
    }

    /// Override the minimum owner password length. Should match the
    /// value registration uses.
    pub fn with_min_password_length(mut self, min_password_length: usize) -> Self {
        self.min_password_length = min_password_length;
        self
    }

    /// Create the tenant and its Owner.
    ///
    /// Both records exist afterwards or neither does: if the owner
    /// cannot be created the tenant is deleted again, so its code and
    /// subdomain stay free for a retry.
    pub async fn onboard(&self, input: OnboardTenant) -> CampusResult<(Tenant, Principal)> {
        validate_lookup_key(&input.code)?;
        validate_lookup_key(&input.subdomain)?;
        if input.name.trim().is_empty() {
            return Err(CampusError::InvalidInput {
                message: "institute name is empty".into(),
            });
        }
        let owner_email = validate_new_credentials(
            &input.owner_email,
            &input.owner_password,
            self.min_password_length,
        )?;

        let basic = self.policy.tier_change(SubscriptionTier::Basic);
        let tenant = self
            .tenants
            .create(CreateTenant {
                name: input.name,
                code: input.code,
                subdomain: input.subdomain.to_ascii_lowercase(),
                subscription_tier: basic.tier,
                student_limit: basic.student_limit,
                class_limit: basic.class_limit,
            })
            .await?;

        let created = self
            .principals
            .create(CreatePrincipal {
                tenant_id: tenant.id,
                email: owner_email,
                name: input.owner_name,
                role: Role::Owner,
                password: input.owner_password,
            })
            .await;
        let owner = match created {
            Ok(owner) => owner,
            Err(err) => {
                warn!(
                    tenant_id = %tenant.id,
                    error = %err,
                    "Owner creation failed, removing tenant"
                );
                if let Err(cleanup) = self.tenants.delete(tenant.id).await {
                    warn!(
                        tenant_id = %tenant.id,
                        error = %cleanup,
                        "Tenant rollback failed"
                    );
                }
                return Err(err);
            }
        };

        info!(
            tenant_id = %tenant.id,
            code = %tenant.code,
            owner_id = %owner.id,
            "Tenant onboarded"
        );

        Ok((tenant, owner))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_codes_and_labels() {
        assert!(validate_lookup_key("NORTH-01").is_ok());
        assert!(validate_lookup_key("northside").is_ok());
    }

    #[test]
    fn rejects_malformed_keys() {
        for key in ["", "north side", "north.side", "%", "ä"] {
            assert!(
                matches!(validate_lookup_key(key), Err(PolicyError::InvalidLookupKey(_))),
                "{key:?} should be rejected"
            );
        }
        let long = "a".repeat(MAX_LOOKUP_KEY_LEN + 1);
        assert!(validate_lookup_key(&long).is_err());
        assert!(validate_lookup_key(&long[..MAX_LOOKUP_KEY_LEN]).is_ok());
    }
}
