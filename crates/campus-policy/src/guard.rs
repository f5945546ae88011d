//! Request guard: one decision per request from the role and
//! subscription policies.
//!
//! The role policy runs first. Entitlements are only computed when the
//! role check allows the request, so a denied caller never triggers the
//! usage counting an entitlement may need.

use campus_core::decision::{Decision, DenialReason};
use campus_core::models::principal::AuthenticatedPrincipal;
use campus_core::models::resource::Resource;
use campus_core::models::tenant::Tenant;
use tracing::debug;

use crate::action::Action;
use crate::error::PolicyError;
use crate::role::{self, Target};
use crate::subscription::{Requirement, SubscriptionPolicy};

/// Entitlement to check after the role policy passes.
#[derive(Debug, Clone, Copy)]
pub struct Entitlement<'a> {
    pub tenant: &'a Tenant,
    pub requirement: Requirement,
}

/// Everything the guard needs to decide one request.
#[derive(Debug, Clone, Copy)]
pub struct AccessRequest<'a> {
    pub principal: &'a AuthenticatedPrincipal,
    pub action: Action,
    pub target: Target<'a>,
    pub entitlement: Option<Entitlement<'a>>,
}

impl<'a> AccessRequest<'a> {
    pub fn new(principal: &'a AuthenticatedPrincipal, action: Action) -> Self {
        Self {
            principal,
            action,
            target: Target::default(),
            entitlement: None,
        }
    }

    /// Build a request from an action name. Unregistered names are
    /// [`PolicyError::UnknownAction`].
    pub fn named(principal: &'a AuthenticatedPrincipal, action: &str) -> Result<Self, PolicyError> {
        Ok(Self::new(principal, Action::parse(action)?))
    }

    pub fn on(mut self, resource: &'a Resource) -> Self {
        self.target.resource = Some(resource);
        self
    }

    pub fn enrolled(mut self, enrolled: bool) -> Self {
        self.target.enrolled = enrolled;
        self
    }

    pub fn to(mut self, recipient: &'a AuthenticatedPrincipal) -> Self {
        self.target.recipient = Some(recipient);
        self
    }

    pub fn requires(mut self, tenant: &'a Tenant, requirement: Requirement) -> Self {
        self.entitlement = Some(Entitlement {
            tenant,
            requirement,
        });
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct RequestGuard {
    subscriptions: SubscriptionPolicy,
}

impl RequestGuard {
    pub fn new(subscriptions: SubscriptionPolicy) -> Self {
        Self { subscriptions }
    }

    /// Evaluate a request.
    ///
    /// Returns `Ok(Decision)` for every allow/deny outcome. `Err` is
    /// reserved for requests the policy cannot judge at all.
    pub fn evaluate(&self, request: &AccessRequest<'_>) -> Result<Decision, PolicyError> {
        let decision = self.decide(request)?;
        match decision {
            Decision::Allowed => debug!(
                principal_id = %request.principal.id,
                tenant_id = %request.principal.tenant_id,
                action = %request.action,
                "Request allowed"
            ),
            Decision::Denied(reason) => debug!(
                principal_id = %request.principal.id,
                tenant_id = %request.principal.tenant_id,
                action = %request.action,
                reason = reason.code(),
                "Request denied"
            ),
        }
        Ok(decision)
    }

    fn decide(&self, request: &AccessRequest<'_>) -> Result<Decision, PolicyError> {
        let decision = role::authorize(request.action, request.principal, &request.target)?;
        if !decision.is_allowed() {
            return Ok(decision);
        }

        let Some(entitlement) = request.entitlement else {
            return Ok(decision);
        };
        if entitlement.tenant.id != request.principal.tenant_id {
            return Ok(DenialReason::CrossTenant.into());
        }
        Ok(self
            .subscriptions
            .check_entitlement(entitlement.tenant, entitlement.requirement))
    }
}
