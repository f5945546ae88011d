//! Role policy: who may do what to which in-tenant target.

use campus_core::decision::{Decision, DenialReason};
use campus_core::models::principal::{AuthenticatedPrincipal, Role};
use campus_core::models::resource::Resource;

use crate::action::{Action, Rule};
use crate::error::PolicyError;

/// What an action is aimed at. Everything is optional; which parts are
/// consulted depends on the action's [`Rule`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Target<'a> {
    pub resource: Option<&'a Resource>,
    /// Whether the caller is enrolled in `resource` (a class). Only
    /// consulted for QR scans.
    pub enrolled: bool,
    /// Addressee of a message.
    pub recipient: Option<&'a AuthenticatedPrincipal>,
}

impl<'a> Target<'a> {
    pub fn resource(resource: &'a Resource) -> Self {
        Self {
            resource: Some(resource),
            ..Self::default()
        }
    }

    pub fn recipient(recipient: &'a AuthenticatedPrincipal) -> Self {
        Self {
            recipient: Some(recipient),
            ..Self::default()
        }
    }
}

/// Roles each sender role may address.
pub fn allowed_recipients(sender: Role) -> &'static [Role] {
    match sender {
        Role::Owner | Role::Admin => &Role::ALL,
        Role::Teacher => &[
            Role::Teacher,
            Role::Student,
            Role::Parent,
            Role::Admin,
            Role::Owner,
        ],
        Role::Student => &[Role::Teacher, Role::Parent, Role::Admin, Role::Owner],
        Role::Parent => &[Role::Teacher, Role::Admin, Role::Owner],
    }
}

/// Decide whether `principal` may perform `action` on `target`.
///
/// Tenant isolation is checked before anything else: a target from
/// another tenant is `CrossTenant` whatever the role.
pub fn authorize(
    action: Action,
    principal: &AuthenticatedPrincipal,
    target: &Target<'_>,
) -> Result<Decision, PolicyError> {
    let foreign_resource = target
        .resource
        .is_some_and(|r| r.tenant_id != principal.tenant_id);
    let foreign_recipient = target
        .recipient
        .is_some_and(|r| r.tenant_id != principal.tenant_id);
    if foreign_resource || foreign_recipient {
        return Ok(DenialReason::CrossTenant.into());
    }

    let decision = match action.rule() {
        Rule::TenantMember => Decision::Allowed,
        Rule::Manage => manage(principal, target.resource),
        Rule::QrScan => qr_scan(principal, target),
        Rule::Messaging => {
            let recipient = target
                .recipient
                .ok_or(PolicyError::MissingRecipient { action })?;
            message(principal.role, recipient.role)
        }
    };

    Ok(decision)
}

fn manage(principal: &AuthenticatedPrincipal, resource: Option<&Resource>) -> Decision {
    let owns_target = resource.is_some_and(|r| r.is_owned_by(principal.id));
    match principal.role {
        role if role.is_administrator() => Decision::Allowed,
        Role::Teacher if owns_target => Decision::Allowed,
        _ => DenialReason::InsufficientRole.into(),
    }
}

fn qr_scan(principal: &AuthenticatedPrincipal, target: &Target<'_>) -> Decision {
    if principal.role != Role::Student {
        return DenialReason::InsufficientRole.into();
    }
    if target.resource.is_none() || !target.enrolled {
        return DenialReason::NotEnrolled.into();
    }
    Decision::Allowed
}

fn message(sender: Role, recipient: Role) -> Decision {
    if allowed_recipients(sender).contains(&recipient) {
        Decision::Allowed
    } else {
        DenialReason::RecipientRoleNotAllowed.into()
    }
}
