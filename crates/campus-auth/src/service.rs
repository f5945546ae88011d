//! Authentication service — login and registration orchestration.

use campus_core::error::{CampusError, CampusResult};
use campus_core::models::principal::{
    AuthenticatedPrincipal, CreatePrincipal, Principal, Role, normalize_email,
    validate_new_credentials,
};
use campus_core::models::tenant::Tenant;
use campus_core::repository::{PrincipalRepository, TenantRepository};
use campus_policy::subscription::{QuotaKind, Requirement, SubscriptionPolicy};
use campus_policy::tenant::{TenantLookup, TenantResolver};
use tracing::{info, warn};

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::password;
use crate::token;

/// Credential triple for the login flow.
#[derive(Debug)]
pub struct LoginInput {
    /// Join code of the institute the caller belongs to.
    pub tenant_code: String,
    pub email: String,
    pub password: String,
}

/// Successful login result.
#[derive(Debug)]
pub struct LoginOutput {
    pub principal: AuthenticatedPrincipal,
    /// Signed session token naming `principal`.
    pub access_token: String,
    /// Session token lifetime in seconds.
    pub expires_in: u64,
}

/// Input for self-registration into an existing institute.
#[derive(Debug)]
pub struct RegisterInput {
    pub tenant_code: String,
    pub email: String,
    pub name: String,
    pub password: String,
    pub role: Role,
}

/// Authentication service.
///
/// Generic over repository implementations so that the auth layer has
/// no dependency on the database crate.
pub struct AuthService<T: TenantRepository, P: PrincipalRepository> {
    tenants: TenantResolver<T>,
    principals: P,
    subscriptions: SubscriptionPolicy,
    config: AuthConfig,
    /// Verified against when the email is unknown. `None` only if
    /// hashing failed at construction.
    dummy_hash: Option<String>,
}

impl<T: TenantRepository, P: PrincipalRepository> AuthService<T, P> {
    pub fn new(
        tenant_repo: T,
        principal_repo: P,
        subscriptions: SubscriptionPolicy,
        config: AuthConfig,
    ) -> Self {
        Self {
            tenants: TenantResolver::new(tenant_repo),
            principals: principal_repo,
            subscriptions,
            config,
            dummy_hash: password::dummy_hash().ok(),
        }
    }

    /// Resolve a credential triple into an authenticated principal and
    /// issue a session token.
    ///
    /// An unknown email and a wrong password fail with the same error
    /// and message, so the response does not reveal whether the email
    /// exists in the institute.
    pub async fn login(&self, input: LoginInput) -> CampusResult<LoginOutput> {
        // 1. Resolve the institute from its join code.
        let tenant = self.tenant_by_code(&input.tenant_code).await?;

        // 2. Look up the principal within that institute.
        let email = normalize_email(&input.email);
        let principal = match self.principals.get_by_email(tenant.id, &email).await {
            Ok(p) => p,
            Err(CampusError::NotFound { .. }) => {
                // Pay the same Argon2 cost as a wrong password.
                if let Some(dummy) = &self.dummy_hash {
                    let _ = password::verify_password(
                        &input.password,
                        dummy,
                        self.config.pepper.as_deref(),
                    );
                }
                warn!(tenant_id = %tenant.id, "Login failed");
                return Err(AuthError::InvalidCredentials.into());
            }
            Err(e) => return Err(e),
        };

        // 3. Verify password.
        let valid = password::verify_password(
            &input.password,
            &principal.password_hash,
            self.config.pepper.as_deref(),
        )?;
        if !valid {
            warn!(tenant_id = %tenant.id, "Login failed");
            return Err(AuthError::InvalidCredentials.into());
        }

        // 4. Issue the session token.
        let authenticated = principal.authenticated();
        let access_token = token::issue_session_token(&authenticated, &self.config)?;

        info!(
            principal_id = %authenticated.id,
            tenant_id = %authenticated.tenant_id,
            role = %authenticated.role,
            "Login succeeded"
        );

        Ok(LoginOutput {
            principal: authenticated,
            access_token,
            expires_in: self.config.session_lifetime_secs,
        })
    }

    /// Register a new principal into the institute named by
    /// `tenant_code`.
    ///
    /// Owners and admins cannot self-register: owners are created at
    /// onboarding and admins by an administrator.
    ///
    /// Student registrations are checked against the tenant's student
    /// quota first. The count and the insert are separate statements,
    /// so concurrent registrations can both pass the check at the
    /// boundary; holding the quota exactly needs both inside one
    /// transaction in the store.
    pub async fn register(&self, input: RegisterInput) -> CampusResult<Principal> {
        if input.role.is_administrator() {
            return Err(CampusError::InvalidInput {
                message: format!("{} accounts cannot self-register", input.role),
            });
        }
        let email = validate_new_credentials(
            &input.email,
            &input.password,
            self.config.min_password_length,
        )?;

        let tenant = self.tenant_by_code(&input.tenant_code).await?;

        if input.role == Role::Student {
            let used = self.principals.count_by_role(tenant.id, Role::Student).await?;
            self.subscriptions
                .check_entitlement(
                    &tenant,
                    Requirement::Quota {
                        kind: QuotaKind::Students,
                        used,
                    },
                )
                .into_result()
                .map_err(CampusError::Denied)?;
        }

        let principal = self
            .principals
            .create(CreatePrincipal {
                tenant_id: tenant.id,
                email,
                name: input.name,
                role: input.role,
                password: input.password,
            })
            .await?;

        info!(
            principal_id = %principal.id,
            tenant_id = %tenant.id,
            role = %principal.role,
            "Principal registered"
        );

        Ok(principal)
    }

    /// Validate a session token issued by [`AuthService::login`].
    pub fn validate(&self, token: &str) -> CampusResult<AuthenticatedPrincipal> {
        Ok(token::validate_session_token(token, &self.config)?)
    }

    /// Resolve a join code, reporting any miss as [`AuthError::InvalidTenant`].
    async fn tenant_by_code(&self, code: &str) -> CampusResult<Tenant> {
        match self
            .tenants
            .resolve(&TenantLookup::Code(code.to_string()))
            .await
        {
            Ok(tenant) => Ok(tenant),
            Err(CampusError::NotFound { .. } | CampusError::InvalidInput { .. }) => {
                warn!("Tenant code did not resolve");
                Err(AuthError::InvalidTenant.into())
            }
            Err(e) => Err(e),
        }
    }
}
