//! SurrealDB implementation of [`TenantRepository`].

use campus_core::error::CampusResult;
use campus_core::models::tenant::{CreateTenant, Tenant, TierChange, UsageLimit};
use campus_core::repository::TenantRepository;
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use super::parse_uuid;
use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct TenantRow {
    name: String,
    code: String,
    subdomain: String,
    subscription_tier: String,
    student_limit: i64,
    class_limit: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TenantRow {
    fn into_tenant(self, id: Uuid) -> Result<Tenant, DbError> {
        let subscription_tier = self.subscription_tier.parse().map_err(DbError::Decode)?;
        Ok(Tenant {
            id,
            name: self.name,
            code: self.code,
            subdomain: self.subdomain,
            subscription_tier,
            student_limit: UsageLimit::from_stored(self.student_limit),
            class_limit: UsageLimit::from_stored(self.class_limit),
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct TenantRowWithId {
    record_id: String,
    name: String,
    code: String,
    subdomain: String,
    subscription_tier: String,
    student_limit: i64,
    class_limit: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TenantRowWithId {
    fn try_into_tenant(self) -> Result<Tenant, DbError> {
        let id = parse_uuid(&self.record_id, "tenant")?;
        TenantRow {
            name: self.name,
            code: self.code,
            subdomain: self.subdomain,
            subscription_tier: self.subscription_tier,
            student_limit: self.student_limit,
            class_limit: self.class_limit,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
        .into_tenant(id)
    }
}

/// SurrealDB implementation of the Tenant repository.
#[derive(Clone)]
pub struct SurrealTenantRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealTenantRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    /// Single-row lookup on an exact field match.
    async fn get_by_field(&self, field: &'static str, value: &str) -> CampusResult<Tenant> {
        let query = format!(
            "SELECT meta::id(id) AS record_id, * FROM tenant \
             WHERE {field} = $value"
        );

        let mut result = self
            .db
            .query(query)
            .bind(("value", value.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TenantRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "tenant".into(),
            id: format!("{field}={value}"),
        })?;

        Ok(row.try_into_tenant()?)
    }
}

impl<C: Connection> TenantRepository for SurrealTenantRepository<C> {
    async fn create(&self, input: CreateTenant) -> CampusResult<Tenant> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('tenant', $id) SET \
                 name = $name, code = $code, subdomain = $subdomain, \
                 subscription_tier = $tier, \
                 student_limit = $student_limit, \
                 class_limit = $class_limit",
            )
            .bind(("id", id_str.clone()))
            .bind(("name", input.name))
            .bind(("code", input.code))
            .bind(("subdomain", input.subdomain))
            .bind(("tier", input.subscription_tier.as_str().to_string()))
            .bind(("student_limit", input.student_limit.to_stored()))
            .bind(("class_limit", input.class_limit.to_stored()))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::from_statement("tenant", e))?;

        let rows: Vec<TenantRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "tenant".into(),
            id: id_str,
        })?;

        Ok(row.into_tenant(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> CampusResult<Tenant> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('tenant', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TenantRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "tenant".into(),
            id: id_str,
        })?;

        Ok(row.into_tenant(id)?)
    }

    async fn get_by_code(&self, code: &str) -> CampusResult<Tenant> {
        self.get_by_field("code", code).await
    }

    async fn get_by_subdomain(&self, subdomain: &str) -> CampusResult<Tenant> {
        self.get_by_field("subdomain", subdomain).await
    }

    async fn update_subscription(&self, id: Uuid, change: TierChange) -> CampusResult<Tenant> {
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "UPDATE type::record('tenant', $id) SET \
                 subscription_tier = $tier, \
                 student_limit = $student_limit, \
                 class_limit = $class_limit, \
                 updated_at = time::now()",
            )
            .bind(("id", id_str.clone()))
            .bind(("tier", change.tier.as_str().to_string()))
            .bind(("student_limit", change.student_limit.to_stored()))
            .bind(("class_limit", change.class_limit.to_stored()))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::from_statement("tenant", e))?;

        let rows: Vec<TenantRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "tenant".into(),
            id: id_str,
        })?;

        Ok(row.into_tenant(id)?)
    }

    async fn delete(&self, id: Uuid) -> CampusResult<()> {
        self.db
            .query("DELETE type::record('tenant', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(DbError::from)?;

        Ok(())
    }
}
