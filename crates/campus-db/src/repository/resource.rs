//! SurrealDB implementation of [`ResourceRepository`].

use campus_core::error::CampusResult;
use campus_core::models::resource::{CreateResource, Resource, ResourceKind};
use campus_core::repository::ResourceRepository;
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use super::{CountRow, parse_optional_uuid, parse_uuid};
use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct ResourceRow {
    tenant_id: String,
    kind: String,
    name: String,
    owner_id: Option<String>,
    parent_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct ResourceRowWithId {
    record_id: String,
    tenant_id: String,
    kind: String,
    name: String,
    owner_id: Option<String>,
    parent_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ResourceRowWithId {
    fn try_into_resource(self) -> Result<Resource, DbError> {
        let id = parse_uuid(&self.record_id, "resource")?;
        row_to_resource(
            ResourceRow {
                tenant_id: self.tenant_id,
                kind: self.kind,
                name: self.name,
                owner_id: self.owner_id,
                parent_id: self.parent_id,
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
            id,
        )
    }
}

fn row_to_resource(row: ResourceRow, id: Uuid) -> Result<Resource, DbError> {
    Ok(Resource {
        id,
        tenant_id: parse_uuid(&row.tenant_id, "tenant")?,
        kind: row.kind.parse().map_err(DbError::Decode)?,
        name: row.name,
        owner_id: parse_optional_uuid(row.owner_id, "owner")?,
        parent_id: parse_optional_uuid(row.parent_id, "parent")?,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

/// SurrealDB implementation of the Resource repository.
#[derive(Clone)]
pub struct SurrealResourceRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealResourceRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> ResourceRepository for SurrealResourceRepository<C> {
    async fn create(&self, input: CreateResource) -> CampusResult<Resource> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('resource', $id) SET \
                 tenant_id = $tenant_id, \
                 kind = $kind, name = $name, \
                 owner_id = $owner_id, \
                 parent_id = $parent_id",
            )
            .bind(("id", id_str.clone()))
            .bind(("tenant_id", input.tenant_id.to_string()))
            .bind(("kind", input.kind.as_str().to_string()))
            .bind(("name", input.name))
            .bind(("owner_id", input.owner_id.map(|o| o.to_string())))
            .bind(("parent_id", input.parent_id.map(|p| p.to_string())))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::from_statement("resource", e))?;

        let rows: Vec<ResourceRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "resource".into(),
            id: id_str,
        })?;

        Ok(row_to_resource(row, id)?)
    }

    async fn get_by_id(&self, tenant_id: Uuid, id: Uuid) -> CampusResult<Resource> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(
                "SELECT * FROM type::record('resource', $id) \
                 WHERE tenant_id = $tenant_id",
            )
            .bind(("id", id_str.clone()))
            .bind(("tenant_id", tenant_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ResourceRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "resource".into(),
            id: id_str,
        })?;

        Ok(row_to_resource(row, id)?)
    }

    async fn count_by_kind(&self, tenant_id: Uuid, kind: ResourceKind) -> CampusResult<u64> {
        let mut result = self
            .db
            .query(
                "SELECT count() AS total FROM resource \
                 WHERE tenant_id = $tenant_id AND kind = $kind GROUP ALL",
            )
            .bind(("tenant_id", tenant_id.to_string()))
            .bind(("kind", kind.as_str().to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0))
    }

    async fn list_by_owner(
        &self,
        tenant_id: Uuid,
        owner_id: Uuid,
        kind: ResourceKind,
    ) -> CampusResult<Vec<Resource>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM resource \
                 WHERE tenant_id = $tenant_id \
                 AND owner_id = $owner_id AND kind = $kind \
                 ORDER BY created_at ASC",
            )
            .bind(("tenant_id", tenant_id.to_string()))
            .bind(("owner_id", owner_id.to_string()))
            .bind(("kind", kind.as_str().to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ResourceRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_resource())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(items)
    }
}
