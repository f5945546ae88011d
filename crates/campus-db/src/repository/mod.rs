//! SurrealDB repository implementations.

mod enrollment;
mod principal;
mod resource;
mod tenant;

pub use enrollment::SurrealEnrollmentRepository;
pub use principal::{SurrealPrincipalRepository, hash_password};
pub use resource::SurrealResourceRepository;
pub use tenant::SurrealTenantRepository;

use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

fn parse_uuid(value: &str, what: &str) -> Result<Uuid, DbError> {
    Uuid::parse_str(value).map_err(|e| DbError::Decode(format!("invalid {what} UUID: {e}")))
}

fn parse_optional_uuid(value: Option<String>, what: &str) -> Result<Option<Uuid>, DbError> {
    value.map(|v| parse_uuid(&v, what)).transpose()
}
