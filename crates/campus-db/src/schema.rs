//! Campus schema and its migration runner.
//!
//! All table definitions use SCHEMAFULL mode. UUIDs are stored as
//! strings, enums as strings with ASSERT constraints, and usage limits
//! as integers where `-1` means unlimited.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

/// Versioned DDL step. Applied once, in ascending `version` order.
struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "tenants_principals_resources",
    sql: SCHEMA_V1,
}];

/// Bookkeeping table recording which versions are applied.
const LEDGER_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS schema_version SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE schema_version TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE schema_version TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE schema_version TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_schema_version ON TABLE schema_version \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct AppliedVersion {
    version: u32,
}

const SCHEMA_V1: &str = "\
-- tenant: global; code and subdomain are lookup keys
DEFINE TABLE tenant SCHEMAFULL;
DEFINE FIELD name ON TABLE tenant TYPE string;
DEFINE FIELD code ON TABLE tenant TYPE string;
DEFINE FIELD subdomain ON TABLE tenant TYPE string;
DEFINE FIELD subscription_tier ON TABLE tenant TYPE string \
    ASSERT $value IN ['BASIC', 'PRO', 'ENTERPRISE'];
DEFINE FIELD student_limit ON TABLE tenant TYPE int;
DEFINE FIELD class_limit ON TABLE tenant TYPE int;
DEFINE FIELD created_at ON TABLE tenant TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE tenant TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_tenant_code ON TABLE tenant COLUMNS code UNIQUE;
DEFINE INDEX idx_tenant_subdomain ON TABLE tenant \
    COLUMNS subdomain UNIQUE;

-- principal: email unique per tenant only
DEFINE TABLE principal SCHEMAFULL;
DEFINE FIELD tenant_id ON TABLE principal TYPE string;
DEFINE FIELD email ON TABLE principal TYPE string;
DEFINE FIELD name ON TABLE principal TYPE string;
DEFINE FIELD role ON TABLE principal TYPE string \
    ASSERT $value IN ['OWNER', 'ADMIN', 'TEACHER', 'STUDENT', 'PARENT'];
DEFINE FIELD password_hash ON TABLE principal TYPE string;
DEFINE FIELD created_at ON TABLE principal TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE principal TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_principal_tenant_email ON TABLE principal \
    COLUMNS tenant_id, email UNIQUE;
DEFINE INDEX idx_principal_tenant_role ON TABLE principal \
    COLUMNS tenant_id, role;

-- resource
DEFINE TABLE resource SCHEMAFULL;
DEFINE FIELD tenant_id ON TABLE resource TYPE string;
DEFINE FIELD kind ON TABLE resource TYPE string \
    ASSERT $value IN ['class', 'homework', 'announcement', \
    'notification', 'message', 'attendance', 'subscription'];
DEFINE FIELD name ON TABLE resource TYPE string;
DEFINE FIELD owner_id ON TABLE resource TYPE option<string>;
DEFINE FIELD parent_id ON TABLE resource TYPE option<string>;
DEFINE FIELD created_at ON TABLE resource TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE resource TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_resource_tenant_kind ON TABLE resource \
    COLUMNS tenant_id, kind;
DEFINE INDEX idx_resource_tenant_owner ON TABLE resource \
    COLUMNS tenant_id, owner_id;

-- enrollment
DEFINE TABLE enrollment SCHEMAFULL;
DEFINE FIELD tenant_id ON TABLE enrollment TYPE string;
DEFINE FIELD class_id ON TABLE enrollment TYPE string;
DEFINE FIELD student_id ON TABLE enrollment TYPE string;
DEFINE FIELD created_at ON TABLE enrollment TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_enrollment_member ON TABLE enrollment \
    COLUMNS tenant_id, class_id, student_id UNIQUE;
";

/// Bring the schema up to date.
///
/// Safe to call on every start: versions already recorded in
/// `schema_version` are skipped.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    db.query(LEDGER_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(format!("schema_version table: {e}")))?;

    let applied = latest_version(db).await?;
    for migration in MIGRATIONS.iter().filter(|m| m.version > applied) {
        apply(db, migration).await?;
    }
    Ok(())
}

async fn latest_version<C: Connection>(db: &Surreal<C>) -> Result<u32, DbError> {
    let mut response = db
        .query("SELECT version FROM schema_version ORDER BY version DESC LIMIT 1")
        .await?;
    let rows: Vec<AppliedVersion> = response.take(0)?;
    Ok(rows.into_iter().next().map_or(0, |row| row.version))
}

async fn apply<C: Connection>(db: &Surreal<C>, migration: &Migration) -> Result<(), DbError> {
    let failed = |stage: &str, e: surrealdb::Error| {
        DbError::Migration(format!(
            "v{} ({}) {stage}: {e}",
            migration.version, migration.name
        ))
    };

    db.query(migration.sql)
        .await?
        .check()
        .map_err(|e| failed("apply", e))?;
    db.query("CREATE schema_version SET version = $version, name = $name")
        .bind(("version", migration.version))
        .bind(("name", migration.name))
        .await?
        .check()
        .map_err(|e| failed("record", e))?;

    info!(
        version = migration.version,
        name = migration.name,
        "Schema migration applied"
    );
    Ok(())
}

/// DDL of the first schema version.
pub fn schema_v1() -> &'static str {
    SCHEMA_V1
}
