//! SurrealDB implementation of [`EnrollmentRepository`].

use campus_core::error::CampusResult;
use campus_core::models::enrollment::Enrollment;
use campus_core::repository::EnrollmentRepository;
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use super::{CountRow, parse_uuid};
use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct EnrollmentRow {
    tenant_id: String,
    class_id: String,
    student_id: String,
    created_at: DateTime<Utc>,
}

impl EnrollmentRow {
    fn try_into_enrollment(self) -> Result<Enrollment, DbError> {
        Ok(Enrollment {
            tenant_id: parse_uuid(&self.tenant_id, "tenant")?,
            class_id: parse_uuid(&self.class_id, "class")?,
            student_id: parse_uuid(&self.student_id, "student")?,
            created_at: self.created_at,
        })
    }
}

/// SurrealDB implementation of the Enrollment repository.
#[derive(Clone)]
pub struct SurrealEnrollmentRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealEnrollmentRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> EnrollmentRepository for SurrealEnrollmentRepository<C> {
    async fn enroll(
        &self,
        tenant_id: Uuid,
        class_id: Uuid,
        student_id: Uuid,
    ) -> CampusResult<Enrollment> {
        let result = self
            .db
            .query(
                "CREATE enrollment SET \
                 tenant_id = $tenant_id, \
                 class_id = $class_id, \
                 student_id = $student_id",
            )
            .bind(("tenant_id", tenant_id.to_string()))
            .bind(("class_id", class_id.to_string()))
            .bind(("student_id", student_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::from_statement("enrollment", e))?;

        let rows: Vec<EnrollmentRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "enrollment".into(),
            id: format!("class={class_id},student={student_id}"),
        })?;

        Ok(row.try_into_enrollment()?)
    }

    async fn unenroll(&self, tenant_id: Uuid, class_id: Uuid, student_id: Uuid) -> CampusResult<()> {
        self.db
            .query(
                "DELETE enrollment WHERE tenant_id = $tenant_id \
                 AND class_id = $class_id AND student_id = $student_id",
            )
            .bind(("tenant_id", tenant_id.to_string()))
            .bind(("class_id", class_id.to_string()))
            .bind(("student_id", student_id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn is_enrolled(
        &self,
        tenant_id: Uuid,
        class_id: Uuid,
        student_id: Uuid,
    ) -> CampusResult<bool> {
        let mut result = self
            .db
            .query(
                "SELECT count() AS total FROM enrollment \
                 WHERE tenant_id = $tenant_id AND class_id = $class_id \
                 AND student_id = $student_id GROUP ALL",
            )
            .bind(("tenant_id", tenant_id.to_string()))
            .bind(("class_id", class_id.to_string()))
            .bind(("student_id", student_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.first().is_some_and(|r| r.total > 0))
    }

    async fn list_for_class(&self, tenant_id: Uuid, class_id: Uuid) -> CampusResult<Vec<Enrollment>> {
        let mut result = self
            .db
            .query(
                "SELECT * FROM enrollment \
                 WHERE tenant_id = $tenant_id AND class_id = $class_id \
                 ORDER BY created_at ASC",
            )
            .bind(("tenant_id", tenant_id.to_string()))
            .bind(("class_id", class_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<EnrollmentRow> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(EnrollmentRow::try_into_enrollment)
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(items)
    }
}
