//! Class enrollment relation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A student's membership in a class. `(tenant_id, class_id, student_id)`
/// is unique.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enrollment {
    pub tenant_id: Uuid,
    pub class_id: Uuid,
    pub student_id: Uuid,
    pub created_at: DateTime<Utc>,
}
