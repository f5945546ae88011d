//! Resource domain model.
//!
//! A resource is any tenant-scoped record subject to access control:
//! classes, homework, announcements, messages and so on.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Class,
    Homework,
    Announcement,
    Notification,
    Message,
    Attendance,
    Subscription,
}

impl ResourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Homework => "homework",
            Self::Announcement => "announcement",
            Self::Notification => "notification",
            Self::Message => "message",
            Self::Attendance => "attendance",
            Self::Subscription => "subscription",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "class" => Ok(Self::Class),
            "homework" => Ok(Self::Homework),
            "announcement" => Ok(Self::Announcement),
            "notification" => Ok(Self::Notification),
            "message" => Ok(Self::Message),
            "attendance" => Ok(Self::Attendance),
            "subscription" => Ok(Self::Subscription),
            other => Err(format!("unknown resource kind: {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub kind: ResourceKind,
    pub name: String,
    /// Principal allowed to manage this resource (e.g. a class's teacher).
    /// Homework carries the teacher of its class.
    pub owner_id: Option<Uuid>,
    /// Enclosing resource, e.g. the class a homework belongs to.
    pub parent_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Resource {
    pub fn is_owned_by(&self, principal_id: Uuid) -> bool {
        self.owner_id == Some(principal_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateResource {
    pub tenant_id: Uuid,
    pub kind: ResourceKind,
    pub name: String,
    pub owner_id: Option<Uuid>,
    pub parent_id: Option<Uuid>,
}
