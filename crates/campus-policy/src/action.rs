//! Actions a request handler can ask the guard about, and the rule each
//! one is governed by.
//!
//! The action → rule mapping is an exhaustive `match`: adding an action
//! without deciding its rule does not compile. Action names arriving as
//! strings are parsed with [`Action::parse`], which reports unregistered
//! names as [`PolicyError::UnknownAction`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::error;

use crate::error::PolicyError;

/// Rule family an action is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    /// Any principal of the owning tenant.
    TenantMember,
    /// Owner/admin, or a teacher who owns the target.
    Manage,
    /// Students enrolled in the target class.
    QrScan,
    /// Sender role must be allowed to address the recipient role.
    Messaging,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    ClassCreate,
    ClassUpdate,
    ClassDelete,
    ClassView,
    HomeworkCreate,
    HomeworkUpdate,
    HomeworkGrade,
    HomeworkView,
    AnnouncementCreate,
    AnnouncementView,
    NotificationCreate,
    SubscriptionCreate,
    SubscriptionManage,
    StudentEnroll,
    AttendanceMark,
    QrGenerate,
    QrScan,
    MessageSend,
}

impl Action {
    pub const ALL: [Action; 18] = [
        Self::ClassCreate,
        Self::ClassUpdate,
        Self::ClassDelete,
        Self::ClassView,
        Self::HomeworkCreate,
        Self::HomeworkUpdate,
        Self::HomeworkGrade,
        Self::HomeworkView,
        Self::AnnouncementCreate,
        Self::AnnouncementView,
        Self::NotificationCreate,
        Self::SubscriptionCreate,
        Self::SubscriptionManage,
        Self::StudentEnroll,
        Self::AttendanceMark,
        Self::QrGenerate,
        Self::QrScan,
        Self::MessageSend,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ClassCreate => "class.create",
            Self::ClassUpdate => "class.update",
            Self::ClassDelete => "class.delete",
            Self::ClassView => "class.view",
            Self::HomeworkCreate => "homework.create",
            Self::HomeworkUpdate => "homework.update",
            Self::HomeworkGrade => "homework.grade",
            Self::HomeworkView => "homework.view",
            Self::AnnouncementCreate => "announcement.create",
            Self::AnnouncementView => "announcement.view",
            Self::NotificationCreate => "notification.create",
            Self::SubscriptionCreate => "subscription.create",
            Self::SubscriptionManage => "subscription.manage",
            Self::StudentEnroll => "student.enroll",
            Self::AttendanceMark => "attendance.mark",
            Self::QrGenerate => "qr.generate",
            Self::QrScan => "qr.scan",
            Self::MessageSend => "message.send",
        }
    }

    /// The rule this action is checked against.
    pub fn rule(self) -> Rule {
        match self {
            Self::ClassView | Self::HomeworkView | Self::AnnouncementView => Rule::TenantMember,
            // QR generation follows attendance marking.
            Self::ClassCreate
            | Self::ClassUpdate
            | Self::ClassDelete
            | Self::HomeworkCreate
            | Self::HomeworkUpdate
            | Self::HomeworkGrade
            | Self::AnnouncementCreate
            | Self::NotificationCreate
            | Self::SubscriptionCreate
            | Self::SubscriptionManage
            | Self::StudentEnroll
            | Self::AttendanceMark
            | Self::QrGenerate => Rule::Manage,
            Self::QrScan => Rule::QrScan,
            Self::MessageSend => Rule::Messaging,
        }
    }

    /// Parse an action name supplied by a handler registration.
    ///
    /// An unregistered name is a programming error: it is logged and
    /// returned as [`PolicyError::UnknownAction`], never as a denial.
    pub fn parse(name: &str) -> Result<Self, PolicyError> {
        name.parse().map_err(|()| {
            error!(action = name, "unregistered action reached the guard");
            PolicyError::UnknownAction(name.to_string())
        })
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|action| action.as_str() == value)
            .ok_or(())
    }
}
