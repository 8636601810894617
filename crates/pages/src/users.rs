//! User management page.

use chrono::{TimeZone, Utc};
use serde::Serialize;

use opsdesk_auth::{Permission, Role, Session, UserForm, UserRecord, UserStatus, authorize_session};
use opsdesk_core::{DomainError, DomainResult, RecordId};

use crate::RecordPage;
use crate::mock::id;

pub type UsersPage = RecordPage<UserForm>;

pub fn mock_users() -> Vec<UserRecord> {
    let user = |n, name: &str, email: &str, role, status, department: &str| UserRecord {
        id: id(11, n),
        name: name.to_string(),
        email: email.to_string(),
        role,
        status,
        department: Some(department.to_string()),
        last_login: None,
    };

    vec![
        UserRecord {
            last_login: Utc.with_ymd_and_hms(2024, 5, 31, 8, 15, 0).single(),
            ..user(1, "Sarah Chen", "sarah.chen@example.com", Role::Admin, UserStatus::Active, "Operations")
        },
        UserRecord {
            last_login: Utc.with_ymd_and_hms(2024, 5, 30, 16, 42, 0).single(),
            ..user(2, "Marcus Lee", "marcus.lee@example.com", Role::Manager, UserStatus::Active, "Finance")
        },
        user(3, "Priya Patel", "priya.patel@example.com", Role::Viewer, UserStatus::Invited, "Marketing"),
        user(4, "Tom Becker", "tom.becker@example.com", Role::Viewer, UserStatus::Suspended, "Sales"),
        UserRecord {
            last_login: Utc.with_ymd_and_hms(2024, 5, 28, 11, 5, 0).single(),
            ..user(5, "Amara Okafor", "amara.okafor@example.com", Role::Manager, UserStatus::Active, "Engineering")
        },
    ]
}

pub fn users_page() -> UsersPage {
    RecordPage::new(mock_users())
}

/// Open the invite modal, if the session may manage users.
pub fn open_invite(page: &mut UsersPage, session: Option<&Session>) -> DomainResult<()> {
    authorize_session(session, Permission::UsersManage).map_err(|err| {
        tracing::warn!(error = %err, "user management denied");
        DomainError::Unauthorized
    })?;
    page.open_new();
    Ok(())
}

/// Suspend or reactivate a user. Returns the new status.
pub fn set_status(page: &mut UsersPage, id: &RecordId, status: UserStatus) -> Option<UserStatus> {
    page.update(id, |user| {
        user.status = status;
        user.status
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserSummary {
    pub total: usize,
    pub active: usize,
    pub invited: usize,
    pub suspended: usize,
    pub admins: usize,
}

impl UserSummary {
    pub fn of(users: &[UserRecord]) -> Self {
        let count = |status| users.iter().filter(|u| u.status == status).count();
        Self {
            total: users.len(),
            active: count(UserStatus::Active),
            invited: count(UserStatus::Invited),
            suspended: count(UserStatus::Suspended),
            admins: users.iter().filter(|u| u.role == Role::Admin).count(),
        }
    }
}
