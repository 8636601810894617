//! User records for the user-management page.
//!
//! Invariants:
//! - emails are stored lower-cased and trimmed;
//! - new users start as `invited` unless the form says otherwise;
//! - suspended users keep their role but are granted nothing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use opsdesk_core::{Entity, FieldErrors, FormContext, FormSchema, FormState, Record, RecordId};

use crate::{Permission, Role};

opsdesk_core::text_enum! {
    /// User account status.
    pub enum UserStatus {
        Active => "active",
        Invited => "invited",
        Suspended => "suspended",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: RecordId,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub status: UserStatus,
    pub department: Option<String>,
    pub last_login: Option<DateTime<Utc>>,
}

impl UserRecord {
    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }

    pub fn can(&self, permission: Permission) -> bool {
        self.status != UserStatus::Suspended && self.role.grants(permission)
    }

    /// Up to two initials for the avatar bubble.
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .take(2)
            .flat_map(char::to_uppercase)
            .collect()
    }
}

impl Entity for UserRecord {
    type Id = RecordId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Record for UserRecord {
    const KIND: &'static str = "users";

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str(), self.email.as_str(), self.role.as_str()];
        fields.extend(self.department.as_deref());
        fields
    }
}

/// Loose shape check: one `@`, non-empty local part, dotted domain with no empty labels.
pub fn is_plausible_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.contains(char::is_whitespace)
        && domain.contains('.')
        && domain.split('.').all(|label| !label.is_empty())
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UserForm;

impl FormSchema for UserForm {
    type Record = UserRecord;
    const TITLE: &'static str = "Invite User";

    fn build(state: &FormState, ctx: &FormContext) -> Result<UserRecord, FieldErrors> {
        let mut errors = FieldErrors::new();

        let name = state.required_text("name", "Full name", &mut errors);
        let email = state
            .required_text("email", "Email", &mut errors)
            .map(|e| e.to_lowercase())
            .and_then(|email| {
                if is_plausible_email(&email) {
                    Some(email)
                } else {
                    errors.insert("email", "Enter a valid email address");
                    None
                }
            });
        let role = state.choice("role", "Role", Some(Role::Viewer), &mut errors);
        let status = state.choice("status", "Status", Some(UserStatus::Invited), &mut errors);

        let (Some(name), Some(email), Some(role), Some(status)) = (name, email, role, status) else {
            return Err(errors);
        };

        errors.into_result(UserRecord {
            id: ctx.record_id,
            name,
            email,
            role,
            status,
            department: state.optional_text("department"),
            last_login: None,
        })
    }

    fn fill(user: &UserRecord) -> FormState {
        let mut state = FormState::new()
            .with("name", user.name.clone())
            .with("email", user.email.clone())
            .with("role", user.role.as_str())
            .with("status", user.status.as_str());
        if let Some(department) = &user.department {
            state.set("department", department.clone());
        }
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ctx() -> FormContext {
        FormContext::with_id(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(), RecordId::from_u128(61))
    }

    fn state() -> FormState {
        FormState::new()
            .with("name", "amara okafor")
            .with("email", "  Amara.Okafor@Example.com ")
    }

    #[test]
    fn new_user_defaults_to_invited_viewer() {
        let user = UserForm::build(&state(), &ctx()).unwrap();

        assert_eq!(user.email, "amara.okafor@example.com");
        assert_eq!(user.role, Role::Viewer);
        assert_eq!(user.status, UserStatus::Invited);
        assert_eq!(user.initials(), "AO");
        assert!(!user.is_active());
    }

    #[test]
    fn rejects_implausible_emails() {
        for bad in ["amara", "amara@", "@example.com", "a@b", "a@@b.com", "a b@c.com", "a@b.", "a@b..c", "a@.b.c"] {
            let errors = UserForm::build(&state().with("email", bad), &ctx()).unwrap_err();
            assert_eq!(errors.get("email"), Some("Enter a valid email address"), "input {bad}");
        }
    }

    #[test]
    fn accepts_subdomains() {
        assert!(is_plausible_email("ops@mail.eu.example.com"));
    }

    #[test]
    fn suspended_users_are_granted_nothing() {
        let mut user = UserForm::build(&state().with("role", "admin").with("status", "active"), &ctx()).unwrap();
        assert!(user.can(Permission::UsersManage));

        user.status = UserStatus::Suspended;
        assert!(!user.can(Permission::RecordsRead));
    }

    #[test]
    fn unknown_role_is_reported() {
        let errors = UserForm::build(&state().with("role", "owner"), &ctx()).unwrap_err();
        assert_eq!(errors.get("role"), Some("Role 'owner' is not a valid option"));
    }
}
