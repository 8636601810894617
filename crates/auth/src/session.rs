use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use opsdesk_core::UserId;

use crate::{Permission, Role};

/// The signed-in user, as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: UserId,
    pub email: String,
    pub display_name: Option<String>,
    pub role: Role,
    pub signed_in_at: DateTime<Utc>,
}

impl Session {
    pub fn can(&self, permission: Permission) -> bool {
        self.role.grants(permission)
    }

    /// Name for the header avatar: display name, else the email's local part.
    pub fn greeting_name(&self) -> &str {
        match &self.display_name {
            Some(name) => name,
            None => self.email.split('@').next().unwrap_or(&self.email),
        }
    }
}
