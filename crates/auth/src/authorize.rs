use thiserror::Error;

use crate::{Permission, Role, Session};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("not signed in")]
    NotSignedIn,

    #[error("forbidden: role '{role}' is missing permission '{permission}'")]
    Forbidden { role: Role, permission: Permission },
}

/// Check that `role` carries `required`.
///
/// - No IO
/// - No panics
/// - No business logic (pure policy check)
pub fn authorize(role: Role, required: Permission) -> Result<(), AuthzError> {
    if role.grants(required) {
        Ok(())
    } else {
        Err(AuthzError::Forbidden {
            role,
            permission: required,
        })
    }
}

/// `authorize` for an optional session (pages rendered before sign-in).
pub fn authorize_session(session: Option<&Session>, required: Permission) -> Result<(), AuthzError> {
    let session = session.ok_or(AuthzError::NotSignedIn)?;
    authorize(session.role, required)
}
