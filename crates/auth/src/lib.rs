//! `opsdesk-auth` — roles, permissions and user records.
//!
//! Credential checks live with the hosted identity provider; this crate only
//! models who is signed in and what their role allows. It is intentionally
//! decoupled from the client and from storage.

pub mod authorize;
pub mod permissions;
pub mod roles;
pub mod session;
pub mod user;

pub use authorize::{authorize, authorize_session, AuthzError};
pub use permissions::Permission;
pub use roles::Role;
pub use session::Session;
pub use user::{UserForm, UserRecord, UserStatus};
