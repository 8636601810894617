use crate::Permission;

opsdesk_core::text_enum! {
    /// Role assigned to a user on the user-management page.
    pub enum Role {
        Admin => "admin",
        Manager => "manager",
        Viewer => "viewer",
    }
}

impl Role {
    /// Permissions granted by this role.
    pub fn permissions(&self) -> &'static [Permission] {
        match self {
            Role::Admin => Permission::ALL,
            Role::Manager => &[Permission::RecordsRead, Permission::RecordsWrite],
            Role::Viewer => &[Permission::RecordsRead],
        }
    }

    pub fn grants(&self, permission: Permission) -> bool {
        self.permissions().contains(&permission)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_grants_everything() {
        for p in Permission::ALL {
            assert!(Role::Admin.grants(*p));
        }
    }

    #[test]
    fn viewer_is_read_only() {
        assert!(Role::Viewer.grants(Permission::RecordsRead));
        assert!(!Role::Viewer.grants(Permission::RecordsWrite));
        assert!(!Role::Manager.grants(Permission::UsersManage));
    }
}
