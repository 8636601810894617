opsdesk_core::text_enum! {
    /// Permission identifier, e.g. `records.write`.
    pub enum Permission {
        RecordsRead => "records.read",
        RecordsWrite => "records.write",
        UsersManage => "users.manage",
        SettingsManage => "settings.manage",
    }
}
