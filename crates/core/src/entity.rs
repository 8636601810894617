//! Entity trait: identity + continuity across edits.

use crate::id::RecordId;

/// Entity marker + minimal interface.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}

/// A flat record that a form creates and a page lists.
///
/// `KIND` doubles as the document collection name when the record is persisted.
pub trait Record: Entity<Id = RecordId> + Clone + core::fmt::Debug {
    const KIND: &'static str;

    /// Text fields a page search box matches against.
    fn search_fields(&self) -> Vec<&str>;

    /// Case-insensitive substring match over `search_fields`.
    ///
    /// A blank query matches every record.
    fn matches(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}
