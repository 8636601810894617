//! A list page: in-memory records, a search box, and one form modal.
//!
//! Records live only as long as the page. `reset` restores the mock seed,
//! the equivalent of a full reload.

use chrono::NaiveDate;

use opsdesk_core::{DomainError, DomainResult, Entity, FormContext, FormSchema, Modal, Record, RecordId};

#[derive(Debug, Clone)]
pub struct RecordPage<F: FormSchema>
where
    F::Record: Record,
{
    records: Vec<F::Record>,
    seed: Vec<F::Record>,
    modal: Modal<F>,
    search: String,
}

impl<F: FormSchema> RecordPage<F>
where
    F::Record: Record,
{
    pub fn new(seed: Vec<F::Record>) -> Self {
        Self {
            records: seed.clone(),
            seed,
            modal: Modal::new(),
            search: String::new(),
        }
    }

    pub fn records(&self) -> &[F::Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search = query.into();
    }

    /// Records matching the search box, in list order.
    pub fn visible(&self) -> Vec<&F::Record> {
        self.visible_by(|_| true)
    }

    /// Records matching the search box and `keep` (tab/status filters).
    pub fn visible_by<P>(&self, mut keep: P) -> Vec<&F::Record>
    where
        P: FnMut(&F::Record) -> bool,
    {
        self.records
            .iter()
            .filter(|r| r.matches(&self.search) && keep(r))
            .collect()
    }

    pub fn get(&self, id: &RecordId) -> Option<&F::Record> {
        self.records.iter().find(|r| r.id() == id)
    }

    pub fn modal(&self) -> &Modal<F> {
        &self.modal
    }

    pub fn modal_mut(&mut self) -> &mut Modal<F> {
        &mut self.modal
    }

    pub fn open_new(&mut self) {
        self.modal.open_new();
    }

    pub fn open_edit(&mut self, id: &RecordId) -> DomainResult<()> {
        let record = self
            .records
            .iter()
            .find(|r| r.id() == id)
            .ok_or_else(DomainError::not_found)?;
        self.modal.open_edit(*id, record);
        Ok(())
    }

    /// Submit the open modal. A new record is appended; an edited one
    /// replaces the original in place.
    pub fn submit(&mut self, today: NaiveDate) -> DomainResult<RecordId> {
        self.submit_with(&FormContext::new(today))
    }

    pub fn submit_with(&mut self, ctx: &FormContext) -> DomainResult<RecordId> {
        let mut submitted = None;
        self.modal.submit_with(ctx, |record| submitted = Some(record))?;
        let record = submitted.ok_or_else(|| DomainError::invariant("form accepted without a record"))?;
        let id = *record.id();
        self.upsert(record);
        Ok(id)
    }

    fn upsert(&mut self, record: F::Record) {
        match self.records.iter_mut().find(|r| r.id() == record.id()) {
            Some(existing) => {
                tracing::debug!(kind = <F::Record as Record>::KIND, id = %record.id(), "record replaced");
                *existing = record;
            }
            None => {
                tracing::debug!(kind = <F::Record as Record>::KIND, id = %record.id(), "record added");
                self.records.push(record);
            }
        }
    }

    /// Change one record in place (toggles, inline switches) without the modal.
    pub fn update<T, U>(&mut self, id: &RecordId, apply: U) -> Option<T>
    where
        U: FnOnce(&mut F::Record) -> T,
    {
        self.records.iter_mut().find(|r| r.id() == id).map(apply)
    }

    pub fn remove(&mut self, id: &RecordId) -> Option<F::Record> {
        let index = self.records.iter().position(|r| r.id() == id)?;
        Some(self.records.remove(index))
    }

    /// Back to the mock seed: added/edited rows, search and modal state are dropped.
    pub fn reset(&mut self) {
        self.records = self.seed.clone();
        self.modal.close();
        self.search.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opsdesk_core::{FieldErrors, FormState};

    #[derive(Debug, Clone, PartialEq)]
    struct Room {
        id: RecordId,
        name: String,
        floor: String,
    }

    impl Entity for Room {
        type Id = RecordId;

        fn id(&self) -> &Self::Id {
            &self.id
        }
    }

    impl Record for Room {
        const KIND: &'static str = "rooms";

        fn search_fields(&self) -> Vec<&str> {
            vec![self.name.as_str(), self.floor.as_str()]
        }
    }

    struct RoomForm;

    impl FormSchema for RoomForm {
        type Record = Room;
        const TITLE: &'static str = "Add Room";

        fn build(state: &FormState, ctx: &FormContext) -> Result<Room, FieldErrors> {
            let mut errors = FieldErrors::new();
            let name = state.required_text("name", "Name", &mut errors);
            let floor = state.required_text("floor", "Floor", &mut errors);
            let (Some(name), Some(floor)) = (name, floor) else {
                return Err(errors);
            };
            Ok(Room {
                id: ctx.record_id,
                name,
                floor,
            })
        }

        fn fill(room: &Room) -> FormState {
            FormState::new()
                .with("name", room.name.clone())
                .with("floor", room.floor.clone())
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn room(n: u128, name: &str, floor: &str) -> Room {
        Room {
            id: RecordId::from_u128(n),
            name: name.to_string(),
            floor: floor.to_string(),
        }
    }

    fn page() -> RecordPage<RoomForm> {
        RecordPage::new(vec![room(1, "Atlas", "1st"), room(2, "Borealis", "2nd")])
    }

    #[test]
    fn submit_appends_new_record() {
        let mut page = page();
        page.open_new();
        page.modal_mut().set("name", "Cygnus");
        page.modal_mut().set("floor", "3rd");

        let id = page
            .submit_with(&FormContext::with_id(today(), RecordId::from_u128(3)))
            .unwrap();

        assert_eq!(id, RecordId::from_u128(3));
        assert_eq!(page.len(), 3);
        assert_eq!(page.records()[2].name, "Cygnus");
        assert!(!page.modal().is_open());
    }

    #[test]
    fn edit_replaces_in_place() {
        let mut page = page();
        let id = RecordId::from_u128(1);
        page.open_edit(&id).unwrap();
        assert_eq!(page.modal().state().get("name"), Some("Atlas"));

        page.modal_mut().set("name", "Atlas West");
        page.submit(today()).unwrap();

        assert_eq!(page.len(), 2);
        assert_eq!(page.records()[0].name, "Atlas West");
        assert_eq!(page.records()[0].id, id);
    }

    #[test]
    fn invalid_submit_keeps_list_and_modal() {
        let mut page = page();
        page.open_new();
        page.modal_mut().set("name", "Cygnus");

        let err = page.submit(today()).unwrap_err();

        assert_eq!(err.field_errors().and_then(|e| e.get("floor")), Some("Floor is required"));
        assert_eq!(page.len(), 2);
        assert!(page.modal().is_open());
    }

    #[test]
    fn submit_without_open_modal_is_rejected() {
        let mut page = page();
        assert!(matches!(page.submit(today()), Err(DomainError::Conflict(_))));
    }

    #[test]
    fn open_edit_unknown_id_is_not_found() {
        let mut page = page();
        assert!(matches!(
            page.open_edit(&RecordId::from_u128(99)),
            Err(DomainError::NotFound)
        ));
    }

    #[test]
    fn search_and_predicate_filter_together() {
        let mut page = page();
        page.set_search("BOR");
        assert_eq!(page.visible().len(), 1);

        page.set_search("");
        let first_floor = page.visible_by(|r| r.floor == "1st");
        assert_eq!(first_floor.len(), 1);
        assert_eq!(first_floor[0].name, "Atlas");
    }

    #[test]
    fn remove_and_reset() {
        let mut page = page();
        let removed = page.remove(&RecordId::from_u128(2)).unwrap();
        assert_eq!(removed.name, "Borealis");
        assert!(page.remove(&RecordId::from_u128(2)).is_none());

        page.set_search("atlas");
        page.open_new();
        page.reset();

        assert_eq!(page.len(), 2);
        assert_eq!(page.search(), "");
        assert!(!page.modal().is_open());
        assert!(page.get(&RecordId::from_u128(2)).is_some());
    }
}
