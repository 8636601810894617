//! Form state + modal lifecycle.
//!
//! Every create/edit modal in the ERP follows the same shape:
//! - hold a flat key/value state while the user types,
//! - run presence and range checks on submit,
//! - hand the assembled record to the parent callback,
//! - clear local state and close.
//!
//! `FormSchema` captures the per-record part (which fields, which checks);
//! `Modal` owns the lifecycle so no form re-implements it.

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::NaiveDate;

use crate::error::{DomainError, DomainResult, FieldErrors};
use crate::id::RecordId;
use crate::value_object::Money;

/// Date format used by every date input.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Flat `field -> raw input` map, exactly what the inputs hold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    fields: BTreeMap<String, String>,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter, handy for pre-filling and tests.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.fields.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Trimmed value, `None` when missing or blank.
    fn present(&self, field: &str) -> Option<&str> {
        self.get(field).map(str::trim).filter(|v| !v.is_empty())
    }

    pub fn required_text(&self, field: &str, label: &str, errors: &mut FieldErrors) -> Option<String> {
        match self.present(field) {
            Some(v) => Some(v.to_string()),
            None => {
                errors.insert(field, format!("{label} is required"));
                None
            }
        }
    }

    pub fn optional_text(&self, field: &str) -> Option<String> {
        self.present(field).map(str::to_string)
    }

    pub fn money(&self, field: &str, label: &str, errors: &mut FieldErrors) -> Option<Money> {
        let raw = self.required_raw(field, label, errors)?;
        match Money::parse(raw) {
            Ok(m) => Some(m),
            Err(_) => {
                errors.insert(field, format!("{label} must be a valid amount"));
                None
            }
        }
    }

    /// Required amount strictly greater than zero.
    pub fn positive_money(&self, field: &str, label: &str, errors: &mut FieldErrors) -> Option<Money> {
        let m = self.money(field, label, errors)?;
        if !m.is_positive() {
            errors.insert(field, format!("{label} must be greater than 0"));
            return None;
        }
        Some(m)
    }

    /// Amount that may be left blank (read as zero) but never negative.
    pub fn non_negative_money(&self, field: &str, label: &str, errors: &mut FieldErrors) -> Option<Money> {
        if self.present(field).is_none() {
            return Some(Money::ZERO);
        }
        let m = self.money(field, label, errors)?;
        if m.is_negative() {
            errors.insert(field, format!("{label} cannot be negative"));
            return None;
        }
        Some(m)
    }

    pub fn date(&self, field: &str, label: &str, errors: &mut FieldErrors) -> Option<NaiveDate> {
        let raw = self.required_raw(field, label, errors)?;
        parse_date(raw, field, label, errors)
    }

    pub fn optional_date(&self, field: &str, label: &str, errors: &mut FieldErrors) -> Option<Option<NaiveDate>> {
        match self.present(field) {
            None => Some(None),
            Some(raw) => parse_date(raw, field, label, errors).map(Some),
        }
    }

    /// Percentage between 0 and 100 inclusive.
    pub fn percent(&self, field: &str, label: &str, errors: &mut FieldErrors) -> Option<f64> {
        let raw = self.required_raw(field, label, errors)?;
        match raw.trim_end_matches('%').trim().parse::<f64>() {
            Ok(v) if v.is_finite() && (0.0..=100.0).contains(&v) => Some(v),
            Ok(_) => {
                errors.insert(field, format!("{label} must be between 0 and 100"));
                None
            }
            Err(_) => {
                errors.insert(field, format!("{label} must be a number"));
                None
            }
        }
    }

    /// Whole, non-negative count. Blank reads as `default` when one is given.
    pub fn count(&self, field: &str, label: &str, default: Option<u32>, errors: &mut FieldErrors) -> Option<u32> {
        let raw = match (self.present(field), default) {
            (Some(raw), _) => raw,
            (None, Some(d)) => return Some(d),
            (None, None) => {
                errors.insert(field, format!("{label} is required"));
                return None;
            }
        };
        match raw.parse::<u32>() {
            Ok(v) => Some(v),
            Err(_) => {
                errors.insert(field, format!("{label} must be a whole number of 0 or more"));
                None
            }
        }
    }

    /// Value from a select input; blank reads as `default` when one is given.
    pub fn choice<T: FromStr>(&self, field: &str, label: &str, default: Option<T>, errors: &mut FieldErrors) -> Option<T> {
        let raw = match (self.present(field), default) {
            (Some(raw), _) => raw,
            (None, Some(d)) => return Some(d),
            (None, None) => {
                errors.insert(field, format!("{label} is required"));
                return None;
            }
        };
        match raw.parse::<T>() {
            Ok(v) => Some(v),
            Err(_) => {
                errors.insert(field, format!("{label} '{raw}' is not a valid option"));
                None
            }
        }
    }

    /// Checkbox value; anything other than a truthy token reads as unchecked.
    pub fn flag(&self, field: &str) -> bool {
        matches!(
            self.present(field).map(str::to_ascii_lowercase).as_deref(),
            Some("true" | "on" | "1" | "yes")
        )
    }

    fn required_raw(&self, field: &str, label: &str, errors: &mut FieldErrors) -> Option<&str> {
        let raw = self.present(field);
        if raw.is_none() {
            errors.insert(field, format!("{label} is required"));
        }
        raw
    }
}

fn parse_date(raw: &str, field: &str, label: &str, errors: &mut FieldErrors) -> Option<NaiveDate> {
    match NaiveDate::parse_from_str(raw, DATE_FORMAT) {
        Ok(d) => Some(d),
        Err(_) => {
            errors.insert(field, format!("{label} must be a date (YYYY-MM-DD)"));
            None
        }
    }
}

/// Render a date the way date inputs expect it.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Record `"<end label> must be after <start label>"` unless `end > start`.
pub fn ensure_after(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    end_field: &str,
    message: &str,
    errors: &mut FieldErrors,
) {
    if let (Some(start), Some(end)) = (start, end) {
        if end <= start {
            errors.insert(end_field, message);
        }
    }
}

/// Clock + identity injected into `FormSchema::build`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FormContext {
    pub today: NaiveDate,
    pub record_id: RecordId,
}

impl FormContext {
    /// Context for a brand-new record.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            record_id: RecordId::new(),
        }
    }

    pub fn with_id(today: NaiveDate, record_id: RecordId) -> Self {
        Self { today, record_id }
    }
}

/// Per-record form definition.
pub trait FormSchema {
    type Record: Clone + core::fmt::Debug;

    /// Title shown on the modal header.
    const TITLE: &'static str;

    /// Validate the raw state and assemble the record.
    ///
    /// Must report every rejected field, not just the first.
    fn build(state: &FormState, ctx: &FormContext) -> Result<Self::Record, FieldErrors>;

    /// Raw state that would rebuild `record` (pre-fill for edit).
    fn fill(record: &Self::Record) -> FormState;
}

/// A form shown as a full-screen overlay collecting one record.
#[derive(Debug, Clone)]
pub struct Modal<F: FormSchema> {
    open: bool,
    editing: Option<RecordId>,
    state: FormState,
    errors: FieldErrors,
    _form: core::marker::PhantomData<F>,
}

impl<F: FormSchema> Default for Modal<F> {
    fn default() -> Self {
        Self {
            open: false,
            editing: None,
            state: FormState::new(),
            errors: FieldErrors::new(),
            _form: core::marker::PhantomData,
        }
    }
}

impl<F: FormSchema> Modal<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(&self) -> &'static str {
        F::TITLE
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    pub fn editing(&self) -> Option<RecordId> {
        self.editing
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Open with a blank form.
    pub fn open_new(&mut self) {
        self.reset();
        self.open = true;
    }

    /// Open pre-filled from an existing record.
    pub fn open_edit(&mut self, id: RecordId, record: &F::Record) {
        self.reset();
        self.state = F::fill(record);
        self.editing = Some(id);
        self.open = true;
    }

    pub fn close(&mut self) {
        self.reset();
    }

    /// Update one input. Typing into a field clears its inline error.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<String>) {
        let field = field.into();
        self.errors.remove(&field);
        self.state.set(field, value);
    }

    /// Validate and, on success, hand the record to `on_submit` and close.
    ///
    /// On failure the state is kept so the user can correct it, the inline
    /// errors are updated, and `on_submit` is not called.
    pub fn submit<C>(&mut self, today: NaiveDate, on_submit: C) -> DomainResult<()>
    where
        C: FnOnce(F::Record),
    {
        let ctx = match self.editing {
            Some(id) => FormContext::with_id(today, id),
            None => FormContext::new(today),
        };
        self.submit_with(&ctx, on_submit)
    }

    /// `submit` with an explicit context (deterministic ids in tests/seeding).
    ///
    /// When editing, the edited record's id wins over `ctx.record_id`.
    pub fn submit_with<C>(&mut self, ctx: &FormContext, on_submit: C) -> DomainResult<()>
    where
        C: FnOnce(F::Record),
    {
        if !self.open {
            return Err(DomainError::conflict(format!("{} is not open", F::TITLE)));
        }

        let ctx = FormContext {
            today: ctx.today,
            record_id: self.editing.unwrap_or(ctx.record_id),
        };

        match F::build(&self.state, &ctx) {
            Ok(record) => {
                tracing::debug!(form = F::TITLE, record_id = %ctx.record_id, "form submitted");
                on_submit(record);
                self.reset();
                Ok(())
            }
            Err(errors) => {
                tracing::debug!(form = F::TITLE, rejected = errors.len(), "form rejected");
                self.errors = errors.clone();
                Err(DomainError::Form(errors))
            }
        }
    }

    fn reset(&mut self) {
        self.open = false;
        self.editing = None;
        self.state.clear();
        self.errors.clear();
    }
}
