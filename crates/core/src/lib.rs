//! `opsdesk-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no client or storage concerns):
//! identifiers, errors, money, the form/modal engine and the derived values
//! (depreciation, utilization, expiry, stock level) every page displays.

pub mod calc;
pub mod entity;
pub mod error;
pub mod form;
pub mod id;
pub mod text_enum;
pub mod value_object;

pub use calc::{ExpiryStatus, StockLevel, UsageHealth};
pub use entity::{Entity, Record};
pub use error::{DomainError, DomainResult, FieldErrors};
pub use form::{FormContext, FormSchema, FormState, Modal};
pub use id::{RecordId, UserId};
pub use value_object::{Money, ValueObject};
