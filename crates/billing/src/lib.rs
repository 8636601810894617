//! Billing domain module: invoices and their payment status.
//!
//! Pure domain logic (no IO, no storage).

pub mod invoice;

pub use invoice::{DisplayStatus, Invoice, InvoiceForm, InvoiceStatus};
