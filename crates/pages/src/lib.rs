//! `opsdesk-pages` — the list pages of the ERP front end.
//!
//! Each page holds its own in-memory records (seeded from mock rows), a
//! search box and the modal form that adds/edits records. Summary cards are
//! computed from whatever the page currently holds.

pub mod assets;
pub mod campaigns;
pub mod contracts;
pub mod dashboard;
pub mod invoices;
pub mod licenses;
mod mock;
pub mod page;
pub mod servers;
pub mod settings;
pub mod stock;
pub mod users;
pub mod workspace;

pub use dashboard::{Alert, Dashboard, DisplayTotals};
pub use page::RecordPage;
pub use workspace::Workspace;
