//! Settings: tax rates, currencies and third-party integrations.

pub mod currency;
pub mod integration;
pub mod tax;

pub use currency::{Currency, CurrencyForm};
pub use integration::{Integration, IntegrationForm};
pub use tax::{TaxRate, TaxRateForm, TaxType};
