//! Asset management domain: hardware assets, software licenses, VPS servers
//! and stock items.
//!
//! Each record comes with the form that creates it. Everything here is pure
//! domain logic (no IO, no storage).

pub mod asset;
pub mod license;
pub mod server;
pub mod stock;

pub use asset::{Asset, AssetForm, AssetStatus, AssetType};
pub use license::{License, LicenseForm};
pub use server::{ServerForm, VpsServer};
pub use stock::{StockItem, StockItemForm};
