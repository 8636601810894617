//! Contracts domain module.
//!
//! Pure domain logic (no IO, no storage).

pub mod contract;

pub use contract::{Contract, ContractForm, ContractStatus, ContractType};
