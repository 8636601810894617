//! Application wiring: config, clients and pages.

pub mod app;
