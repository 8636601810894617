//! Marketing domain module: campaigns, spend and conversion metrics.

pub mod campaign;

pub use campaign::{Campaign, CampaignForm, CampaignPhase, Channel};
