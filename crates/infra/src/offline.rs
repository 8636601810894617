//! Connectivity state for the document database client.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectivityState {
    /// Network enabled; calls reach the hosted service.
    #[default]
    Online,
    /// Network disabled; only the local cache is reachable.
    Offline,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OfflineError {
    #[error("client is offline; operation requires network connection")]
    Offline,
    #[error("client is offline and the local cache is disabled")]
    CacheDisabled,
}

/// Offline mode configuration and state.
#[derive(Debug, Clone)]
pub struct OfflineMode {
    state: ConnectivityState,
    cache_enabled: bool,
}

impl Default for OfflineMode {
    fn default() -> Self {
        Self::new(true)
    }
}

impl OfflineMode {
    pub fn new(cache_enabled: bool) -> Self {
        Self {
            state: ConnectivityState::Online,
            cache_enabled,
        }
    }

    pub fn state(&self) -> ConnectivityState {
        self.state
    }

    pub fn cache_enabled(&self) -> bool {
        self.cache_enabled
    }

    pub fn set_offline(&mut self) {
        self.state = ConnectivityState::Offline;
    }

    pub fn set_online(&mut self) {
        self.state = ConnectivityState::Online;
    }

    pub fn is_offline(&self) -> bool {
        self.state == ConnectivityState::Offline
    }

    /// Ensure the client is online; return error if offline.
    pub fn require_online(&self) -> Result<(), OfflineError> {
        if self.is_offline() {
            Err(OfflineError::Offline)
        } else {
            Ok(())
        }
    }

    /// Ensure the call can be served, from the network or the local cache.
    pub fn require_reachable(&self) -> Result<(), OfflineError> {
        if self.is_offline() && !self.cache_enabled {
            Err(OfflineError::CacheDisabled)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_online() {
        let mode = OfflineMode::default();
        assert_eq!(mode.state(), ConnectivityState::Online);
        assert!(mode.require_online().is_ok());
    }

    #[test]
    fn offline_with_cache_is_still_reachable() {
        let mut mode = OfflineMode::new(true);
        mode.set_offline();

        assert_eq!(mode.require_online(), Err(OfflineError::Offline));
        assert!(mode.require_reachable().is_ok());

        mode.set_online();
        assert!(!mode.is_offline());
    }

    #[test]
    fn offline_without_cache_is_unreachable() {
        let mut mode = OfflineMode::new(false);
        mode.set_offline();
        assert_eq!(mode.require_reachable(), Err(OfflineError::CacheDisabled));
    }
}
