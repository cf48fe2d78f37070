//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use arc_swap::ArcSwap;
use common::CipherConfig;

use crate::crypto::{CipherPrimitive, RustCryptoPrimitive};

/// Application state shared across all request handlers.
///
/// All fields are `Arc`-wrapped so that Axum can clone the state for each
/// request without copying anything.
#[derive(Clone)]
pub struct AppState {
    /// Cipher backend serving every request.
    pub primitive: Arc<dyn CipherPrimitive>,
    /// Current default configuration. Readers take a snapshot with
    /// [`ArcSwap::load_full`]; `PUT /config` swaps in a new one, so a request
    /// never observes a half-applied update.
    pub config: Arc<ArcSwap<CipherConfig>>,
}

impl AppState {
    /// Create a new [`AppState`] from a primitive and an initial configuration.
    pub fn new(primitive: Arc<dyn CipherPrimitive>, config: CipherConfig) -> Self {
        Self {
            primitive,
            config: Arc::new(ArcSwap::from_pointee(config)),
        }
    }

    /// The current configuration snapshot.
    pub fn snapshot(&self) -> Arc<CipherConfig> {
        self.config.load_full()
    }
}

impl Default for AppState {
    /// The RustCrypto backend with the default configuration and no key,
    /// suitable for tests.
    fn default() -> Self {
        Self::new(Arc::new(RustCryptoPrimitive::new()), CipherConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::PaddingType;

    #[test]
    fn clones_share_config() {
        let state = AppState::default();
        let clone = state.clone();

        clone.config.rcu(|c| CipherConfig {
            padding: PaddingType::Pkcs7,
            ..CipherConfig::clone(c)
        });

        assert_eq!(state.snapshot().padding, PaddingType::Pkcs7);
    }

    #[test]
    fn snapshot_is_stable_across_swaps() {
        let state = AppState::default();
        let before = state.snapshot();

        state.config.store(Arc::new(CipherConfig {
            mode: "ofb".into(),
            ..CipherConfig::default()
        }));

        assert_eq!(before.mode, "cbc");
        assert_eq!(state.snapshot().mode, "ofb");
    }
}
