use std::sync::Arc;

use common::prelude::Backend;

use super::config::Config;
use super::exchange::KeyExchange;

/// Main service state - carries the provider selection and exchange handle
///
/// The backend is chosen exactly once here, before any request is served,
/// and is read-only for the process lifetime. Cloning is cheap; handlers
/// share the same immutable exchange.
#[derive(Clone)]
pub struct State {
    exchange: Arc<KeyExchange>,
    backend: Backend,
}

impl State {
    pub fn from_config(config: &Config) -> Result<Self, StateSetupError> {
        let backend = Backend::select(config.allow_insecure_fallback)
            .map_err(|_| StateSetupError::ProviderUnavailable)?;

        if backend.is_secure() {
            tracing::info!(provider = backend.name(), "KEM provider selected");
        } else {
            tracing::warn!(
                provider = backend.name(),
                "insecure fallback provider active: key exchange provides no cryptographic security"
            );
        }

        Ok(Self {
            exchange: Arc::new(KeyExchange::new(backend)),
            backend,
        })
    }

    pub fn exchange(&self) -> &KeyExchange {
        &self.exchange
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateSetupError {
    #[error(
        "no usable KEM provider: the real primitive is not compiled in \
         and the insecure fallback was not permitted"
    )]
    ProviderUnavailable,
}
