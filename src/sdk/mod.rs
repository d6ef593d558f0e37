//! SDK construction.
//!
//! # Data Flow
//! ```text
//! SdkConfig (caller) → merged_over_defaults()
//!     → SdkLoader::ensure_loaded()   (once per loader)
//!     → SdkFactory::create_provider(config, network)
//!     → Arc<dyn Provider> owned by the session
//! ```

pub mod config;
pub mod http;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::OnceCell;

use crate::network::NetworkDescriptor;
use crate::provider::{Provider, ProviderError};

pub use config::{PaymasterOptions, SdkConfig, SubAccountOptions};
pub use http::HttpSdkFactory;

/// Errors raised while loading the SDK or creating its provider.
#[derive(Debug, Error)]
pub enum SdkError {
    /// The SDK could not be made available.
    #[error("SDK load failed: {0}")]
    Load(String),

    /// The SDK refused the configuration or failed to build a provider.
    #[error("provider creation failed: {0}")]
    Create(String),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

pub type SdkResult<T> = Result<T, SdkError>;

/// Something that can produce a wallet provider from an SDK configuration.
#[async_trait]
pub trait SdkFactory: Send + Sync {
    /// One-time readiness step. Called at most once per successful load.
    async fn load(&self) -> SdkResult<()> {
        Ok(())
    }

    /// Build the provider for the given configuration and network.
    fn create_provider(
        &self,
        config: &SdkConfig,
        network: &NetworkDescriptor,
    ) -> SdkResult<Arc<dyn Provider>>;
}

/// Wraps a factory and guarantees `load` succeeds at most once.
pub struct SdkLoader {
    factory: Arc<dyn SdkFactory>,
    loaded: OnceCell<()>,
}

impl SdkLoader {
    pub fn new(factory: Arc<dyn SdkFactory>) -> Self {
        Self {
            factory,
            loaded: OnceCell::new(),
        }
    }

    /// Load the SDK unless an earlier call already did.
    ///
    /// A failed load is not remembered, so a later call tries again.
    pub async fn ensure_loaded(&self) -> SdkResult<()> {
        self.loaded
            .get_or_try_init(|| async {
                tracing::info!("Loading wallet SDK");
                self.factory.load().await
            })
            .await
            .map(|_| ())
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.initialized()
    }

    /// Load if needed, then create a provider.
    pub async fn create(
        &self,
        config: &SdkConfig,
        network: &NetworkDescriptor,
    ) -> SdkResult<Arc<dyn Provider>> {
        self.ensure_loaded().await?;
        self.factory.create_provider(config, network)
    }
}

impl std::fmt::Debug for SdkLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SdkLoader")
            .field("loaded", &self.is_loaded())
            .finish()
    }
}
