// Model provider seam
//
// The provider is the externally supplied ML runtime: given a model
// identifier it materializes a ready-to-invoke translation model. The
// default implementation talks to an HTTP inference server; tests swap
// in mocks through the same traits.

pub mod http;

pub use http::HttpProvider;

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::ProviderConfig;
use crate::error::Result;

/// A loaded model handle for exactly one language pair. Invocation is
/// synchronous from the caller's perspective: the future resolves with
/// the full output, there is no streaming or partial result.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TranslationModel: Send + Sync {
    async fn translate(&self, text: &str) -> Result<String>;
}

/// Resolves a model identifier to a loaded model.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Materialize the model behind `model_id`. Fails with
    /// `TolkaError::LoadFailure` when the artifact cannot be resolved.
    async fn load(&self, model_id: &str) -> Result<Arc<dyn TranslationModel>>;
}

/// Factory for creating provider instances
pub struct ProviderFactory;

impl ProviderFactory {
    pub fn create_provider(config: &ProviderConfig) -> Arc<dyn ModelProvider> {
        Arc::new(HttpProvider::new(config))
    }
}
