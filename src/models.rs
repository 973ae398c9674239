//! Model cache: lazy, load-once-use-many storage of model handles.
//!
//! One handle per route pair, created on first use and kept until process
//! teardown. There is no eviction. First loads of the same pair are
//! single-flight: concurrent callers share one provider load. A failed
//! load poisons the route, so the pair fails fast for the rest of the
//! process lifetime instead of re-attempting an expensive broken load.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::error::{Result, TolkaError};
use crate::provider::{ModelProvider, TranslationModel};
use crate::route::{RoutePair, RouteTable};

type ModelHandle = Arc<dyn TranslationModel>;
type ModelCell = Arc<OnceCell<ModelHandle>>;

pub struct ModelCache {
    provider: Arc<dyn ModelProvider>,
    routes: Arc<RwLock<RouteTable>>,
    loaded: Mutex<HashMap<RoutePair, ModelCell>>,
}

impl ModelCache {
    pub fn new(provider: Arc<dyn ModelProvider>, routes: Arc<RwLock<RouteTable>>) -> Self {
        Self {
            provider,
            routes,
            loaded: Mutex::new(HashMap::new()),
        }
    }

    /// Get the model handle for a pair, loading it on first use.
    ///
    /// Fails with `ModelUnavailable` when the pair has no active route,
    /// and with `LoadFailure` when the provider cannot materialize the
    /// model. The latter poisons the route.
    pub async fn get_or_load(&self, pair: &RoutePair) -> Result<ModelHandle> {
        // Fail fast before touching the provider: absent and poisoned
        // routes look the same here
        {
            let table = self.routes.read().expect("route table lock poisoned");
            if !table.has_active(pair) {
                return Err(TolkaError::ModelUnavailable(pair.to_string()));
            }
        }

        let cell = {
            let mut loaded = self.loaded.lock().expect("model cache lock poisoned");
            loaded
                .entry(pair.clone())
                .or_insert_with(|| Arc::new(OnceCell::new()))
                .clone()
        };

        let result = cell
            .get_or_try_init(|| async {
                // Re-read under the cell: the route may have been
                // poisoned while this caller waited for the lock
                let model_id = {
                    let table = self.routes.read().expect("route table lock poisoned");
                    table
                        .model_id(pair)
                        .map(str::to_string)
                        .ok_or_else(|| TolkaError::ModelUnavailable(pair.to_string()))?
                };

                info!("Loading model {} for {}", model_id, pair);
                self.provider.load(&model_id).await
            })
            .await;

        match result {
            Ok(handle) => Ok(handle.clone()),
            Err(e) => {
                if matches!(e, TolkaError::LoadFailure { .. }) {
                    warn!("Model load failed for {}: {}", pair, e);
                    let mut table = self.routes.write().expect("route table lock poisoned");
                    table.poison(pair);
                }
                self.loaded
                    .lock()
                    .expect("model cache lock poisoned")
                    .remove(pair);
                Err(e)
            }
        }
    }

    /// Pairs with a live handle
    pub fn loaded_pairs(&self) -> Vec<RoutePair> {
        self.loaded
            .lock()
            .expect("model cache lock poisoned")
            .iter()
            .filter(|(_, cell)| cell.initialized())
            .map(|(pair, _)| pair.clone())
            .collect()
    }

    pub fn loaded_count(&self) -> usize {
        self.loaded_pairs().len()
    }
}
