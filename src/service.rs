//! Translation service: the context object wiring registry, routing,
//! model cache and executor together.
//!
//! Constructed once at startup and injected into callers; there is no
//! module-level global, so tests get fresh state per instance. This layer
//! owns caller-side validation (non-empty text, request length, distinct
//! registered languages) before anything reaches the executor.

use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};
use tracing::{info, warn};

use crate::cache::ResultCache;
use crate::config::Config;
use crate::engine::TranslationEngine;
use crate::error::{Result, TolkaError};
use crate::models::ModelCache;
use crate::provider::{ModelProvider, ProviderFactory};
use crate::registry::LanguageRegistry;
use crate::route::{PathKind, PathResolver, RoutePair, RouteStatus, RouteTable, TranslationPath};

#[derive(Debug, Clone, Serialize)]
pub struct TranslationOutcome {
    pub original_text: String,
    pub translated_text: String,
    pub source_lang: String,
    pub target_lang: String,
    pub translation_type: PathKind,
    pub translation_path: String,
    pub cached: bool,
    pub response_time_ms: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PathInfo {
    pub kind: PathKind,
    pub path: String,
    pub description: String,
    pub available: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchItem {
    pub original: String,
    pub translated: Option<String>,
    pub error: Option<String>,
}

impl BatchItem {
    pub fn succeeded(&self) -> bool {
        self.translated.is_some()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchOutcome {
    pub items: Vec<BatchItem>,
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub success_rate: f64,
    pub response_time_ms: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct LanguageDetails {
    pub code: String,
    pub name: String,
    pub available: bool,
    /// Languages this one translates to directly
    pub direct_targets: Vec<String>,
    /// Languages that translate into this one directly
    pub direct_sources: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RouteReport {
    pub pair: String,
    pub model: String,
    pub status: RouteStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceStatus {
    pub supported_languages: usize,
    pub available_languages: usize,
    pub loaded_models: usize,
    pub cached_results: usize,
    pub routes: Vec<RouteReport>,
}

pub struct TranslationService {
    registry: LanguageRegistry,
    routes: Arc<RwLock<RouteTable>>,
    engine: TranslationEngine,
    max_request_chars: usize,
    max_batch_texts: usize,
    max_batch_text_chars: usize,
}

impl TranslationService {
    pub fn new(config: Config, provider: Arc<dyn ModelProvider>) -> Self {
        let registry = LanguageRegistry::new(&config.registry);
        let routes = Arc::new(RwLock::new(RouteTable::from_entries(&config.routes)));

        let engine = TranslationEngine::new(
            PathResolver::new(routes.clone(), &config.routing),
            ModelCache::new(provider, routes.clone()),
            ResultCache::new(Duration::from_secs(config.cache.result_ttl_secs)),
            config.limits.max_input_chars,
        );

        Self {
            registry,
            routes,
            engine,
            max_request_chars: config.limits.max_request_chars,
            max_batch_texts: config.limits.max_batch_texts,
            max_batch_text_chars: config.limits.max_batch_text_chars,
        }
    }

    /// Build a service with the HTTP provider from config
    pub fn from_config(config: Config) -> Self {
        let provider = ProviderFactory::create_provider(&config.provider);
        Self::new(config, provider)
    }

    /// Translate a single text, with full request validation
    pub async fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<TranslationOutcome> {
        let started = Instant::now();

        let source = source.to_lowercase();
        let target = target.to_lowercase();
        let text = self.validate_request(text, &source, &target)?;

        info!("Starting translation: {} -> {}", source, target);

        let translation = self.engine.translate(&text, &source, &target).await?;
        let path_string = self.render_path(&translation.path, &source, &target);

        let outcome = TranslationOutcome {
            original_text: text,
            translated_text: translation.text,
            source_lang: source.clone(),
            target_lang: target.clone(),
            translation_type: translation.path.kind(),
            translation_path: path_string,
            cached: translation.cached,
            response_time_ms: started.elapsed().as_millis() as u64,
        };

        info!(
            "Translation completed: {}->{} in {}ms",
            source, target, outcome.response_time_ms
        );

        Ok(outcome)
    }

    /// Translate several texts over one language pair. Individual text
    /// failures are recorded per item and do not abort the batch.
    pub async fn translate_batch(
        &self,
        texts: &[String],
        source: &str,
        target: &str,
    ) -> Result<BatchOutcome> {
        let started = Instant::now();

        if texts.is_empty() {
            return Err(TolkaError::Validation("Texts array is required".to_string()));
        }
        if texts.len() > self.max_batch_texts {
            return Err(TolkaError::Validation(format!(
                "Maximum {} texts allowed per batch",
                self.max_batch_texts
            )));
        }
        for (i, text) in texts.iter().enumerate() {
            if text.chars().count() > self.max_batch_text_chars {
                return Err(TolkaError::Validation(format!(
                    "Text {} too long. Maximum {} characters per text.",
                    i + 1,
                    self.max_batch_text_chars
                )));
            }
        }

        let source = source.to_lowercase();
        let target = target.to_lowercase();
        let info = self.path_info(&source, &target)?;
        if !info.available {
            return Err(TolkaError::PathUnavailable(source, target));
        }

        let mut items = Vec::with_capacity(texts.len());
        for text in texts {
            match self.translate(text, &source, &target).await {
                Ok(outcome) => items.push(BatchItem {
                    original: text.clone(),
                    translated: Some(outcome.translated_text),
                    error: None,
                }),
                Err(e) => {
                    warn!("Batch item failed: {}", e);
                    items.push(BatchItem {
                        original: text.clone(),
                        translated: None,
                        error: Some(e.to_string()),
                    });
                }
            }
        }

        let succeeded = items.iter().filter(|i| i.succeeded()).count();
        let total = items.len();

        Ok(BatchOutcome {
            total,
            succeeded,
            failed: total - succeeded,
            success_rate: (succeeded as f64 / total as f64) * 100.0,
            response_time_ms: started.elapsed().as_millis() as u64,
            items,
        })
    }

    /// Resolve the translation path for a pair of registered languages
    pub fn resolve_path(&self, source: &str, target: &str) -> Result<TranslationPath> {
        let source = source.to_lowercase();
        let target = target.to_lowercase();
        self.check_registered(&source)?;
        self.check_registered(&target)?;

        Ok(self.engine.resolver().resolve(&source, &target))
    }

    /// Human-readable path information for a pair
    pub fn path_info(&self, source: &str, target: &str) -> Result<PathInfo> {
        let path = self.resolve_path(source, target)?;

        let description = match path.kind() {
            PathKind::Direct => "Direct translation".to_string(),
            PathKind::Pivot => format!(
                "Translation via {}",
                self.bridge_display_name()
            ),
            PathKind::Unsupported => {
                "Translation not available for this language pair".to_string()
            }
        };

        Ok(PathInfo {
            kind: path.kind(),
            path: self.render_path(&path, &source.to_lowercase(), &target.to_lowercase()),
            description,
            available: path.is_available(),
        })
    }

    /// All registered languages, code → display name
    pub fn supported_languages(&self) -> &BTreeMap<String, String> {
        self.registry.all()
    }

    /// Languages touched by at least one active route
    pub fn available_languages(&self) -> BTreeMap<String, String> {
        let active = self.routes.read().expect("route table lock poisoned").active_pairs();
        self.registry
            .all()
            .iter()
            .filter(|(code, _)| {
                active
                    .iter()
                    .any(|pair| pair.source == **code || pair.target == **code)
            })
            .map(|(code, name)| (code.clone(), name.clone()))
            .collect()
    }

    /// Registered languages with no active route touching them
    pub fn unavailable_languages(&self) -> BTreeMap<String, String> {
        let available = self.available_languages();
        self.registry
            .all()
            .iter()
            .filter(|(code, _)| !available.contains_key(*code))
            .map(|(code, name)| (code.clone(), name.clone()))
            .collect()
    }

    /// Availability and direct-pair listing for one language
    pub fn language_details(&self, code: &str) -> Result<LanguageDetails> {
        let code = code.to_lowercase();
        let name = self
            .registry
            .display_name(&code)
            .ok_or_else(|| TolkaError::UnsupportedLanguage(code.clone()))?
            .to_string();

        let active = self.routes.read().expect("route table lock poisoned").active_pairs();
        let mut direct_targets: Vec<String> = active
            .iter()
            .filter(|pair| pair.source == code)
            .map(|pair| pair.target.clone())
            .collect();
        let mut direct_sources: Vec<String> = active
            .iter()
            .filter(|pair| pair.target == code)
            .map(|pair| pair.source.clone())
            .collect();
        direct_targets.sort();
        direct_sources.sort();

        Ok(LanguageDetails {
            available: self.available_languages().contains_key(&code),
            code,
            name,
            direct_targets,
            direct_sources,
        })
    }

    /// Observable status of one route pair
    pub fn route_status(&self, source: &str, target: &str) -> RouteStatus {
        self.routes
            .read()
            .expect("route table lock poisoned")
            .status(&RoutePair::new(source.to_lowercase(), target.to_lowercase()))
    }

    /// Counts and per-route status for health reporting
    pub fn status(&self) -> ServiceStatus {
        let mut routes: Vec<RouteReport> = self
            .routes
            .read()
            .expect("route table lock poisoned")
            .entries()
            .into_iter()
            .map(|(pair, model, status)| RouteReport {
                pair: pair.to_string(),
                model,
                status,
            })
            .collect();
        routes.sort_by(|a, b| a.pair.cmp(&b.pair));

        ServiceStatus {
            supported_languages: self.registry.len(),
            available_languages: self.available_languages().len(),
            loaded_models: self.engine.models().loaded_count(),
            cached_results: self.engine.results().len(),
            routes,
        }
    }

    fn validate_request(&self, text: &str, source: &str, target: &str) -> Result<String> {
        let text = text.trim();

        if text.is_empty() {
            return Err(TolkaError::Validation("Text is required".to_string()));
        }
        if text.chars().count() > self.max_request_chars {
            return Err(TolkaError::Validation(format!(
                "Text too long. Maximum {} characters allowed.",
                self.max_request_chars
            )));
        }
        if source == target {
            return Err(TolkaError::Validation(
                "Source and target languages cannot be the same.".to_string(),
            ));
        }
        self.check_registered(source)?;
        self.check_registered(target)?;

        Ok(text.to_string())
    }

    fn check_registered(&self, code: &str) -> Result<()> {
        if !self.registry.is_supported(code) {
            return Err(TolkaError::UnsupportedLanguage(code.to_string()));
        }
        Ok(())
    }

    fn bridge_display_name(&self) -> String {
        let bridge = self.engine.resolver().bridge();
        self.registry
            .display_name(bridge)
            .unwrap_or(bridge)
            .to_string()
    }

    /// Render the path the way it is shown to users, with the bridge
    /// spelled out by its display name
    fn render_path(&self, path: &TranslationPath, source: &str, target: &str) -> String {
        match path {
            TranslationPath::Direct(pair) => format!("{} → {}", pair.source, pair.target),
            TranslationPath::Pivot { first, second } => format!(
                "{} → {} → {}",
                first.source,
                self.bridge_display_name(),
                second.target
            ),
            TranslationPath::Unsupported => format!("{} → {}", source, target),
        }
    }
}
