//! Translation executor: runs one or two model invocations according to
//! the resolved path.

use std::time::Instant;
use tracing::{info, warn};

use crate::cache::ResultCache;
use crate::error::{Result, TolkaError};
use crate::models::ModelCache;
use crate::route::{PathResolver, RoutePair, TranslationPath};

/// A finished translation with its path metadata
#[derive(Debug, Clone)]
pub struct Translation {
    pub text: String,
    pub path: TranslationPath,
    pub cached: bool,
}

pub struct TranslationEngine {
    resolver: PathResolver,
    models: ModelCache,
    results: ResultCache,
    max_input_chars: usize,
}

impl TranslationEngine {
    pub fn new(
        resolver: PathResolver,
        models: ModelCache,
        results: ResultCache,
        max_input_chars: usize,
    ) -> Self {
        Self {
            resolver,
            models,
            results,
            max_input_chars,
        }
    }

    /// Translate `text` from `source` to `target`.
    ///
    /// Checks the result cache, resolves the path, truncates over-long
    /// input, then invokes the model(s). A pivot aborts on the first
    /// failing leg; nothing besides the poison rule is mutated, so no
    /// rollback is needed. The result cache serves entries within TTL
    /// even if the pair has since become unavailable.
    pub async fn translate(&self, text: &str, source: &str, target: &str) -> Result<Translation> {
        if let Some(cached) = self.results.get(source, target, text) {
            return Ok(Translation {
                text: cached,
                path: self.resolver.resolve(source, target),
                cached: true,
            });
        }

        let path = self.resolver.resolve(source, target);
        if !path.is_available() {
            return Err(TolkaError::PathUnavailable(
                source.to_string(),
                target.to_string(),
            ));
        }

        let started = Instant::now();
        let input = truncate_chars(text, self.max_input_chars);
        if input.len() < text.len() {
            warn!(
                "Input truncated to {} chars for {}→{}",
                self.max_input_chars, source, target
            );
        }

        let translated = match &path {
            TranslationPath::Direct(pair) => {
                info!("Using direct translation: {}", path);
                self.invoke(pair, input).await?
            }
            TranslationPath::Pivot { first, second } => {
                info!("Using pivot translation: {}", path);
                let intermediate = self.invoke(first, input).await?;
                self.invoke(second, &intermediate).await?
            }
            TranslationPath::Unsupported => unreachable!("checked above"),
        };

        info!(
            "Translation completed in {:.2}s ({})",
            started.elapsed().as_secs_f64(),
            path.kind()
        );

        self.results.put(source, target, text, &translated);

        Ok(Translation {
            text: translated,
            path,
            cached: false,
        })
    }

    async fn invoke(&self, pair: &RoutePair, text: &str) -> Result<String> {
        let model = self.models.get_or_load(pair).await?;
        model.translate(text).await
    }

    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    pub fn models(&self) -> &ModelCache {
        &self.models
    }

    pub fn results(&self) -> &ResultCache {
        &self.results
    }
}

/// Truncate to a maximum number of characters on a char boundary
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
