//! End-to-end tests through the translation service with a fake model
//! provider.

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tolka::config::Config;
use tolka::error::{Result, TolkaError};
use tolka::provider::{ModelProvider, TranslationModel};
use tolka::route::{PathKind, RouteStatus, TranslationPath};
use tolka::service::TranslationService;

/// Provider fake: echoes input tagged with the model id, counts loads
/// and invocations, and can be told to fail loading specific models.
#[derive(Default)]
struct FakeProvider {
    loads: AtomicUsize,
    invocations: Arc<AtomicUsize>,
    load_delay_ms: u64,
    fail_loads_containing: Option<String>,
}

impl FakeProvider {
    fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn slow() -> Arc<Self> {
        Arc::new(Self {
            load_delay_ms: 50,
            ..Self::default()
        })
    }

    fn failing_for(fragment: &str) -> Arc<Self> {
        Arc::new(Self {
            fail_loads_containing: Some(fragment.to_string()),
            ..Self::default()
        })
    }

    fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    fn invocation_count(&self) -> usize {
        self.invocations.load(Ordering::SeqCst)
    }
}

struct FakeModel {
    id: String,
    invocations: Arc<AtomicUsize>,
}

#[async_trait]
impl ModelProvider for FakeProvider {
    async fn load(&self, model_id: &str) -> Result<Arc<dyn TranslationModel>> {
        if self.load_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.load_delay_ms)).await;
        }
        self.loads.fetch_add(1, Ordering::SeqCst);

        if let Some(fragment) = &self.fail_loads_containing {
            if model_id.contains(fragment.as_str()) {
                return Err(TolkaError::LoadFailure {
                    model: model_id.to_string(),
                    cause: "artifact not found".to_string(),
                });
            }
        }

        Ok(Arc::new(FakeModel {
            id: model_id.to_string(),
            invocations: self.invocations.clone(),
        }))
    }
}

#[async_trait]
impl TranslationModel for FakeModel {
    async fn translate(&self, text: &str) -> Result<String> {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        Ok(format!("[{}]{}", self.id, text))
    }
}

fn service_with(provider: Arc<FakeProvider>) -> TranslationService {
    TranslationService::new(Config::default(), provider)
}

#[tokio::test]
async fn translate_direct_pair() {
    let provider = FakeProvider::new();
    let service = service_with(provider.clone());

    let outcome = service.translate("hello world", "en", "es").await.unwrap();

    assert_eq!(
        outcome.translated_text,
        "[Helsinki-NLP/opus-mt-en-es]hello world"
    );
    assert_eq!(outcome.translation_type, PathKind::Direct);
    assert_eq!(outcome.translation_path, "en → es");
    assert!(!outcome.cached);
    assert_eq!(provider.load_count(), 1);
    assert_eq!(provider.invocation_count(), 1);
}

#[tokio::test]
async fn translate_pivot_pair_chains_legs() {
    let provider = FakeProvider::new();
    let service = service_with(provider.clone());

    let outcome = service.translate("hola", "es", "de").await.unwrap();

    assert_eq!(
        outcome.translated_text,
        "[Helsinki-NLP/opus-mt-en-de][Helsinki-NLP/opus-mt-es-en]hola"
    );
    assert_eq!(outcome.translation_type, PathKind::Pivot);
    assert_eq!(outcome.translation_path, "es → English → de");
    assert_eq!(provider.load_count(), 2);
    assert_eq!(provider.invocation_count(), 2);
}

#[tokio::test]
async fn repeat_translation_served_from_cache() {
    let provider = FakeProvider::new();
    let service = service_with(provider.clone());

    let first = service.translate("hello", "en", "es").await.unwrap();
    let second = service.translate("hello", "en", "es").await.unwrap();

    assert_eq!(first.translated_text, second.translated_text);
    assert!(second.cached);
    assert_eq!(provider.invocation_count(), 1);
}

#[tokio::test]
async fn concurrent_first_translations_load_model_once() {
    let provider = FakeProvider::slow();
    let service = Arc::new(service_with(provider.clone()));

    let mut handles = Vec::new();
    for _ in 0..8 {
        let service = service.clone();
        handles.push(tokio::spawn(async move {
            service.translate("hello", "en", "fr").await
        }));
    }

    let mut outputs = Vec::new();
    for handle in handles {
        outputs.push(handle.await.unwrap().unwrap().translated_text);
    }

    assert_eq!(provider.load_count(), 1);
    assert!(outputs.windows(2).all(|w| w[0] == w[1]));
}

#[tokio::test]
async fn load_failure_poisons_pair_and_fails_fast() {
    let provider = FakeProvider::failing_for("en-es");
    let service = service_with(provider.clone());

    let err = service.translate("hello", "en", "es").await.unwrap_err();
    assert!(matches!(err, TolkaError::LoadFailure { .. }));
    assert_eq!(service.route_status("en", "es"), RouteStatus::Poisoned);

    // The pair now resolves as unsupported and fails without a load
    assert_eq!(
        service.resolve_path("en", "es").unwrap(),
        TranslationPath::Unsupported
    );
    let loads_before = provider.load_count();
    let err = service.translate("hello", "en", "es").await.unwrap_err();
    assert!(matches!(err, TolkaError::PathUnavailable(_, _)));
    assert_eq!(provider.load_count(), loads_before);
}

#[tokio::test]
async fn poisoned_leg_removes_pivot_routes() {
    let provider = FakeProvider::failing_for("en-de");
    let service = service_with(provider.clone());

    // es→de pivots through en; the second leg fails to load
    let err = service.translate("hola", "es", "de").await.unwrap_err();
    assert!(matches!(err, TolkaError::LoadFailure { .. }));

    // Direct en→de and the es→de pivot are both gone now
    assert_eq!(
        service.resolve_path("en", "de").unwrap(),
        TranslationPath::Unsupported
    );
    assert_eq!(
        service.resolve_path("es", "de").unwrap(),
        TranslationPath::Unsupported
    );
    // The healthy first leg survives
    assert_eq!(
        service.resolve_path("es", "en").unwrap().kind(),
        PathKind::Direct
    );
}

#[tokio::test]
async fn validation_rejects_bad_requests() {
    let service = service_with(FakeProvider::new());

    let err = service.translate("   ", "en", "es").await.unwrap_err();
    assert!(matches!(err, TolkaError::Validation(_)));

    let long_text = "a".repeat(1001);
    let err = service.translate(&long_text, "en", "es").await.unwrap_err();
    assert!(matches!(err, TolkaError::Validation(_)));

    let err = service.translate("hello", "en", "en").await.unwrap_err();
    assert!(matches!(err, TolkaError::Validation(_)));

    let err = service.translate("hello", "en", "xx").await.unwrap_err();
    assert!(matches!(err, TolkaError::UnsupportedLanguage(_)));
}

#[tokio::test]
async fn language_codes_are_case_insensitive() {
    let service = service_with(FakeProvider::new());

    let outcome = service.translate("hello", "EN", "Es").await.unwrap();
    assert_eq!(outcome.source_lang, "en");
    assert_eq!(outcome.target_lang, "es");
}

#[tokio::test]
async fn batch_records_per_text_outcomes() {
    // The pair validates as available, then the model fails to load on
    // the first item and the poisoned route fails the rest
    let provider = FakeProvider::failing_for("en-es");
    let service = service_with(provider.clone());

    let texts = vec![
        "first".to_string(),
        "second".to_string(),
        "third".to_string(),
    ];
    let outcome = service.translate_batch(&texts, "en", "es").await.unwrap();

    assert_eq!(outcome.total, 3);
    assert_eq!(outcome.succeeded, 0);
    assert_eq!(outcome.failed, 3);
    assert!(outcome.items.iter().all(|i| i.error.is_some()));
}

#[tokio::test]
async fn batch_succeeds_and_reports_metrics() {
    let provider = FakeProvider::new();
    let service = service_with(provider.clone());

    let texts = vec!["one".to_string(), "two".to_string()];
    let outcome = service.translate_batch(&texts, "en", "fr").await.unwrap();

    assert_eq!(outcome.succeeded, 2);
    assert_eq!(outcome.failed, 0);
    assert!((outcome.success_rate - 100.0).abs() < f64::EPSILON);
    // One model load serves the whole batch
    assert_eq!(provider.load_count(), 1);
}

#[tokio::test]
async fn batch_validates_size_and_lengths() {
    let service = service_with(FakeProvider::new());

    let err = service.translate_batch(&[], "en", "es").await.unwrap_err();
    assert!(matches!(err, TolkaError::Validation(_)));

    let too_many: Vec<String> = (0..11).map(|i| format!("text {}", i)).collect();
    let err = service
        .translate_batch(&too_many, "en", "es")
        .await
        .unwrap_err();
    assert!(matches!(err, TolkaError::Validation(_)));

    let too_long = vec!["a".repeat(501)];
    let err = service
        .translate_batch(&too_long, "en", "es")
        .await
        .unwrap_err();
    assert!(matches!(err, TolkaError::Validation(_)));

    let err = service
        .translate_batch(&["hello".to_string()], "en", "zu")
        .await
        .unwrap_err();
    assert!(matches!(err, TolkaError::PathUnavailable(_, _)));
}

#[tokio::test]
async fn path_info_describes_all_outcomes() {
    let service = service_with(FakeProvider::new());

    let direct = service.path_info("en", "es").unwrap();
    assert_eq!(direct.kind, PathKind::Direct);
    assert_eq!(direct.description, "Direct translation");
    assert!(direct.available);

    let pivot = service.path_info("es", "de").unwrap();
    assert_eq!(pivot.kind, PathKind::Pivot);
    assert_eq!(pivot.path, "es → English → de");
    assert_eq!(pivot.description, "Translation via English");

    let unsupported = service.path_info("en", "zu").unwrap();
    assert_eq!(unsupported.kind, PathKind::Unsupported);
    assert!(!unsupported.available);
}

#[tokio::test]
async fn language_listings_split_by_availability() {
    let service = service_with(FakeProvider::new());

    let supported = service.supported_languages();
    let available = service.available_languages();
    let unavailable = service.unavailable_languages();

    assert_eq!(supported.len(), 26);
    assert_eq!(available.len() + unavailable.len(), supported.len());
    // Denylisted languages have no routes, so they are unavailable
    for code in ["zu", "sn", "st", "tn"] {
        assert!(unavailable.contains_key(code), "{} should be unavailable", code);
    }
    assert!(available.contains_key("en"));
    assert!(available.contains_key("sw"));
}

#[tokio::test]
async fn language_details_lists_direct_pairs() {
    let service = service_with(FakeProvider::new());

    let details = service.language_details("fr").unwrap();
    assert!(details.available);
    assert_eq!(details.name, "French");
    assert!(details.direct_targets.contains(&"en".to_string()));
    assert!(details.direct_targets.contains(&"de".to_string()));
    assert!(details.direct_sources.contains(&"es".to_string()));

    let details = service.language_details("zu").unwrap();
    assert!(!details.available);
    assert!(details.direct_targets.is_empty());

    let err = service.language_details("xx").unwrap_err();
    assert!(matches!(err, TolkaError::UnsupportedLanguage(_)));
}

#[tokio::test]
async fn status_reflects_loads_and_poisoning() {
    let provider = FakeProvider::failing_for("en-de");
    let service = service_with(provider.clone());

    let status = service.status();
    assert_eq!(status.supported_languages, 26);
    assert_eq!(status.loaded_models, 0);
    assert_eq!(status.cached_results, 0);

    service.translate("hello", "en", "es").await.unwrap();
    let _ = service.translate("hello", "en", "de").await;

    let status = service.status();
    assert_eq!(status.loaded_models, 1);
    assert_eq!(status.cached_results, 1);
    assert!(status
        .routes
        .iter()
        .any(|r| r.pair == "en→de" && r.status == RouteStatus::Poisoned));
    assert!(status
        .routes
        .iter()
        .any(|r| r.pair == "en→es" && r.status == RouteStatus::Active));
}

#[tokio::test]
async fn result_cache_expires_with_zero_ttl() {
    let mut config = Config::default();
    config.cache.result_ttl_secs = 0;
    let provider = FakeProvider::new();
    let service = TranslationService::new(config, provider.clone());

    service.translate("hello", "en", "es").await.unwrap();
    let second = service.translate("hello", "en", "es").await.unwrap();

    assert!(!second.cached);
    assert_eq!(provider.invocation_count(), 2);
}
