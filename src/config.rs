use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, TolkaError};

// Defaults for optional cache/limit fields
fn default_result_ttl_secs() -> u64 {
    300
}

fn default_max_batch_texts() -> usize {
    10
}

fn default_max_batch_text_chars() -> usize {
    500
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Supported languages (code → display name)
    pub registry: Vec<LanguageEntry>,
    /// Direct translation models, one per ordered language pair
    pub routes: Vec<RouteEntry>,
    pub routing: RoutingConfig,
    pub provider: ProviderConfig,
    pub limits: LimitsConfig,
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageEntry {
    /// ISO 639-1 language code (lowercase)
    pub code: String,
    /// English display name
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteEntry {
    pub source: String,
    pub target: String,
    /// Model identifier resolvable by the model provider
    pub model: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Pivot language for pairs without a direct model
    pub bridge: String,
    /// Languages known to have no reliable direct models; pairs touching
    /// these never resolve as direct even if a route entry exists
    pub no_direct: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Inference server endpoint URL
    pub endpoint: String,
    /// HTTP timeout for load and translate calls
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Requests longer than this are rejected at the service boundary
    pub max_request_chars: usize,
    /// Model input longer than this is truncated before invocation
    pub max_input_chars: usize,
    /// Maximum number of texts per batch request
    #[serde(default = "default_max_batch_texts")]
    pub max_batch_texts: usize,
    /// Maximum length of each text in a batch request
    #[serde(default = "default_max_batch_text_chars")]
    pub max_batch_text_chars: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Time-to-live for cached translation results
    #[serde(default = "default_result_ttl_secs")]
    pub result_ttl_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            registry: default_registry(),
            routes: default_routes(),
            routing: RoutingConfig {
                bridge: "en".to_string(),
                no_direct: vec![
                    "zu".to_string(),
                    "sn".to_string(),
                    "st".to_string(),
                    "tn".to_string(),
                ],
            },
            provider: ProviderConfig {
                endpoint: "http://localhost:8090".to_string(),
                timeout_secs: 300,
            },
            limits: LimitsConfig {
                max_request_chars: 1000,
                max_input_chars: 512,
                max_batch_texts: 10,
                max_batch_text_chars: 500,
            },
            cache: CacheConfig {
                result_ttl_secs: 300,
            },
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| TolkaError::Config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| TolkaError::Config(format!("Failed to parse config file: {}", e)))
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| TolkaError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| TolkaError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }
}

fn default_registry() -> Vec<LanguageEntry> {
    let languages = [
        ("en", "English"),
        ("es", "Spanish"),
        ("fr", "French"),
        ("de", "German"),
        ("it", "Italian"),
        ("pt", "Portuguese"),
        ("ru", "Russian"),
        ("zh", "Chinese"),
        ("ja", "Japanese"),
        ("ko", "Korean"),
        ("ar", "Arabic"),
        ("sw", "Swahili"),
        ("yo", "Yoruba"),
        ("ig", "Igbo"),
        ("ha", "Hausa"),
        ("am", "Amharic"),
        ("so", "Somali"),
        ("zu", "Zulu"),
        ("xh", "Xhosa"),
        ("rw", "Kinyarwanda"),
        ("ny", "Chichewa"),
        ("mg", "Malagasy"),
        ("ln", "Lingala"),
        ("sn", "Shona"),
        ("st", "Sesotho"),
        ("tn", "Setswana"),
    ];

    languages
        .iter()
        .map(|(code, name)| LanguageEntry {
            code: code.to_string(),
            name: name.to_string(),
        })
        .collect()
}

/// Verified opus-mt model mapping. Only models confirmed to exist on the
/// inference side are listed; pairs without an entry route through the
/// bridge language.
fn default_routes() -> Vec<RouteEntry> {
    let routes = [
        // European languages
        ("en", "es", "Helsinki-NLP/opus-mt-en-es"),
        ("es", "en", "Helsinki-NLP/opus-mt-es-en"),
        ("en", "fr", "Helsinki-NLP/opus-mt-en-fr"),
        ("fr", "en", "Helsinki-NLP/opus-mt-fr-en"),
        ("en", "de", "Helsinki-NLP/opus-mt-en-de"),
        ("de", "en", "Helsinki-NLP/opus-mt-de-en"),
        ("en", "it", "Helsinki-NLP/opus-mt-en-it"),
        ("it", "en", "Helsinki-NLP/opus-mt-it-en"),
        ("en", "pt", "Helsinki-NLP/opus-mt-en-pt"),
        ("pt", "en", "Helsinki-NLP/opus-mt-pt-en"),
        ("en", "ru", "Helsinki-NLP/opus-mt-en-ru"),
        ("ru", "en", "Helsinki-NLP/opus-mt-ru-en"),
        // Asian languages
        ("en", "zh", "Helsinki-NLP/opus-mt-en-zh"),
        ("zh", "en", "Helsinki-NLP/opus-mt-zh-en"),
        ("en", "ja", "Helsinki-NLP/opus-mt-en-jap"),
        ("ja", "en", "Helsinki-NLP/opus-mt-jap-en"),
        ("en", "ko", "Helsinki-NLP/opus-mt-en-ko"),
        ("ko", "en", "Helsinki-NLP/opus-mt-ko-en"),
        ("en", "ar", "Helsinki-NLP/opus-mt-en-ar"),
        ("ar", "en", "Helsinki-NLP/opus-mt-ar-en"),
        // African languages, English pairs
        ("en", "sw", "Helsinki-NLP/opus-mt-en-swc"),
        ("sw", "en", "Helsinki-NLP/opus-mt-swc-en"),
        ("en", "yo", "Helsinki-NLP/opus-mt-en-yo"),
        ("yo", "en", "Helsinki-NLP/opus-mt-yo-en"),
        ("en", "ig", "Helsinki-NLP/opus-mt-en-ig"),
        ("ig", "en", "Helsinki-NLP/opus-mt-ig-en"),
        ("en", "ha", "Helsinki-NLP/opus-mt-en-ha"),
        ("ha", "en", "Helsinki-NLP/opus-mt-ha-en"),
        ("en", "am", "Helsinki-NLP/opus-mt-en-am"),
        ("am", "en", "Helsinki-NLP/opus-mt-am-en"),
        ("en", "so", "Helsinki-NLP/opus-mt-en-so"),
        ("so", "en", "Helsinki-NLP/opus-mt-so-en"),
        ("en", "xh", "Helsinki-NLP/opus-mt-en-xh"),
        ("xh", "en", "Helsinki-NLP/opus-mt-xh-en"),
        ("en", "rw", "Helsinki-NLP/opus-mt-en-rw"),
        ("rw", "en", "Helsinki-NLP/opus-mt-rw-en"),
        ("en", "ny", "Helsinki-NLP/opus-mt-en-ny"),
        ("ny", "en", "Helsinki-NLP/opus-mt-ny-en"),
        ("en", "mg", "Helsinki-NLP/opus-mt-en-mg"),
        ("mg", "en", "Helsinki-NLP/opus-mt-mg-en"),
        ("en", "ln", "Helsinki-NLP/opus-mt-en-ln"),
        ("ln", "en", "Helsinki-NLP/opus-mt-ln-en"),
        // Direct non-English European pairs
        ("es", "fr", "Helsinki-NLP/opus-mt-es-fr"),
        ("fr", "es", "Helsinki-NLP/opus-mt-fr-es"),
        ("de", "fr", "Helsinki-NLP/opus-mt-de-fr"),
        ("fr", "de", "Helsinki-NLP/opus-mt-fr-de"),
        ("es", "pt", "Helsinki-NLP/opus-mt-es-pt"),
        ("pt", "es", "Helsinki-NLP/opus-mt-pt-es"),
    ];

    routes
        .iter()
        .map(|(source, target, model)| RouteEntry {
            source: source.to_string(),
            target: target.to_string(),
            model: model.to_string(),
        })
        .collect()
}
