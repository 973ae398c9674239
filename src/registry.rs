//! Language registry: the universe of supported languages.
//!
//! Supported means the language is known for display and validation
//! purposes. Whether a pair of supported languages can actually be
//! translated is a narrower question answered by the path resolver.

use std::collections::BTreeMap;

use crate::config::LanguageEntry;

#[derive(Debug, Clone)]
pub struct LanguageRegistry {
    languages: BTreeMap<String, String>,
}

impl LanguageRegistry {
    pub fn new(entries: &[LanguageEntry]) -> Self {
        let languages = entries
            .iter()
            .map(|e| (e.code.clone(), e.name.clone()))
            .collect();

        Self { languages }
    }

    pub fn is_supported(&self, code: &str) -> bool {
        self.languages.contains_key(code)
    }

    pub fn display_name(&self, code: &str) -> Option<&str> {
        self.languages.get(code).map(|s| s.as_str())
    }

    /// All supported languages, code → display name
    pub fn all(&self) -> &BTreeMap<String, String> {
        &self.languages
    }

    pub fn len(&self) -> usize {
        self.languages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }
}
