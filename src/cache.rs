//! Short-lived cache of finished translations.
//!
//! Keyed by the ordered language pair plus a 64-bit hash of the input
//! text. The hash is not collision-resistant; a collision serves a stale
//! entry for at most one TTL, which is an accepted bounded risk. Expiry
//! is checked on read, writes overwrite (last write wins).

use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::debug;

struct CacheSlot {
    translation: String,
    stored_at: Instant,
}

pub struct ResultCache {
    entries: Mutex<HashMap<String, CacheSlot>>,
    ttl: Duration,
}

impl ResultCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    fn cache_key(source: &str, target: &str, text: &str) -> String {
        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        format!("{}_{}_{:016x}", source, target, hasher.finish())
    }

    pub fn get(&self, source: &str, target: &str, text: &str) -> Option<String> {
        let key = Self::cache_key(source, target, text);
        let mut entries = self.entries.lock().expect("result cache lock poisoned");

        match entries.get(&key) {
            Some(slot) if slot.stored_at.elapsed() < self.ttl => {
                debug!("Result cache hit for {}→{}", source, target);
                Some(slot.translation.clone())
            }
            Some(_) => {
                entries.remove(&key);
                None
            }
            None => None,
        }
    }

    pub fn put(&self, source: &str, target: &str, text: &str, translation: &str) {
        let key = Self::cache_key(source, target, text);
        let mut entries = self.entries.lock().expect("result cache lock poisoned");
        entries.insert(
            key,
            CacheSlot {
                translation: translation.to_string(),
                stored_at: Instant::now(),
            },
        );
    }

    /// Drop expired entries, returning how many were removed
    pub fn purge(&self) -> usize {
        let mut entries = self.entries.lock().expect("result cache lock poisoned");
        let before = entries.len();
        entries.retain(|_, slot| slot.stored_at.elapsed() < self.ttl);
        before - entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().expect("result cache lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_then_get() {
        let cache = ResultCache::new(Duration::from_secs(300));
        cache.put("en", "es", "hello", "hola");

        assert_eq!(cache.get("en", "es", "hello"), Some("hola".to_string()));
        assert_eq!(cache.get("en", "es", "goodbye"), None);
    }

    #[test]
    fn test_key_is_directional() {
        let cache = ResultCache::new(Duration::from_secs(300));
        cache.put("en", "es", "hello", "hola");

        assert_eq!(cache.get("es", "en", "hello"), None);
    }

    #[test]
    fn test_overwrite_wins() {
        let cache = ResultCache::new(Duration::from_secs(300));
        cache.put("en", "es", "hello", "hola");
        cache.put("en", "es", "hello", "buenas");

        assert_eq!(cache.get("en", "es", "hello"), Some("buenas".to_string()));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_expiry_on_read() {
        let cache = ResultCache::new(Duration::from_millis(0));
        cache.put("en", "es", "hello", "hola");

        assert_eq!(cache.get("en", "es", "hello"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_purge_drops_expired() {
        let cache = ResultCache::new(Duration::from_millis(0));
        cache.put("en", "es", "hello", "hola");
        cache.put("en", "fr", "hello", "bonjour");

        assert_eq!(cache.purge(), 2);
        assert!(cache.is_empty());
    }
}
