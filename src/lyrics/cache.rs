//! Bounded in-memory lyrics cache.
//!
//! Keys are normalized (trimmed, lowercased) title/artist pairs. When the
//! cache is full the oldest insertion is evicted first.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Normalized `(title, artist)` cache key. A missing artist keys as empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    title: String,
    artist: String,
}

impl CacheKey {
    /// Build a key from raw user input.
    pub fn new(title: &str, artist: Option<&str>) -> Self {
        Self {
            title: normalize(title),
            artist: artist.map(normalize).unwrap_or_default(),
        }
    }

    /// Normalized title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Normalized artist (empty when unknown).
    pub fn artist(&self) -> &str {
        &self.artist
    }
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<CacheKey, String>,
    order: VecDeque<CacheKey>,
}

/// Thread-safe FIFO-bounded cache of cleaned lyric text.
#[derive(Debug)]
pub struct LyricsCache {
    capacity: usize,
    inner: Mutex<Inner>,
}

impl LyricsCache {
    /// Create a cache holding at most `capacity` texts. Zero disables caching.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Cached text for a key.
    pub fn get(&self, key: &CacheKey) -> Option<String> {
        self.lock().entries.get(key).cloned()
    }

    /// Store text for a key, evicting the oldest entries if over capacity.
    pub fn insert(&self, key: CacheKey, text: String) {
        if self.capacity == 0 {
            return;
        }

        let mut inner = self.lock();
        if inner.entries.insert(key.clone(), text).is_none() {
            inner.order.push_back(key);
        }

        while inner.entries.len() > self.capacity {
            let Some(oldest) = inner.order.pop_front() else {
                break;
            };
            inner.entries.remove(&oldest);
            tracing::debug!("Evicted lyrics cache entry {:?}", oldest.title);
        }
    }

    /// Drop every entry.
    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.entries.clear();
        inner.order.clear();
    }

    /// Number of cached texts.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    /// Whether the cache holds nothing.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of cached texts.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    // A panic while holding the lock cannot leave the maps inconsistent
    // beyond a missing entry, so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for LyricsCache {
    fn default() -> Self {
        Self::new(crate::constants::cache::DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    #[test]
    fn keys_are_normalized() {
        assert_eq!(
            CacheKey::new("  Imagine ", Some("JOHN Lennon")),
            CacheKey::new("imagine", Some("john lennon "))
        );
        assert_eq!(CacheKey::new("Imagine", None), CacheKey::new("imagine", Some("  ")));
        assert_ne!(CacheKey::new("Imagine", None), CacheKey::new("Imagine", Some("Queen")));
    }

    #[test]
    fn insert_and_get() {
        let cache = LyricsCache::new(4);
        let key = CacheKey::new("Imagine", Some("John Lennon"));
        assert!(cache.get(&key).is_none());

        cache.insert(key.clone(), "Imagine there's no heaven".into());
        assert_eq!(cache.get(&CacheKey::new("IMAGINE", Some("john lennon"))).as_deref(),
            Some("Imagine there's no heaven"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn evicts_oldest_first() {
        let cache = LyricsCache::new(2);
        cache.insert(CacheKey::new("a", None), "1".into());
        cache.insert(CacheKey::new("b", None), "2".into());
        cache.insert(CacheKey::new("c", None), "3".into());

        assert_eq!(cache.len(), 2);
        assert!(cache.get(&CacheKey::new("a", None)).is_none());
        assert!(cache.get(&CacheKey::new("b", None)).is_some());
        assert!(cache.get(&CacheKey::new("c", None)).is_some());
    }

    #[test]
    fn reinsert_replaces_without_growing() {
        let cache = LyricsCache::new(2);
        cache.insert(CacheKey::new("a", None), "old".into());
        cache.insert(CacheKey::new("a", None), "new".into());
        cache.insert(CacheKey::new("b", None), "2".into());

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&CacheKey::new("a", None)).as_deref(), Some("new"));
    }

    #[test]
    fn zero_capacity_disables_cache() {
        let cache = LyricsCache::new(0);
        cache.insert(CacheKey::new("a", None), "1".into());
        assert!(cache.is_empty());
    }

    #[test]
    fn clear_empties_cache() {
        let cache = LyricsCache::default();
        cache.insert(CacheKey::new("a", None), "1".into());
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.capacity(), crate::constants::cache::DEFAULT_CAPACITY);
    }
}
