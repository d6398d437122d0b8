//! Lyrics provider: cache, then lookup sources, then the fallback table.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, MutexGuard as AsyncMutexGuard};

use crate::config::Config;
use crate::lyrics::{
    strip_section_markers, CacheKey, FallbackTable, LocalLyricsDir, Lyrics, LyricsCache,
    LyricsOrigin, LyricsOvhClient, LyricsSource,
};

/// Resolves a title/artist pair to lyric text.
///
/// Lookup failures are logged and swallowed; callers only see `Some` or `None`.
/// Concurrent requests for the same normalized key are serialized so the
/// sources are consulted once and later callers are served from the cache.
pub struct LyricsProvider {
    cache: LyricsCache,
    sources: Vec<Box<dyn LyricsSource>>,
    fallback: FallbackTable,
    in_flight: InFlightMap,
}

type InFlightMap = Mutex<HashMap<CacheKey, Gate>>;

/// Per-key lookup lock and the number of tasks currently holding a handle to it.
#[derive(Default)]
struct Gate {
    lock: Arc<AsyncMutex<()>>,
    users: usize,
}

impl LyricsProvider {
    /// Provider with the given cache, no sources and an empty fallback table.
    pub fn new(cache: LyricsCache) -> Self {
        Self {
            cache,
            sources: Vec::new(),
            fallback: FallbackTable::empty(),
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// Provider wired from configuration: local lyrics directory (if any),
    /// lyrics.ovh, and the built-in fallback table.
    pub fn from_config(config: &Config) -> Self {
        let mut provider = Self::new(LyricsCache::new(config.cache_capacity))
            .with_fallback(FallbackTable::default());

        if let Some(dir) = &config.lyrics_dir {
            provider = provider.with_source(LocalLyricsDir::new(dir.clone()));
        }

        provider.with_source(LyricsOvhClient::new(config))
    }

    /// Append a lookup source; sources are tried in insertion order.
    #[must_use]
    pub fn with_source(mut self, source: impl LyricsSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Replace the fallback table.
    #[must_use]
    pub fn with_fallback(mut self, fallback: FallbackTable) -> Self {
        self.fallback = fallback;
        self
    }

    /// The lyrics cache.
    pub const fn cache(&self) -> &LyricsCache {
        &self.cache
    }

    /// Drop all cached lyrics.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Names of the configured sources, in lookup order.
    pub fn source_names(&self) -> Vec<&'static str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// Lyrics for a title and optional artist, or `None` when no source has them.
    pub async fn fetch_lyrics(&self, title: &str, artist: Option<&str>) -> Option<Lyrics> {
        if title.trim().is_empty() {
            tracing::debug!("Skipping lyrics lookup for blank title");
            return None;
        }

        let key = CacheKey::new(title, artist);
        if let Some(text) = self.cache.get(&key) {
            tracing::debug!("Lyrics cache hit for {:?}", key.title());
            return Some(Lyrics { text, origin: LyricsOrigin::Cache });
        }

        let found = {
            let gate = self.gate_for(&key);
            let _permit = gate.lock().await;

            // Another task may have filled the cache while we waited.
            if let Some(text) = self.cache.get(&key) {
                tracing::debug!("Lyrics cache filled while waiting for {:?}", key.title());
                Some(Lyrics { text, origin: LyricsOrigin::Cache })
            } else {
                self.lookup_sources(&key, title, artist).await
            }
        };

        found.or_else(|| self.lookup_fallback(title))
    }

    async fn lookup_sources(&self, key: &CacheKey, title: &str, artist: Option<&str>) -> Option<Lyrics> {
        for source in &self.sources {
            match source.lookup(title, artist).await {
                Ok(raw) => {
                    let text = strip_section_markers(&raw);
                    if text.is_empty() {
                        tracing::debug!("{} returned only section markers for {title:?}", source.name());
                        continue;
                    }
                    self.cache.insert(key.clone(), text.clone());
                    tracing::debug!("Lyrics for {title:?} found via {}", source.name());
                    return Some(Lyrics { text, origin: source.origin() });
                }
                Err(e) if e.is_not_found() => {
                    tracing::debug!("{} has no lyrics for {title:?}: {e}", source.name());
                }
                Err(e) => {
                    tracing::warn!("{} lookup for {title:?} failed: {e}", source.name());
                }
            }
        }
        None
    }

    fn lookup_fallback(&self, title: &str) -> Option<Lyrics> {
        let text = self.fallback.lookup(title)?;
        tracing::debug!("Using fallback lyrics for {title:?}");
        Some(Lyrics { text: text.to_string(), origin: LyricsOrigin::Fallback })
    }

    /// Per-key gate, registered in the in-flight map until its last user drops it.
    fn gate_for(&self, key: &CacheKey) -> InFlightGate<'_> {
        let mut map = lock_map(&self.in_flight);
        let entry = map.entry(key.clone()).or_default();
        entry.users += 1;
        InFlightGate {
            map: &self.in_flight,
            key: key.clone(),
            lock: Arc::clone(&entry.lock),
        }
    }
}

fn lock_map(map: &InFlightMap) -> MutexGuard<'_, HashMap<CacheKey, Gate>> {
    map.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Handle on one key's in-flight gate.
///
/// Dropping it, including when the lookup future is dropped mid-flight,
/// removes the map entry once no other task holds a handle.
struct InFlightGate<'a> {
    map: &'a InFlightMap,
    key: CacheKey,
    lock: Arc<AsyncMutex<()>>,
}

impl InFlightGate<'_> {
    async fn lock(&self) -> AsyncMutexGuard<'_, ()> {
        self.lock.lock().await
    }
}

impl Drop for InFlightGate<'_> {
    fn drop(&mut self) {
        let mut map = lock_map(self.map);
        if let Some(entry) = map.get_mut(&self.key) {
            entry.users = entry.users.saturating_sub(1);
            if entry.users == 0 {
                map.remove(&self.key);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;
    use crate::error::{Error, Result};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Clone, Copy)]
    enum Reply {
        Text(&'static str),
        Missing,
        Offline,
    }

    struct FakeSource {
        reply: Reply,
        calls: Arc<AtomicUsize>,
        delay: Duration,
    }

    impl FakeSource {
        fn new(reply: Reply) -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            (Self { reply, calls: Arc::clone(&calls), delay: Duration::ZERO }, calls)
        }

        fn slow(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }
    }

    #[async_trait]
    impl LyricsSource for FakeSource {
        async fn lookup(&self, title: &str, artist: Option<&str>) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            match self.reply {
                Reply::Text(text) => Ok(text.to_string()),
                Reply::Missing => Err(Error::not_found(title, artist)),
                Reply::Offline => Err(Error::Network("connection refused".into())),
            }
        }

        fn name(&self) -> &'static str {
            "fake"
        }
    }

    #[tokio::test]
    async fn blank_title_skips_lookup() {
        let (source, calls) = FakeSource::new(Reply::Text("la"));
        let provider = LyricsProvider::new(LyricsCache::new(8)).with_source(source);

        assert!(provider.fetch_lyrics("   ", Some("Queen")).await.is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn source_hit_is_cleaned_and_cached() {
        let (source, calls) = FakeSource::new(Reply::Text("[Verse 1]\nHello darkness\n[Chorus]\nmy old friend"));
        let provider = LyricsProvider::new(LyricsCache::new(8)).with_source(source);

        let first = provider.fetch_lyrics("The Sound of Silence", Some("Simon & Garfunkel")).await.unwrap();
        assert_eq!(first.origin, LyricsOrigin::Remote);
        assert_eq!(first.text, "Hello darkness\n\nmy old friend");

        let second = provider.fetch_lyrics(" the sound of silence ", Some("SIMON & GARFUNKEL")).await.unwrap();
        assert_eq!(second.origin, LyricsOrigin::Cache);
        assert_eq!(second.text, first.text);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn sources_are_tried_in_order() {
        let (missing, missing_calls) = FakeSource::new(Reply::Missing);
        let (found, found_calls) = FakeSource::new(Reply::Text("second source"));
        let (unused, unused_calls) = FakeSource::new(Reply::Text("third source"));
        let provider = LyricsProvider::new(LyricsCache::new(8))
            .with_source(missing)
            .with_source(found)
            .with_source(unused);

        let lyrics = provider.fetch_lyrics("Song", None).await.unwrap();
        assert_eq!(lyrics.text, "second source");
        assert_eq!(missing_calls.load(Ordering::SeqCst), 1);
        assert_eq!(found_calls.load(Ordering::SeqCst), 1);
        assert_eq!(unused_calls.load(Ordering::SeqCst), 0);
        assert_eq!(provider.source_names(), vec!["fake", "fake", "fake"]);
    }

    #[tokio::test]
    async fn failures_fall_back_without_caching() {
        let (source, calls) = FakeSource::new(Reply::Offline);
        let provider = LyricsProvider::new(LyricsCache::new(8))
            .with_source(source)
            .with_fallback(FallbackTable::default());

        let lyrics = provider.fetch_lyrics("Bohemian Rhapsody", Some("Queen")).await.unwrap();
        assert_eq!(lyrics.origin, LyricsOrigin::Fallback);
        assert!(lyrics.text.starts_with("Is this the real life?"));
        assert!(provider.cache().is_empty());

        provider.fetch_lyrics("Bohemian Rhapsody", Some("Queen")).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn nothing_anywhere_is_none() {
        let (source, _) = FakeSource::new(Reply::Offline);
        let provider = LyricsProvider::new(LyricsCache::new(8))
            .with_source(source)
            .with_fallback(FallbackTable::default());

        assert!(provider.fetch_lyrics("Blinding Lights", Some("The Weeknd")).await.is_none());
    }

    #[tokio::test]
    async fn marker_only_text_counts_as_miss() {
        let (source, _) = FakeSource::new(Reply::Text("[Instrumental]"));
        let provider = LyricsProvider::new(LyricsCache::new(8))
            .with_source(source)
            .with_fallback(FallbackTable::default());

        let lyrics = provider.fetch_lyrics("Imagine", None).await.unwrap();
        assert_eq!(lyrics.origin, LyricsOrigin::Fallback);
    }

    #[tokio::test]
    async fn clear_cache_forces_new_lookup() {
        let (source, calls) = FakeSource::new(Reply::Text("words"));
        let provider = LyricsProvider::new(LyricsCache::new(8)).with_source(source);

        provider.fetch_lyrics("Song", None).await.unwrap();
        provider.clear_cache();
        let again = provider.fetch_lyrics("Song", None).await.unwrap();
        assert_eq!(again.origin, LyricsOrigin::Remote);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn concurrent_requests_share_one_lookup() {
        let (source, calls) = FakeSource::new(Reply::Text("shared words"));
        let provider = Arc::new(
            LyricsProvider::new(LyricsCache::new(8)).with_source(source.slow(Duration::from_millis(100))),
        );

        let a = tokio::spawn({
            let provider = Arc::clone(&provider);
            async move { provider.fetch_lyrics("Song", Some("Band")).await }
        });
        let b = tokio::spawn({
            let provider = Arc::clone(&provider);
            async move { provider.fetch_lyrics("SONG", Some("band")).await }
        });

        let (a, b) = (a.await.unwrap().unwrap(), b.await.unwrap().unwrap());
        assert_eq!(a.text, "shared words");
        assert_eq!(b.text, "shared words");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(provider.in_flight.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn dropped_lookups_release_their_gates() {
        let (source, calls) = FakeSource::new(Reply::Text("eventually"));
        let provider = LyricsProvider::new(LyricsCache::new(8)).with_source(source.slow(Duration::from_secs(30)));

        for i in 0..20 {
            let title = format!("Song {}", i % 5);
            let lookup = provider.fetch_lyrics(&title, Some("Band"));
            assert!(tokio::time::timeout(Duration::from_millis(5), lookup).await.is_err());
        }

        // A holder and a waiter on the same key, both dropped mid-flight.
        let (first, second) = tokio::join!(
            tokio::time::timeout(Duration::from_millis(20), provider.fetch_lyrics("Shared", None)),
            tokio::time::timeout(Duration::from_millis(20), provider.fetch_lyrics("SHARED", None)),
        );
        assert!(first.is_err() && second.is_err());

        assert!(provider.in_flight.lock().unwrap().is_empty());
        assert!(provider.cache().is_empty());
        assert!(calls.load(Ordering::SeqCst) >= 20);
    }

    #[tokio::test]
    async fn from_config_prefers_local_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Imagine - John Lennon.txt"), "[Verse]\nImagine there's no heaven").unwrap();

        let config = Config {
            lyrics_api_base: "http://127.0.0.1:9/v1".into(),
            request_timeout: Duration::from_secs(5),
            lyrics_dir: Some(dir.path().to_path_buf()),
            ..Config::default()
        };
        let provider = LyricsProvider::from_config(&config);
        assert_eq!(provider.source_names(), vec!["local", "lyrics.ovh"]);

        let lyrics = provider.fetch_lyrics("Imagine", Some("John Lennon")).await.unwrap();
        assert_eq!(lyrics.origin, LyricsOrigin::Local);
        assert_eq!(lyrics.text, "Imagine there's no heaven");
    }
}
