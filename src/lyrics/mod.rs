//! Lyrics lookup.
//!
//! Lyric text comes from a chain of [`LyricsSource`]s behind a bounded cache,
//! with a static fallback table as the last resort. The [`LyricsProvider`]
//! ties these together and never surfaces a lookup failure to its caller.

use std::fmt;
use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;

use crate::error::Result;

/// Bounded in-memory lyrics cache
pub mod cache;
/// Static fallback lyrics table
pub mod fallback;
/// Local directory of `.txt` lyric files
pub mod local;
/// HTTP client for the lyrics.ovh API
pub mod ovh;
/// Cache → sources → fallback orchestration
pub mod provider;

pub use cache::{CacheKey, LyricsCache};
pub use fallback::FallbackTable;
pub use local::LocalLyricsDir;
pub use ovh::LyricsOvhClient;
pub use provider::LyricsProvider;

/// A place lyric text can be looked up.
///
/// Implementations return `Err(Error::NotFound)` when they simply have no
/// entry, and other errors for genuine failures. The provider treats both as
/// "try the next source".
#[async_trait]
pub trait LyricsSource: Send + Sync {
    /// Look up raw lyric text for a title and optional artist.
    async fn lookup(&self, title: &str, artist: Option<&str>) -> Result<String>;

    /// Short name of this source (for logging).
    fn name(&self) -> &'static str;

    /// Origin reported for text found here.
    fn origin(&self) -> LyricsOrigin {
        LyricsOrigin::Remote
    }
}

/// Where a lyric text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LyricsOrigin {
    /// Served from the in-memory cache.
    Cache,
    /// Read from a local lyrics directory.
    Local,
    /// Fetched from the remote lyrics service.
    Remote,
    /// Taken from the built-in fallback table.
    Fallback,
}

impl fmt::Display for LyricsOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Cache => "cache",
            Self::Local => "local",
            Self::Remote => "remote",
            Self::Fallback => "fallback",
        })
    }
}

/// Lyric text plus its origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lyrics {
    /// Cleaned lyric text.
    pub text: String,
    /// Where the text came from.
    pub origin: LyricsOrigin,
}

/// Section markers such as `[Chorus]` or `[Verse 2: Artist]`, within one line.
#[allow(clippy::expect_used)]
static RE_SECTION_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[.*?\]").expect("valid regex: RE_SECTION_MARKER")
});

/// Remove bracketed section markers and surrounding whitespace.
pub fn strip_section_markers(text: &str) -> String {
    RE_SECTION_MARKER.replace_all(text, "").trim().to_string()
}
