//! `Moodify` - keyword-based mood classification for song lyrics.
//!
//! Lyrics are looked up through a cached chain of sources (local files, the
//! lyrics.ovh web service, a built-in fallback table) and classified against a
//! configurable mood lexicon.

// Re-export public modules for use in integration tests and as a library
pub mod analysis;
pub mod config;
pub mod constants;
pub mod error;
pub mod library;
pub mod lyrics;
pub mod mood;
pub mod types;
