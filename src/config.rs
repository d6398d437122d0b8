//! Application configuration.
//!
//! Handles loading configuration from environment variables and .env files.

use dotenv::dotenv;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{cache, lyrics};
use crate::error::{Error, Result};
use crate::mood::{ClassifierOptions, MoodClassifier, MoodLexicon};
use crate::types::{LexiconPreset, MatchMode, Scoring};

/// Configuration for the application.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the lyrics lookup service
    pub lyrics_api_base: String,
    /// Timeout for a single lyrics request
    pub request_timeout: Duration,
    /// JSON lexicon file; when unset the preset is used
    pub lexicon_path: Option<PathBuf>,
    /// Built-in lexicon used when no lexicon file is configured
    pub preset: LexiconPreset,
    /// Keyword matching mode
    pub match_mode: MatchMode,
    /// Keyword scoring rule
    pub scoring: Scoring,
    /// Local directory of `.txt` lyric files, consulted before the web service
    pub lyrics_dir: Option<PathBuf>,
    /// Maximum number of cached lyric texts
    pub cache_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lyrics_api_base: lyrics::DEFAULT_API_BASE.to_string(),
            request_timeout: Duration::from_secs(lyrics::DEFAULT_TIMEOUT_SECS),
            lexicon_path: None,
            preset: LexiconPreset::default(),
            match_mode: MatchMode::default(),
            scoring: Scoring::default(),
            lyrics_dir: None,
            cache_capacity: cache::DEFAULT_CAPACITY,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn load() -> Result<Self> {
        // Try to load .env file if present
        dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// Malformed numbers fall back to defaults; unknown preset or match mode
    /// names are reported as configuration errors.
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(base) = var("MOODIFY_LYRICS_API").filter(|b| !b.trim().is_empty()) {
            config.lyrics_api_base = base.trim().to_string();
        }

        if let Some(secs) = var("MOODIFY_TIMEOUT_SECS").and_then(|s| s.trim().parse::<u64>().ok()) {
            config.request_timeout = Duration::from_secs(clamp_timeout(secs));
        }

        config.lexicon_path = var("MOODIFY_LEXICON")
            .filter(|p| !p.trim().is_empty())
            .map(|p| expand_path(&p));

        if let Some(preset) = var("MOODIFY_PRESET") {
            config.preset = preset.parse().map_err(|_| {
                Error::config(format!("unknown lexicon preset {preset:?}"), "Use one of: full, minimal, simple")
            })?;
        }

        if let Some(mode) = var("MOODIFY_MATCH_MODE") {
            config.match_mode = mode.parse().map_err(|_| {
                Error::config(format!("unknown match mode {mode:?}"), "Use one of: substring, word")
            })?;
        }

        if let Some(scoring) = var("MOODIFY_SCORING") {
            config.scoring = scoring.parse().map_err(|_| {
                Error::config(format!("unknown scoring rule {scoring:?}"), "Use one of: occurrences, presence")
            })?;
        }

        // Lyrics dir: env var override, or default <data dir>/moodify/lyrics when present
        config.lyrics_dir = var("MOODIFY_LYRICS_DIR").map_or_else(
            || {
                dirs::data_dir()
                    .map(|d| d.join("moodify").join("lyrics"))
                    .filter(|p| p.is_dir())
            },
            |path| {
                let p = expand_path(&path);
                p.is_dir().then_some(p)
            },
        );

        if let Some(capacity) = var("MOODIFY_CACHE_CAPACITY").and_then(|s| s.trim().parse().ok()) {
            config.cache_capacity = capacity;
        }

        Ok(config)
    }

    /// Lexicon from the configured file, or the configured preset
    pub fn lexicon(&self) -> Result<MoodLexicon> {
        match &self.lexicon_path {
            Some(path) => MoodLexicon::load(path),
            None => Ok(MoodLexicon::preset(self.preset)),
        }
    }

    /// Classifier options from the configured match mode and scoring rule
    pub const fn classifier_options(&self) -> ClassifierOptions {
        ClassifierOptions {
            match_mode: self.match_mode,
            scoring: self.scoring,
        }
    }

    /// Classifier built from the configured lexicon and options
    pub fn classifier(&self) -> Result<MoodClassifier> {
        MoodClassifier::new(self.lexicon()?, self.classifier_options())
    }
}

/// Keep request timeouts within the accepted bounds.
pub fn clamp_timeout(secs: u64) -> u64 {
    secs.clamp(lyrics::MIN_TIMEOUT_SECS, lyrics::MAX_TIMEOUT_SECS)
}

fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path.trim()).to_string())
}
