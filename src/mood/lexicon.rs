//! Mood lexicons: ordered mood → keyword tables.
//!
//! Order matters twice: moods are scored in lexicon order and the first mood
//! to reach the top score wins a tie; keywords are reported in lexicon order.
//! The JSON form is therefore an array rather than an object.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::mood::NEUTRAL;
use crate::error::{Error, Result};
use crate::types::LexiconPreset;

/// One mood and its trigger keywords.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodEntry {
    /// Mood label, e.g. `happy`.
    pub mood: String,
    /// Lowercase trigger keywords in priority order.
    pub keywords: Vec<String>,
}

/// Validated, ordered mapping from mood label to keywords.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MoodLexicon {
    entries: Vec<MoodEntry>,
}

impl MoodLexicon {
    /// Build a lexicon, normalizing keywords to trimmed lowercase.
    ///
    /// Rejects an empty lexicon, blank or duplicate mood labels, the reserved
    /// `neutral` label, empty keyword lists, and blank keywords.
    pub fn new<M, K, I>(entries: I) -> Result<Self>
    where
        M: Into<String>,
        K: AsRef<str>,
        I: IntoIterator<Item = (M, Vec<K>)>,
    {
        let mut normalized: Vec<MoodEntry> = Vec::new();

        for (mood, keywords) in entries {
            let mood = mood.into().trim().to_lowercase();
            if mood.is_empty() {
                return Err(Error::lexicon("mood label must not be blank"));
            }
            if mood == NEUTRAL {
                return Err(Error::lexicon(format!("{NEUTRAL:?} is reserved for texts without any match")));
            }
            if normalized.iter().any(|e| e.mood == mood) {
                return Err(Error::lexicon(format!("duplicate mood {mood:?}")));
            }
            if keywords.is_empty() {
                return Err(Error::lexicon(format!("mood {mood:?} has no keywords")));
            }

            let mut cleaned = Vec::with_capacity(keywords.len());
            for keyword in &keywords {
                let keyword = keyword.as_ref().trim().to_lowercase();
                if keyword.is_empty() {
                    return Err(Error::lexicon(format!("mood {mood:?} has a blank keyword")));
                }
                cleaned.push(keyword);
            }

            normalized.push(MoodEntry { mood, keywords: cleaned });
        }

        if normalized.is_empty() {
            return Err(Error::lexicon("at least one mood is required"));
        }

        Ok(Self { entries: normalized })
    }

    /// Built-in lexicon for a preset.
    pub fn preset(preset: LexiconPreset) -> Self {
        let table: &[(&str, &[&str])] = match preset {
            LexiconPreset::Full => FULL,
            LexiconPreset::Minimal => MINIMAL,
            LexiconPreset::Simple => SIMPLE,
        };

        // Built-in tables are already lowercase and unique.
        Self {
            entries: table
                .iter()
                .map(|(mood, keywords)| MoodEntry {
                    mood: (*mood).to_string(),
                    keywords: keywords.iter().map(|k| (*k).to_string()).collect(),
                })
                .collect(),
        }
    }

    /// Parse a lexicon from its JSON array form.
    pub fn from_json(json: &str) -> Result<Self> {
        let entries: Vec<MoodEntry> = serde_json::from_str(json)
            .map_err(|e| Error::parse(format!("Invalid lexicon JSON: {e}"), None))?;
        Self::new(entries.into_iter().map(|e| (e.mood, e.keywords)))
    }

    /// Load a lexicon from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs_err::read_to_string(path)
            .map_err(|e| Error::io(e, path.to_path_buf()))?;
        let lexicon = Self::from_json(&json).map_err(|e| match e {
            Error::Parse { message, .. } => Error::parse(message, path.to_path_buf()),
            other => other,
        })?;
        tracing::info!("Loaded {} moods from {}", lexicon.len(), path.display());
        Ok(lexicon)
    }

    /// Serialize to the JSON array form accepted by [`Self::from_json`].
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| Error::parse(format!("Failed to serialize lexicon: {e}"), None))
    }

    /// Entries in lexicon order.
    pub fn entries(&self) -> &[MoodEntry] {
        &self.entries
    }

    /// Iterate `(mood, keywords)` in lexicon order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|e| (e.mood.as_str(), e.keywords.as_slice()))
    }

    /// Mood labels in lexicon order.
    pub fn moods(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.mood.as_str())
    }

    /// Keywords for a mood, if the lexicon has it.
    pub fn keywords(&self, mood: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|e| e.mood == mood)
            .map(|e| e.keywords.as_slice())
    }

    /// Number of moods.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false for a validated lexicon; provided for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for MoodLexicon {
    fn default() -> Self {
        Self::preset(LexiconPreset::Full)
    }
}

const FULL: &[(&str, &[&str])] = &[
    ("happy", &["love", "happy", "joy", "smile", "sun", "light", "good", "beautiful", "wonderful"]),
    ("sad", &["sad", "lonely", "cry", "tears", "pain", "hurt", "alone", "miss", "goodbye"]),
    ("romantic", &["love", "heart", "kiss", "hold", "touch", "darling", "baby", "sweet", "forever"]),
    ("energetic", &["go", "move", "dance", "jump", "run", "party", "energy", "wild", "fire"]),
    ("calm", &["peace", "calm", "quiet", "still", "gentle", "soft", "easy", "slow", "dream"]),
    ("angry", &["hate", "angry", "rage", "fight", "war", "kill", "burn", "break", "mad"]),
];

const MINIMAL: &[(&str, &[&str])] = &[
    ("happy", &["happy", "joy", "smile", "love", "sun", "bright", "good", "beautiful"]),
    ("sad", &["sad", "lonely", "cry", "tears", "pain", "hurt", "alone", "miss"]),
    ("romantic", &["love", "heart", "kiss", "hold", "touch", "darling", "sweet"]),
    ("energetic", &["go", "move", "dance", "jump", "run", "party", "energy", "fire"]),
    ("calm", &["peace", "calm", "quiet", "still", "gentle", "soft", "easy"]),
];

const SIMPLE: &[(&str, &[&str])] = &[
    ("happy", &["happy", "joy", "smile", "love", "sun"]),
    ("sad", &["sad", "cry", "pain", "hurt", "alone"]),
];
