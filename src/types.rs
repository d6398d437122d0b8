//! Core option types shared by the classifier, configuration and CLI.
//!
//! Each enum round-trips through its lowercase name so it can come from an
//! environment variable, a command-line flag, or JSON.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// How a keyword is located inside lyric text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Plain substring search: `cry` counts inside `crying`.
    #[default]
    Substring,
    /// Only occurrences bounded by non-word characters count.
    #[serde(alias = "word")]
    WholeWord,
}

impl MatchMode {
    /// Returns all match modes in display order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Substring, Self::WholeWord]
    }

    /// Returns the canonical name of this match mode.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Substring => "substring",
            Self::WholeWord => "word",
        }
    }
}

/// How keyword hits add up to a mood score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scoring {
    /// Every occurrence of every keyword adds one.
    #[default]
    Occurrences,
    /// Each keyword adds at most one, however often it occurs.
    Presence,
}

impl Scoring {
    /// Returns the canonical name of this scoring rule.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Occurrences => "occurrences",
            Self::Presence => "presence",
        }
    }
}

/// Built-in mood vocabularies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LexiconPreset {
    /// Six moods: happy, sad, romantic, energetic, calm, angry.
    #[default]
    Full,
    /// Five moods: the full set without angry, with slightly different keywords.
    Minimal,
    /// Two moods: happy and sad.
    Simple,
}

impl LexiconPreset {
    /// Returns all presets in display order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Full, Self::Minimal, Self::Simple]
    }

    /// Returns the canonical name of this preset.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Minimal => "minimal",
            Self::Simple => "simple",
        }
    }
}

macro_rules! name_round_trip {
    ($ty:ty, $what:literal, $($alias:literal => $variant:expr),*) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }

        impl FromStr for $ty {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($alias => Ok($variant),)*
                    other => Err(Error::parse(format!("unknown {} {other:?}", $what), None)),
                }
            }
        }
    };
}

name_round_trip!(MatchMode, "match mode",
    "substring" => MatchMode::Substring,
    "word" => MatchMode::WholeWord,
    "wholeword" => MatchMode::WholeWord,
    "whole-word" => MatchMode::WholeWord);

name_round_trip!(Scoring, "scoring rule",
    "occurrences" => Scoring::Occurrences,
    "presence" => Scoring::Presence);

name_round_trip!(LexiconPreset, "lexicon preset",
    "full" => LexiconPreset::Full,
    "minimal" => LexiconPreset::Minimal,
    "simple" => LexiconPreset::Simple);
