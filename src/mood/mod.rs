//! Mood detection from lyric text.
//!
//! A [`MoodLexicon`] maps moods to trigger keywords; the classifier counts
//! keyword hits per mood and reports the dominant one.

/// Keyword-frequency classifier
pub mod classifier;
/// Ordered mood → keyword tables and built-in presets
pub mod lexicon;
/// Display colours per mood
pub mod palette;

pub use classifier::{classify, ClassificationResult, ClassifierOptions, MoodClassifier};
pub use lexicon::{MoodEntry, MoodLexicon};
pub use palette::MoodPalette;
