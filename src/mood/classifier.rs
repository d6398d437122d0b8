//! Keyword-frequency mood classifier.
//!
//! Scores every mood of a [`MoodLexicon`] by counting keyword hits in the
//! lowercased text, picks the highest score (earliest mood on ties) and lists
//! which of the winner's keywords were seen.

use rayon::prelude::*;
use regex::Regex;
use serde::Serialize;

use crate::constants::mood::{MAX_MATCHED_KEYWORDS, NEUTRAL};
use crate::error::{Error, Result};
use crate::mood::lexicon::MoodLexicon;
use crate::types::{MatchMode, Scoring};

/// Classifier knobs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassifierOptions {
    /// How keywords are located in the text.
    pub match_mode: MatchMode,
    /// How hits add up to a score.
    pub scoring: Scoring,
}

/// Outcome of classifying one text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassificationResult {
    /// Dominant mood, or `neutral` when nothing matched.
    pub mood: String,
    /// Up to five keywords of the dominant mood found in the text, lexicon order.
    pub matched_keywords: Vec<String>,
    /// Score per mood, lexicon order.
    pub scores: Vec<(String, u32)>,
}

impl ClassificationResult {
    /// Whether no keyword of any mood was found.
    pub fn is_neutral(&self) -> bool {
        self.mood == NEUTRAL
    }

    /// Score for a mood, if the lexicon has it.
    pub fn score(&self, mood: &str) -> Option<u32> {
        self.scores.iter().find(|(m, _)| m == mood).map(|(_, s)| *s)
    }

    /// Sum of all mood scores.
    pub fn total(&self) -> u32 {
        self.scores.iter().map(|(_, s)| s).sum()
    }
}

/// Classify `text` against `lexicon` with substring matching and occurrence scoring.
pub fn classify(text: &str, lexicon: &MoodLexicon) -> ClassificationResult {
    let lowered = text.to_lowercase();
    score_and_pick(
        lexicon,
        Scoring::Occurrences,
        |keyword| lowered.matches(keyword).count(),
        |keyword| lowered.contains(keyword),
    )
}

/// A lexicon bundled with options, ready to classify many texts.
///
/// Whole-word patterns are compiled once here rather than per call.
#[derive(Debug, Clone)]
pub struct MoodClassifier {
    lexicon: MoodLexicon,
    options: ClassifierOptions,
    word_patterns: Vec<Vec<Regex>>,
}

impl MoodClassifier {
    /// Create a classifier.
    pub fn new(lexicon: MoodLexicon, options: ClassifierOptions) -> Result<Self> {
        let word_patterns = match options.match_mode {
            MatchMode::Substring => Vec::new(),
            MatchMode::WholeWord => lexicon
                .iter()
                .map(|(_, keywords)| {
                    keywords
                        .iter()
                        .map(|k| word_pattern(k))
                        .collect::<Result<Vec<_>>>()
                })
                .collect::<Result<Vec<_>>>()?,
        };

        Ok(Self { lexicon, options, word_patterns })
    }

    /// The lexicon in use.
    pub const fn lexicon(&self) -> &MoodLexicon {
        &self.lexicon
    }

    /// The options in use.
    pub const fn options(&self) -> ClassifierOptions {
        self.options
    }

    /// Classify one text.
    pub fn classify(&self, text: &str) -> ClassificationResult {
        let lowered = text.to_lowercase();

        match self.options.match_mode {
            MatchMode::Substring => score_and_pick(
                &self.lexicon,
                self.options.scoring,
                |keyword| lowered.matches(keyword).count(),
                |keyword| lowered.contains(keyword),
            ),
            MatchMode::WholeWord => score_and_pick(
                &self.lexicon,
                self.options.scoring,
                |keyword| {
                    self.pattern_for(keyword)
                        .map_or(0, |re| re.find_iter(&lowered).count())
                },
                |keyword| {
                    self.pattern_for(keyword)
                        .is_some_and(|re| re.is_match(&lowered))
                },
            ),
        }
    }

    /// Classify many texts in parallel, preserving input order.
    pub fn classify_batch<S: AsRef<str> + Sync>(&self, texts: &[S]) -> Vec<ClassificationResult> {
        texts.par_iter().map(|t| self.classify(t.as_ref())).collect()
    }

    fn pattern_for(&self, keyword: &str) -> Option<&Regex> {
        self.lexicon
            .iter()
            .zip(&self.word_patterns)
            .find_map(|((_, keywords), patterns)| {
                keywords.iter().position(|k| k == keyword).and_then(|i| patterns.get(i))
            })
    }
}

impl Default for MoodClassifier {
    fn default() -> Self {
        Self {
            lexicon: MoodLexicon::default(),
            options: ClassifierOptions::default(),
            word_patterns: Vec::new(),
        }
    }
}

fn word_pattern(keyword: &str) -> Result<Regex> {
    Regex::new(&format!(r"\b{}\b", regex::escape(keyword)))
        .map_err(|e| Error::lexicon(format!("keyword {keyword:?} cannot be matched as a word: {e}")))
}

/// Shared scoring core. `count` gives the number of hits of a keyword,
/// `present` whether it occurs at all.
fn score_and_pick(
    lexicon: &MoodLexicon,
    scoring: Scoring,
    count: impl Fn(&str) -> usize,
    present: impl Fn(&str) -> bool,
) -> ClassificationResult {
    let scores: Vec<(String, u32)> = lexicon
        .iter()
        .map(|(mood, keywords)| {
            let score: usize = keywords
                .iter()
                .map(|k| match scoring {
                    Scoring::Occurrences => count(k.as_str()),
                    Scoring::Presence => usize::from(present(k.as_str())),
                })
                .sum();
            (mood.to_string(), u32::try_from(score).unwrap_or(u32::MAX))
        })
        .collect();

    // Strictly-greater keeps the earliest mood on ties.
    let mut best: Option<(usize, u32)> = None;
    for (idx, (_, score)) in scores.iter().enumerate() {
        if *score > best.map_or(0, |(_, s)| s) {
            best = Some((idx, *score));
        }
    }

    let Some(dominant) = best.and_then(|(idx, _)| scores.get(idx)).map(|(m, _)| m.clone()) else {
        return ClassificationResult {
            mood: NEUTRAL.to_string(),
            matched_keywords: Vec::new(),
            scores,
        };
    };

    let matched_keywords = lexicon
        .keywords(&dominant)
        .unwrap_or_default()
        .iter()
        .filter(|k| present(k.as_str()))
        .take(MAX_MATCHED_KEYWORDS)
        .cloned()
        .collect();

    ClassificationResult {
        mood: dominant,
        matched_keywords,
        scores,
    }
}
