//! Song mood analysis: lyrics lookup followed by classification.
//!
//! [`MoodAnalyzer::spawn`] runs an analysis on a tokio task and reports
//! through an mpsc channel, so an interactive front end never blocks on the
//! network.

use std::sync::Arc;

use futures::future;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::library::Song;
use crate::lyrics::{Lyrics, LyricsProvider};
use crate::mood::{ClassificationResult, MoodClassifier};

/// Outcome of analysing one song.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoodReport {
    /// Lyrics were found and classified.
    Detected {
        /// The lyrics that were classified.
        lyrics: Lyrics,
        /// Classification of those lyrics.
        result: ClassificationResult,
    },
    /// No lyrics could be found; the mood is unknown (not neutral).
    Unknown,
}

impl MoodReport {
    /// Mood label for display: the detected mood, or `unknown`.
    pub fn mood_label(&self) -> &str {
        match self {
            Self::Detected { result, .. } => &result.mood,
            Self::Unknown => "unknown",
        }
    }

    /// Classification, when lyrics were found.
    pub const fn result(&self) -> Option<&ClassificationResult> {
        match self {
            Self::Detected { result, .. } => Some(result),
            Self::Unknown => None,
        }
    }
}

/// Messages from a spawned analysis task.
#[derive(Debug)]
pub enum AnalysisUpdate {
    /// The task started looking up lyrics.
    Started(Song),
    /// The analysis completed.
    Finished(Song, MoodReport),
    /// The analysis was cancelled before completing.
    Cancelled(Song),
}

/// Lyrics provider plus classifier.
#[derive(Clone)]
pub struct MoodAnalyzer {
    provider: Arc<LyricsProvider>,
    classifier: Arc<MoodClassifier>,
}

impl MoodAnalyzer {
    /// Create an analyzer.
    pub fn new(provider: Arc<LyricsProvider>, classifier: Arc<MoodClassifier>) -> Self {
        Self { provider, classifier }
    }

    /// The lyrics provider in use.
    pub fn provider(&self) -> &LyricsProvider {
        &self.provider
    }

    /// The classifier in use.
    pub fn classifier(&self) -> &MoodClassifier {
        &self.classifier
    }

    /// Look up lyrics for a song and classify them.
    pub async fn analyze(&self, song: &Song) -> MoodReport {
        match self.provider.fetch_lyrics(&song.title, song.artist.as_deref()).await {
            Some(lyrics) => {
                let result = self.classifier.classify(&lyrics.text);
                tracing::debug!("{song}: {} via {} lyrics", result.mood, lyrics.origin);
                MoodReport::Detected { lyrics, result }
            }
            None => {
                tracing::info!("No lyrics for {song}; mood unknown");
                MoodReport::Unknown
            }
        }
    }

    /// Classify pasted text directly.
    pub fn analyze_text(&self, text: &str) -> ClassificationResult {
        self.classifier.classify(text)
    }

    /// Analyse several songs concurrently; reports come back in input order.
    pub async fn analyze_all(&self, songs: &[Song]) -> Vec<MoodReport> {
        future::join_all(songs.iter().map(|song| self.analyze(song))).await
    }

    /// Run [`Self::analyze`] on a background task.
    ///
    /// Sends `Started`, then `Finished` or `Cancelled` when `cancel` fires first.
    /// A dropped receiver ends the task quietly.
    pub fn spawn(
        &self,
        song: Song,
        tx: mpsc::Sender<AnalysisUpdate>,
        cancel: CancellationToken,
    ) -> JoinHandle<()> {
        let analyzer = self.clone();

        tokio::spawn(async move {
            if tx.send(AnalysisUpdate::Started(song.clone())).await.is_err() {
                return;
            }

            let update = tokio::select! {
                () = cancel.cancelled() => {
                    tracing::debug!("Analysis of {song} cancelled");
                    AnalysisUpdate::Cancelled(song)
                }
                report = analyzer.analyze(&song) => AnalysisUpdate::Finished(song, report),
            };

            if tx.send(update).await.is_err() {
                tracing::debug!("Analysis receiver dropped before result was delivered");
            }
        })
    }
}
