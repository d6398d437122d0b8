//! Application error types.
//!
//! Provides unified error handling with actionable context for debugging.

use thiserror::Error;

/// Application result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Application error types with specific context for actionable debugging
#[derive(Debug, Error)]
pub enum Error {
    /// IO error with path context
    #[error("IO error at {path:?}: {source}")]
    Io {
        /// The underlying IO error.
        source: std::io::Error,
        /// File path where the error occurred, if known.
        path: Option<std::path::PathBuf>,
    },

    /// Network error (connection, timeout, DNS)
    #[error("Network error: {0}")]
    Network(String),

    /// Lyrics API error with status context
    #[error("Lyrics API error: {message}")]
    LyricsApi {
        /// Human-readable error description.
        message: String,
        /// HTTP status code, if from an HTTP response.
        status: Option<u16>,
        /// Actionable suggestion for resolving the error.
        hint: Option<&'static str>,
    },

    /// No lyrics in a given source
    #[error("No lyrics found for {title:?}{}", by_artist(.artist.as_deref()))]
    NotFound {
        /// Song title that was looked up.
        title: String,
        /// Artist that was looked up, if any.
        artist: Option<String>,
    },

    /// Configuration error with guidance
    #[error("Configuration error: {message}. {hint}")]
    Config {
        /// Description of the configuration problem.
        message: String,
        /// Actionable guidance for fixing the issue.
        hint: &'static str,
    },

    /// File or payload parsing error
    #[error("Parse error in {file:?}: {message}")]
    Parse {
        /// File that failed to parse, if known.
        file: Option<std::path::PathBuf>,
        /// Description of the parse failure.
        message: String,
    },

    /// Invalid mood lexicon
    #[error("Invalid lexicon: {0}")]
    Lexicon(String),
}

impl Error {
    /// Create an IO error with path context
    pub fn io(source: std::io::Error, path: impl Into<Option<std::path::PathBuf>>) -> Self {
        Self::Io { source, path: path.into() }
    }

    /// Create a lyrics API error with HTTP status
    pub fn api_status(message: impl Into<String>, status: u16) -> Self {
        let hint = match status {
            404 => Some("The lyrics service has no entry for this title/artist"),
            429 => Some("Rate limited - wait a moment and try again"),
            500..=599 => Some("Lyrics server error - try again later"),
            _ => None,
        };
        Self::LyricsApi {
            message: message.into(),
            status: Some(status),
            hint,
        }
    }

    /// Create a not-found error for a title and optional artist
    pub fn not_found(title: impl Into<String>, artist: Option<&str>) -> Self {
        Self::NotFound {
            title: title.into(),
            artist: artist.map(String::from),
        }
    }

    /// Create a config error with actionable hint
    pub fn config(message: impl Into<String>, hint: &'static str) -> Self {
        Self::Config { message: message.into(), hint }
    }

    /// Create a parse error with file context
    pub fn parse(message: impl Into<String>, file: impl Into<Option<std::path::PathBuf>>) -> Self {
        Self::Parse { file: file.into(), message: message.into() }
    }

    /// Create a lexicon validation error
    pub fn lexicon(message: impl Into<String>) -> Self {
        Self::Lexicon(message.into())
    }

    /// Whether this error means "the source simply had nothing", as opposed to a failure
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. } | Self::LyricsApi { status: Some(404), .. }
        )
    }
}

fn by_artist(artist: Option<&str>) -> String {
    artist.map(|a| format!(" by {a:?}")).unwrap_or_default()
}

// Convenience conversion
impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io { source: e, path: None }
    }
}
