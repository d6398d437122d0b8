//! Application constants.
//!
//! Centralizes magic numbers and configuration values for better maintainability.

/// Mood classification constants.
pub mod mood {
    /// Label reported when no keyword of any mood occurs in the text.
    pub const NEUTRAL: &str = "neutral";

    /// Maximum number of matched keywords reported for the dominant mood.
    pub const MAX_MATCHED_KEYWORDS: usize = 5;
}

/// Lyrics lookup constants.
pub mod lyrics {
    /// Default base URL of the lyrics lookup service.
    pub const DEFAULT_API_BASE: &str = "https://api.lyrics.ovh/v1";

    /// Path segment used in place of an artist when none is known.
    pub const ARTIST_PLACEHOLDER: &str = "various";

    /// Default request timeout in seconds.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

    /// Smallest accepted request timeout in seconds.
    pub const MIN_TIMEOUT_SECS: u64 = 5;

    /// Largest accepted request timeout in seconds.
    pub const MAX_TIMEOUT_SECS: u64 = 10;

    /// File extension of lyric files in a local lyrics directory.
    pub const LOCAL_FILE_EXTENSION: &str = "txt";
}

/// Lyrics cache constants.
pub mod cache {
    /// Default number of lyric texts kept in memory.
    pub const DEFAULT_CAPACITY: usize = 256;
}

/// Async task constants.
pub mod async_tasks {
    /// Channel buffer size for async task communication.
    pub const CHANNEL_BUFFER_SIZE: usize = 10;
}
