//! Song library with case-insensitive search.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A song to analyse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    /// Song title.
    pub title: String,
    /// Performing artist, if known.
    #[serde(default)]
    pub artist: Option<String>,
}

impl Song {
    /// Create a song, treating a blank artist as unknown.
    pub fn new(title: impl Into<String>, artist: Option<&str>) -> Self {
        Self {
            title: title.into().trim().to_string(),
            artist: artist.map(str::trim).filter(|a| !a.is_empty()).map(String::from),
        }
    }

    /// Parse `"Title - Artist"`; text without the separator is a bare title.
    pub fn parse(text: &str) -> Self {
        match text.split_once(" - ") {
            Some((title, artist)) => Self::new(title, Some(artist)),
            None => Self::new(text, None),
        }
    }

    /// Whether `term` (already lowercased) occurs in the title or artist.
    fn matches(&self, term: &str) -> bool {
        self.title.to_lowercase().contains(term)
            || self.artist.as_ref().is_some_and(|a| a.to_lowercase().contains(term))
    }
}

impl fmt::Display for Song {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.artist {
            Some(artist) => write!(f, "{} - {artist}", self.title),
            None => f.write_str(&self.title),
        }
    }
}

/// Ordered collection of songs.
#[derive(Debug, Clone, Default)]
pub struct SongLibrary {
    songs: Vec<Song>,
}

impl SongLibrary {
    /// Library holding the given songs.
    pub const fn new(songs: Vec<Song>) -> Self {
        Self { songs }
    }

    /// The built-in sample library.
    pub fn sample() -> Self {
        Self::new(
            SAMPLE_SONGS
                .iter()
                .map(|(title, artist)| Song::new(*title, Some(*artist)))
                .collect(),
        )
    }

    /// All songs in library order.
    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    /// Songs whose title or artist contains `term`, case-insensitively.
    /// A blank term returns every song.
    pub fn filter(&self, term: &str) -> Vec<&Song> {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return self.songs.iter().collect();
        }
        self.songs.iter().filter(|s| s.matches(&term)).collect()
    }

    /// Add a song at the end.
    pub fn push(&mut self, song: Song) {
        self.songs.push(song);
    }

    /// Number of songs.
    pub fn len(&self) -> usize {
        self.songs.len()
    }

    /// Whether the library is empty.
    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }
}

const SAMPLE_SONGS: &[(&str, &str)] = &[
    ("Bohemian Rhapsody", "Queen"),
    ("Imagine", "John Lennon"),
    ("Blinding Lights", "The Weeknd"),
    ("Perfect", "Ed Sheeran"),
    ("Shape of You", "Ed Sheeran"),
    ("Someone Like You", "Adele"),
    ("Uptown Funk", "Mark Ronson ft. Bruno Mars"),
    ("Despacito", "Luis Fonsi"),
    ("See You Again", "Wiz Khalifa ft. Charlie Puth"),
    ("Happy", "Pharrell Williams"),
];
