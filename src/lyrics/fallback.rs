//! Built-in lyrics for a handful of well-known songs.
//!
//! Consulted only after every lookup source has failed. A fallback entry
//! matches when its key is a case-insensitive substring of the requested
//! title; entries are checked in table order.

const BUILT_IN: &[(&str, &str)] = &[
    (
        "bohemian rhapsody",
        "Is this the real life? Is this just fantasy?\n\
         Caught in a landslide, no escape from reality\n\
         Open your eyes, look up to the skies and see\n\
         I'm just a poor boy, I need no sympathy\n\
         Because I'm easy come, easy go, little high, little low\n\
         Any way the wind blows doesn't really matter to me, to me",
    ),
    (
        "imagine",
        "Imagine there's no heaven\n\
         It's easy if you try\n\
         No hell below us\n\
         Above us only sky\n\
         Imagine all the people\n\
         Living for today",
    ),
    (
        "happy",
        "It might seem crazy what I'm about to say\n\
         Sunshine she's here, you can take a break\n\
         I'm a hot air balloon that could go to space\n\
         With the air, like I don't care, baby, by the way",
    ),
];

/// Ordered table of lowercase title fragments and literal lyric text.
#[derive(Debug, Clone)]
pub struct FallbackTable {
    entries: Vec<(String, String)>,
}

impl FallbackTable {
    /// A table with no entries.
    pub const fn empty() -> Self {
        Self { entries: Vec::new() }
    }

    /// Add an entry after the existing ones. The key is matched case-insensitively.
    #[must_use]
    pub fn with_entry(mut self, key: &str, text: impl Into<String>) -> Self {
        let key = key.trim().to_lowercase();
        if !key.is_empty() {
            self.entries.push((key, text.into()));
        }
        self
    }

    /// First entry whose key occurs in `title`.
    pub fn lookup(&self, title: &str) -> Option<&str> {
        let title = title.to_lowercase();
        self.entries
            .iter()
            .find(|(key, _)| title.contains(key.as_str()))
            .map(|(_, text)| text.as_str())
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for FallbackTable {
    fn default() -> Self {
        BUILT_IN
            .iter()
            .fold(Self::empty(), |table, (key, text)| table.with_entry(key, *text))
    }
}
