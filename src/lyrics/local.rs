//! Lyrics from a local directory of `.txt` files.
//!
//! Files are named `Title.txt` or `Title - Artist.txt` and may sit in
//! subdirectories. The directory is indexed on first lookup.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::OnceCell;
use walkdir::WalkDir;

use crate::constants::lyrics::LOCAL_FILE_EXTENSION;
use crate::error::{Error, Result};
use crate::lyrics::{LyricsOrigin, LyricsSource};

/// One indexed lyrics file.
#[derive(Debug, Clone)]
struct LocalEntry {
    title_lower: String,
    artist_lower: Option<String>,
    path: PathBuf,
}

/// Lazily indexed local lyrics directory.
#[derive(Debug)]
pub struct LocalLyricsDir {
    root: PathBuf,
    index: OnceCell<Vec<LocalEntry>>,
}

impl LocalLyricsDir {
    /// Create a source backed by the given directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            index: OnceCell::new(),
        }
    }

    /// Directory this source reads from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Number of lyric files found.
    pub async fn len(&self) -> usize {
        self.entries().await.len()
    }

    /// Whether no lyric files were found.
    pub async fn is_empty(&self) -> bool {
        self.entries().await.is_empty()
    }

    /// The file index, built on the blocking pool on first use.
    async fn entries(&self) -> &[LocalEntry] {
        self.index
            .get_or_init(|| async {
                let root = self.root.clone();
                tokio::task::spawn_blocking(move || scan(&root))
                    .await
                    .unwrap_or_else(|e| {
                        tracing::warn!("Indexing {} failed: {e}", self.root.display());
                        Vec::new()
                    })
            })
            .await
    }

    /// Path of the best file for a title and optional artist.
    ///
    /// With an artist, a file for that artist wins over an artist-less file;
    /// files for other artists never match.
    async fn find(&self, title: &str, artist: Option<&str>) -> Option<&Path> {
        let title = title.trim().to_lowercase();
        let artist = artist.map(|a| a.trim().to_lowercase()).filter(|a| !a.is_empty());
        let candidates: Vec<&LocalEntry> =
            self.entries().await.iter().filter(|e| e.title_lower == title).collect();
        let without_artist = || candidates.iter().find(|e| e.artist_lower.is_none());

        let chosen = match artist {
            Some(artist) => candidates
                .iter()
                .find(|e| e.artist_lower.as_deref() == Some(artist.as_str()))
                .or_else(without_artist),
            None => without_artist().or_else(|| candidates.first()),
        };

        chosen.map(|e| e.path.as_path())
    }
}

fn scan(root: &Path) -> Vec<LocalEntry> {
    let mut entries: Vec<LocalEntry> = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(e) => {
                tracing::warn!("Skipping unreadable entry under {}: {e}", root.display());
                None
            }
        })
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == LOCAL_FILE_EXTENSION))
        .filter_map(|e| {
            let stem = e.path().file_stem()?.to_str()?;
            let (title, artist) = parse_file_stem(stem)?;
            let title_lower = title.to_lowercase();
            let artist_lower = artist.map(str::to_lowercase);
            Some(LocalEntry {
                title_lower,
                artist_lower,
                path: e.into_path(),
            })
        })
        .collect();

    entries.sort_by(|a, b| a.path.cmp(&b.path));
    tracing::info!("Indexed {} lyric files under {}", entries.len(), root.display());
    entries
}

/// Split `Title - Artist` into its parts. A stem without the separator is a bare title.
fn parse_file_stem(stem: &str) -> Option<(&str, Option<&str>)> {
    let (title, artist) = match stem.split_once(" - ") {
        Some((title, artist)) => (title.trim(), Some(artist.trim()).filter(|a| !a.is_empty())),
        None => (stem.trim(), None),
    };
    (!title.is_empty()).then_some((title, artist))
}

#[async_trait]
impl LyricsSource for LocalLyricsDir {
    async fn lookup(&self, title: &str, artist: Option<&str>) -> Result<String> {
        let Some(path) = self.find(title, artist).await else {
            return Err(Error::not_found(title, artist));
        };

        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| Error::io(e, path.to_path_buf()))?;

        if text.trim().is_empty() {
            return Err(Error::not_found(title, artist));
        }
        Ok(text)
    }

    fn name(&self) -> &'static str {
        "local"
    }

    fn origin(&self) -> LyricsOrigin {
        LyricsOrigin::Local
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    fn fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::write(root.join("Imagine.txt"), "Imagine there's no heaven").unwrap();
        std::fs::write(root.join("Hello - Adele.txt"), "Hello, it's me").unwrap();
        std::fs::write(root.join("Hello - Lionel Richie.txt"), "Is it me you're looking for").unwrap();
        std::fs::create_dir(root.join("nested")).unwrap();
        std::fs::write(root.join("nested").join("Yesterday - The Beatles.txt"), "All my troubles").unwrap();
        std::fs::write(root.join("notes.md"), "not lyrics").unwrap();
        std::fs::write(root.join("Blank.txt"), "   \n").unwrap();
        dir
    }

    #[test]
    fn parses_file_stems() {
        assert_eq!(parse_file_stem("Hello - Adele"), Some(("Hello", Some("Adele"))));
        assert_eq!(parse_file_stem("Imagine"), Some(("Imagine", None)));
        assert_eq!(parse_file_stem("Song - "), Some(("Song", None)));
        assert_eq!(parse_file_stem("  "), None);
    }

    #[tokio::test]
    async fn indexes_txt_files_recursively() {
        let dir = fixture();
        let source = LocalLyricsDir::new(dir.path());
        assert_eq!(source.len().await, 5);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn concurrent_first_lookups_share_one_index() {
        let dir = fixture();
        let source = LocalLyricsDir::new(dir.path());

        let (imagine, hello, missing) = tokio::join!(
            source.lookup("Imagine", None),
            source.lookup("Hello", Some("Adele")),
            source.lookup("Unknown Song", None),
        );
        assert_eq!(imagine.unwrap(), "Imagine there's no heaven");
        assert_eq!(hello.unwrap(), "Hello, it's me");
        assert!(missing.unwrap_err().is_not_found());

        // Files added after indexing are not picked up.
        std::fs::write(dir.path().join("Late.txt"), "too late").unwrap();
        assert!(source.lookup("Late", None).await.is_err());
        assert_eq!(source.len().await, 5);
    }

    #[tokio::test]
    async fn looks_up_by_title_and_artist() {
        let dir = fixture();
        let source = LocalLyricsDir::new(dir.path());

        assert_eq!(source.lookup("imagine", None).await.unwrap(), "Imagine there's no heaven");
        assert_eq!(source.lookup("Imagine", Some("John Lennon")).await.unwrap(), "Imagine there's no heaven");
        assert_eq!(source.lookup("HELLO", Some("adele")).await.unwrap(), "Hello, it's me");
        assert_eq!(
            source.lookup("Hello", Some("Lionel Richie")).await.unwrap(),
            "Is it me you're looking for"
        );
        assert_eq!(source.lookup("yesterday", None).await.unwrap(), "All my troubles");
    }

    #[tokio::test]
    async fn misses_are_not_found() {
        let dir = fixture();
        let source = LocalLyricsDir::new(dir.path());

        assert!(source.lookup("Hello", Some("Someone Else")).await.unwrap_err().is_not_found());
        assert!(source.lookup("Unknown Song", None).await.unwrap_err().is_not_found());
        assert!(source.lookup("Blank", None).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn missing_directory_is_empty() {
        let source = LocalLyricsDir::new("/tmp/nonexistent_lyrics_dir_moodify_test");
        assert!(source.is_empty().await);
        assert!(source.lookup("Imagine", None).await.is_err());
    }
}
