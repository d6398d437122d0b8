//! Fetch lyrics for one song through each configured source, for debugging.
//!
//! Usage: cargo run --bin fetch_lyrics -- --title "Imagine" [--artist "John Lennon"]

use anyhow::{bail, Result};

use moodify::config::Config;
use moodify::lyrics::{strip_section_markers, LyricsOvhClient, LyricsProvider};

fn arg(name: &str) -> Option<String> {
    std::env::args()
        .position(|a| a == name)
        .and_then(|i| std::env::args().nth(i + 1))
}

#[tokio::main]
async fn main() -> Result<()> {
    let Some(title) = arg("--title") else {
        bail!("missing --title");
    };
    let artist = arg("--artist");

    let config = Config::load()?;
    println!("=== Config ===");
    println!("  api:     {}", config.lyrics_api_base);
    println!("  timeout: {:?}", config.request_timeout);
    println!(
        "  dir:     {}",
        config.lyrics_dir.as_ref().map_or_else(|| "-".to_string(), |d| d.display().to_string())
    );

    println!("\n=== lyrics.ovh ===");
    let client = LyricsOvhClient::new(&config);
    println!("  url: {}", client.lyrics_url(&title, artist.as_deref()));
    match client.fetch(&title, artist.as_deref()).await {
        Ok(raw) => {
            let cleaned = strip_section_markers(&raw);
            println!("  {} bytes raw, {} bytes cleaned", raw.len(), cleaned.len());
        }
        Err(e) => println!("  error: {e}"),
    }

    println!("\n=== Provider ===");
    let provider = LyricsProvider::from_config(&config);
    println!("  sources: {}", provider.source_names().join(" -> "));
    match provider.fetch_lyrics(&title, artist.as_deref()).await {
        Some(lyrics) => {
            let result = config.classifier()?.classify(&lyrics.text);
            println!("  origin: {}", lyrics.origin);
            println!("  mood:   {} {:?}", result.mood, result.matched_keywords);
            println!("\n{}", lyrics.text);
        }
        None => println!("  no lyrics"),
    }

    Ok(())
}
