//! lyrics.ovh web service client.
//!
//! Lyrics come from `GET <base>/<artist>/<title>` as `{"lyrics": "..."}`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::config::Config;
use crate::constants::lyrics::ARTIST_PLACEHOLDER;
use crate::error::{Error, Result};
use crate::lyrics::LyricsSource;

/// Successful lyrics.ovh payload. Failures carry an `error` field instead.
#[derive(Debug, Deserialize)]
struct LyricsOvhResponse {
    lyrics: Option<String>,
}

/// Client for the lyrics.ovh `GET /v1/<artist>/<title>` endpoint.
///
/// When an artist is given and that lookup fails, a second request is made
/// with the `various` artist placeholder.
#[derive(Clone)]
pub struct LyricsOvhClient {
    base_url: String,
    client: Client,
}

impl LyricsOvhClient {
    /// Create a client from config
    pub fn new(config: &Config) -> Self {
        Self::with_base_url(&config.lyrics_api_base, config.request_timeout)
    }

    /// Create a client against an explicit base URL, e.g. `https://api.lyrics.ovh/v1`
    pub fn with_base_url(base_url: &str, timeout: Duration) -> Self {
        Self::with_client(
            base_url,
            Client::builder()
                .timeout(timeout)
                .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
                .build()
                .unwrap_or_default(),
        )
    }

    /// Create a client with a preconfigured HTTP client (proxy settings, custom timeout)
    pub fn with_client(base_url: &str, client: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Lookup URL for a title and optional artist, each percent-encoded as one path segment
    pub fn lyrics_url(&self, title: &str, artist: Option<&str>) -> String {
        let artist = artist
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .unwrap_or(ARTIST_PLACEHOLDER);
        format!(
            "{}/{}/{}",
            self.base_url,
            urlencoding::encode(artist),
            urlencoding::encode(title.trim())
        )
    }

    /// Fetch lyrics, retrying once without the artist.
    ///
    /// Network failures are returned at once, so a lookup waits for at most
    /// one request timeout.
    pub async fn fetch(&self, title: &str, artist: Option<&str>) -> Result<String> {
        let has_artist = artist.is_some_and(|a| !a.trim().is_empty());

        match self.get(&self.lyrics_url(title, artist), title, artist).await {
            Ok(lyrics) => Ok(lyrics),
            Err(e) if has_artist && is_retryable(&e) => {
                tracing::debug!("lyrics.ovh lookup with artist failed ({e}), retrying as {ARTIST_PLACEHOLDER:?}");
                self.get(&self.lyrics_url(title, None), title, None).await
            }
            Err(e) => Err(e),
        }
    }

    /// Make a GET request and extract the `lyrics` field
    async fn get(&self, url: &str, title: &str, artist: Option<&str>) -> Result<String> {
        let resp = self.client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| Error::Network(format!("Request to {url} failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::api_status(
                format!("Request to {url} returned {status}"),
                status.as_u16(),
            ));
        }

        let body = resp.text().await
            .map_err(|e| Error::Network(format!("Reading response from {url} failed: {e}")))?;

        parse_lyrics_body(&body)
            .map_err(|e| match e {
                Error::Parse { message, .. } => Error::parse(format!("{message} (from {url})"), None),
                other => other,
            })?
            .ok_or_else(|| Error::not_found(title, artist))
    }
}

/// Whether the service answered but had nothing usable for this artist.
const fn is_retryable(e: &Error) -> bool {
    matches!(e, Error::NotFound { .. } | Error::LyricsApi { .. } | Error::Parse { .. })
}

/// Extract non-blank `lyrics` text from a response body.
///
/// `Ok(None)` means a well-formed body without usable lyrics.
fn parse_lyrics_body(body: &str) -> Result<Option<String>> {
    let parsed: LyricsOvhResponse = serde_json::from_str(body)
        .map_err(|e| Error::parse(format!("Invalid JSON: {e}"), None))?;
    Ok(parsed.lyrics.filter(|l| !l.trim().is_empty()))
}

#[async_trait]
impl LyricsSource for LyricsOvhClient {
    async fn lookup(&self, title: &str, artist: Option<&str>) -> Result<String> {
        self.fetch(title, artist).await
    }

    fn name(&self) -> &'static str {
        "lyrics.ovh"
    }
}
