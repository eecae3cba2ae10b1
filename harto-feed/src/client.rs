//! HTTP fetch of the content documents.
//!
//! Fire-and-forget: no retries, no timeout beyond the client default. A failed
//! document degrades to its empty default in the snapshot.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::model::{CardCatalog, ContentSnapshot, GuideBook, TrackerSnapshot, WeatherReport};
use crate::parse::{parse_catalog, parse_guides, parse_tracker, parse_weather};

pub const DEFAULT_BASE_URL: &str = "https://cdn.jsdelivr.net/gh/demo0ne/harto-data@main";

/// Document paths relative to the base URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedPaths {
    pub cards: String,
    pub weather: String,
    pub tracker: String,
    pub guides: String,
}

impl Default for FeedPaths {
    fn default() -> Self {
        Self {
            cards: "cards/data.json".to_string(),
            weather: "weather/data.json".to_string(),
            tracker: "tracker/data.json".to_string(),
            guides: "guides/data.json".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ContentFeed {
    base_url: String,
    paths: FeedPaths,
    client: reqwest::Client,
}

impl ContentFeed {
    pub fn new(base_url: impl Into<String>, paths: FeedPaths) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            paths,
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn fetch_text(&self, path: &str) -> Result<String> {
        let url = self.url(path);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("GET {url}"))?;

        let status = resp.status();
        if !status.is_success() {
            bail!("content fetch failed: {status} {url}");
        }
        resp.text().await.with_context(|| format!("read body of {url}"))
    }

    pub async fn fetch_catalog(&self) -> Result<CardCatalog> {
        let text = self.fetch_text(&self.paths.cards).await?;
        parse_catalog(&text, &self.base_url)
    }

    pub async fn fetch_weather(&self) -> Result<WeatherReport> {
        parse_weather(&self.fetch_text(&self.paths.weather).await?)
    }

    pub async fn fetch_tracker(&self) -> Result<TrackerSnapshot> {
        parse_tracker(&self.fetch_text(&self.paths.tracker).await?)
    }

    pub async fn fetch_guides(&self) -> Result<GuideBook> {
        parse_guides(&self.fetch_text(&self.paths.guides).await?)
    }

    /// Fetch all four documents concurrently; failures become empty documents.
    pub async fn fetch_snapshot(&self) -> ContentSnapshot {
        let (catalog, weather, tracker, guides) = tokio::join!(
            self.fetch_catalog(),
            self.fetch_weather(),
            self.fetch_tracker(),
            self.fetch_guides(),
        );

        let mut failed = Vec::new();
        let snapshot = ContentSnapshot {
            catalog: or_empty("cards", catalog, &mut failed),
            weather: or_empty("weather", weather, &mut failed),
            tracker: or_empty("tracker", tracker, &mut failed),
            guides: or_empty("guides", guides, &mut failed),
            failed,
        };
        tracing::debug!(
            cards = snapshot.catalog.cards.len(),
            failed = ?snapshot.failed,
            "content snapshot fetched"
        );
        snapshot
    }
}

fn or_empty<T: Default>(name: &str, res: Result<T>, failed: &mut Vec<String>) -> T {
    match res {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(document = name, error = %format!("{e:#}"), "content unavailable");
            failed.push(name.to_string());
            T::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_join_cleanly() {
        let feed = ContentFeed::new("https://cdn.example.test/data/", FeedPaths::default());
        assert_eq!(feed.base_url(), "https://cdn.example.test/data");
        assert_eq!(feed.url("/cards/data.json"), "https://cdn.example.test/data/cards/data.json");
    }

    #[tokio::test]
    async fn test_unreachable_feed_degrades_to_empty_snapshot() {
        // Port 9 (discard) on loopback refuses connections.
        let feed = ContentFeed::new("http://127.0.0.1:9", FeedPaths::default());
        let snap = feed.fetch_snapshot().await;
        assert!(snap.catalog.cards.is_empty());
        assert_eq!(snap.failed, vec!["cards", "weather", "tracker", "guides"]);
        assert!(!snap.is_complete());
    }
}
