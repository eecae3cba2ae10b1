use harto_core::storage::{load_json, persist_or_warn};
use harto_core::{Clock, Harto, KeyValueStore};
use harto_feed::{ContentFeed, ContentSnapshot};

use crate::config::Config;

pub const CONTENT_CACHE_KEY: &str = "harto_content_cache";

/// Fetch fresh content, falling back per document to the last cached snapshot.
///
/// With `offline`, only the cache is used.
pub async fn load_snapshot<S: KeyValueStore>(cfg: &Config, store: &mut S, offline: bool) -> ContentSnapshot {
    let cached: ContentSnapshot = load_json(store, CONTENT_CACHE_KEY);
    if offline {
        return cached;
    }

    let feed = ContentFeed::new(cfg.feed.base_url.clone(), cfg.feed.paths.clone());
    let fresh = feed.fetch_snapshot().await;
    let merged = merge_with_cache(fresh, cached);
    persist_or_warn(store, CONTENT_CACHE_KEY, &merged);
    merged
}

/// Replace each failed document with its cached copy.
pub fn merge_with_cache(mut fresh: ContentSnapshot, cached: ContentSnapshot) -> ContentSnapshot {
    for doc in &fresh.failed {
        match doc.as_str() {
            "cards" => fresh.catalog = cached.catalog.clone(),
            "weather" => fresh.weather = cached.weather.clone(),
            "tracker" => fresh.tracker = cached.tracker.clone(),
            "guides" => fresh.guides = cached.guides.clone(),
            _ => {}
        }
    }
    if !fresh.failed.is_empty() {
        tracing::info!(stale = ?fresh.failed, "using cached content for failed documents");
    }
    fresh
}

pub fn apply_snapshot<S: KeyValueStore, C: Clock>(app: &mut Harto<S, C>, snapshot: &ContentSnapshot) {
    app.load_content(snapshot.catalog.cards.clone());
    app.set_environment(snapshot.weather.season.clone(), snapshot.weather.by_slot());
}
