//! Pure parsers for the content documents.
//!
//! The catalog parser is lenient per card: one malformed entry is skipped with a
//! warning instead of dropping the whole deck.

use anyhow::{Context, Result};
use harto_core::TaskDef;
use serde::Deserialize;

use crate::model::{CardCatalog, GuideBook, TrackerSnapshot, WeatherReport};

/// Resolve a relative asset path against the content base URL.
pub fn resolve_asset(base_url: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

pub fn parse_catalog(text: &str, base_url: &str) -> Result<CardCatalog> {
    #[derive(Deserialize)]
    struct Raw {
        #[serde(default)]
        cards: Vec<serde_json::Value>,
    }

    let raw: Raw = serde_json::from_str(text).context("parse card catalog")?;
    let mut cards = Vec::with_capacity(raw.cards.len());

    for (i, v) in raw.cards.into_iter().enumerate() {
        match serde_json::from_value::<TaskDef>(v) {
            Ok(mut card) => {
                if let Some(img) = card.image.as_deref().filter(|s| !s.is_empty()) {
                    card.image = Some(resolve_asset(base_url, img));
                }
                cards.push(card);
            }
            Err(e) => tracing::warn!(index = i, error = %e, "skipping malformed card"),
        }
    }

    Ok(CardCatalog { cards })
}

pub fn parse_weather(text: &str) -> Result<WeatherReport> {
    serde_json::from_str(text).context("parse weather report")
}

pub fn parse_tracker(text: &str) -> Result<TrackerSnapshot> {
    serde_json::from_str(text).context("parse tracker snapshot")
}

pub fn parse_guides(text: &str) -> Result<GuideBook> {
    serde_json::from_str(text).context("parse guides")
}
