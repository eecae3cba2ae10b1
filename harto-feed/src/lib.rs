//! harto-feed: the static JSON content source (cards, weather, tracker, guides).

pub mod client;
pub mod model;
pub mod parse;

pub use client::{ContentFeed, DEFAULT_BASE_URL, FeedPaths};
pub use model::{
    CardCatalog, ContentSnapshot, Guide, GuideBook, GuidePage, TrackerItem, TrackerSnapshot,
    WeatherReport,
};
pub use parse::{parse_catalog, parse_guides, parse_tracker, parse_weather, resolve_asset};
