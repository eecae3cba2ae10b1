//! Shapes of the published content documents.

use harto_core::{TaskDef, TimeSlot};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// `cards/data.json`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CardCatalog {
    #[serde(default)]
    pub cards: Vec<TaskDef>,
}

/// `weather/data.json`: current season plus a forecast per time slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherReport {
    #[serde(default)]
    pub season: Option<String>,
    /// Slot name -> weather tag. Unknown slot names are kept but ignored.
    #[serde(default)]
    pub weather: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl WeatherReport {
    pub fn by_slot(&self) -> HashMap<TimeSlot, String> {
        TimeSlot::ALL
            .into_iter()
            .filter_map(|slot| {
                self.weather
                    .iter()
                    .find(|(k, _)| k.eq_ignore_ascii_case(slot.as_str()))
                    .map(|(_, w)| (slot, w.clone()))
            })
            .collect()
    }
}

/// One special item the community tracks (where it spawned, when it was seen).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerItem {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// `tracker/data.json`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackerSnapshot {
    #[serde(default)]
    pub items: Vec<TrackerItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuidePage {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guide {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub pages: Vec<GuidePage>,
}

/// `guides/data.json`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuideBook {
    #[serde(default)]
    pub guides: Vec<Guide>,
}

/// Everything fetched in one refresh. Any document may be empty if its fetch failed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentSnapshot {
    pub catalog: CardCatalog,
    pub weather: WeatherReport,
    pub tracker: TrackerSnapshot,
    pub guides: GuideBook,
    /// Names of documents that failed to load in this refresh.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failed: Vec<String>,
}

impl ContentSnapshot {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}
