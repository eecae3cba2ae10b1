//! Completion records and the region-scoped completion store.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::calendar::DateKey;
use crate::region::Region;
use crate::storage::{KeyValueStore, load_json, persist_or_warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionRecord {
    /// Epoch stamp; a day key for daily packs, a week-start key for Weekly.
    pub date: DateKey,
    /// Last-modified instant (epoch millis). Informational only.
    #[serde(default)]
    pub timestamp: i64,
    /// Present only for stepped tasks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps_completed: Option<u32>,
}

impl CompletionRecord {
    pub fn new(date: DateKey, timestamp: i64) -> Self {
        Self {
            date,
            timestamp,
            steps_completed: None,
        }
    }

    pub fn with_steps(mut self, steps_completed: u32) -> Self {
        self.steps_completed = Some(steps_completed);
        self
    }
}

/// Task id -> record. Ordered so serialized state is stable.
pub type CompletionMap = BTreeMap<String, CompletionRecord>;

/// Persisted completion maps, one storage key per region.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompletionStore;

impl CompletionStore {
    pub fn key(region: Region) -> &'static str {
        match region {
            Region::Sea => "harto_completions",
            Region::Tw => "harto_completions_tw",
        }
    }

    /// Missing or corrupt data reads as an empty map.
    pub fn get<S: KeyValueStore + ?Sized>(store: &S, region: Region) -> CompletionMap {
        load_json(store, Self::key(region))
    }

    /// Single whole-map write. Failures are logged, not propagated.
    pub fn set<S: KeyValueStore + ?Sized>(store: &mut S, region: Region, map: &CompletionMap) -> bool {
        persist_or_warn(store, Self::key(region), map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use pretty_assertions::assert_eq;

    #[test]
    fn record_json_shape_matches_persisted_format() {
        let r = CompletionRecord::new(DateKey::from("2026-02-18"), 1_771_400_000_000).with_steps(2);
        let json = serde_json::to_string(&r).unwrap();
        assert_eq!(
            json,
            r#"{"date":"2026-02-18","timestamp":1771400000000,"stepsCompleted":2}"#
        );

        let plain = CompletionRecord::new(DateKey::from("2026-02-18"), 1);
        assert!(!serde_json::to_string(&plain).unwrap().contains("stepsCompleted"));
    }

    #[test]
    fn regions_use_separate_scopes() {
        let mut s = MemoryStore::new();
        let mut sea = CompletionMap::new();
        sea.insert("a".into(), CompletionRecord::new(DateKey::from("2026-02-18"), 0));
        assert!(CompletionStore::set(&mut s, Region::Sea, &sea));

        assert_eq!(CompletionStore::get(&s, Region::Sea), sea);
        assert!(CompletionStore::get(&s, Region::Tw).is_empty());
    }

    #[test]
    fn corrupt_scope_reads_empty() {
        let mut s = MemoryStore::new();
        s.set(CompletionStore::key(Region::Sea), "not json").unwrap();
        assert!(CompletionStore::get(&s, Region::Sea).is_empty());
    }
}
