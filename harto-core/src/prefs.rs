//! Small persisted preferences: region, pending order, show-inactive, theme, view.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::region::Region;
use crate::storage::{KeyValueStore, load_json, persist_or_warn};

pub const REGION_KEY: &str = "harto_region";
pub const PENDING_ORDER_KEY: &str = "harto_pending_order";
pub const SHOW_INACTIVE_KEY: &str = "harto_show_inactive";
pub const THEME_KEY: &str = "harto_theme";
pub const VIEW_KEY: &str = "harto_view";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

/// How the board lays out cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Cards,
    List,
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        })
    }
}

impl FromStr for Theme {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => anyhow::bail!("unknown theme '{other}' (expected light or dark)"),
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ViewMode::Cards => "cards",
            ViewMode::List => "list",
        })
    }
}

impl FromStr for ViewMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cards" | "card" => Ok(ViewMode::Cards),
            "list" => Ok(ViewMode::List),
            other => anyhow::bail!("unknown view '{other}' (expected cards or list)"),
        }
    }
}

/// Typed accessors over the preference keys.
pub struct Prefs;

impl Prefs {
    pub fn region<S: KeyValueStore + ?Sized>(store: &S) -> Region {
        load_json(store, REGION_KEY)
    }

    pub fn set_region<S: KeyValueStore + ?Sized>(store: &mut S, region: Region) {
        persist_or_warn(store, REGION_KEY, &region);
    }

    /// User-arranged order of pending cards, by id.
    pub fn pending_order<S: KeyValueStore + ?Sized>(store: &S) -> Vec<String> {
        load_json(store, PENDING_ORDER_KEY)
    }

    pub fn set_pending_order<S: KeyValueStore + ?Sized>(store: &mut S, ids: &[String]) {
        persist_or_warn(store, PENDING_ORDER_KEY, ids);
    }

    pub fn show_inactive<S: KeyValueStore + ?Sized>(store: &S) -> bool {
        load_json(store, SHOW_INACTIVE_KEY)
    }

    pub fn set_show_inactive<S: KeyValueStore + ?Sized>(store: &mut S, on: bool) {
        persist_or_warn(store, SHOW_INACTIVE_KEY, &on);
    }

    pub fn theme<S: KeyValueStore + ?Sized>(store: &S) -> Theme {
        load_json(store, THEME_KEY)
    }

    pub fn set_theme<S: KeyValueStore + ?Sized>(store: &mut S, theme: Theme) {
        persist_or_warn(store, THEME_KEY, &theme);
    }

    pub fn view_mode<S: KeyValueStore + ?Sized>(store: &S) -> ViewMode {
        load_json(store, VIEW_KEY)
    }

    pub fn set_view_mode<S: KeyValueStore + ?Sized>(store: &mut S, view: ViewMode) {
        persist_or_warn(store, VIEW_KEY, &view);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn defaults_when_unset_or_corrupt() {
        let mut s = MemoryStore::new();
        assert_eq!(Prefs::region(&s), Region::Sea);
        assert!(!Prefs::show_inactive(&s));
        assert_eq!(Prefs::theme(&s), Theme::Light);

        s.set(THEME_KEY, "\"neon\"").unwrap();
        assert_eq!(Prefs::theme(&s), Theme::Light);
    }

    #[test]
    fn values_persist() {
        let mut s = MemoryStore::new();
        Prefs::set_region(&mut s, Region::Tw);
        Prefs::set_view_mode(&mut s, ViewMode::List);
        Prefs::set_pending_order(&mut s, &["b".to_string(), "a".to_string()]);
        assert_eq!(Prefs::region(&s), Region::Tw);
        assert_eq!(Prefs::view_mode(&s), ViewMode::List);
        assert_eq!(Prefs::pending_order(&s), vec!["b", "a"]);
    }
}
