//! Visibility filter: whether a card is shown at all, independent of completion.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::calendar::DateKey;
use crate::region::TimeSlot;
use crate::task::TaskDef;

const WILDCARDS: [&str; 3] = ["always", "any", "all"];

/// Environment snapshot the filter checks cards against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    pub season: Option<String>,
    pub weather_by_slot: HashMap<TimeSlot, String>,
    pub current_slot: TimeSlot,
}

impl Environment {
    pub fn new(current_slot: TimeSlot) -> Self {
        Self {
            season: None,
            weather_by_slot: HashMap::new(),
            current_slot,
        }
    }

    pub fn with_season(mut self, season: impl Into<String>) -> Self {
        self.season = Some(season.into());
        self
    }

    pub fn with_weather(mut self, slot: TimeSlot, weather: impl Into<String>) -> Self {
        self.weather_by_slot.insert(slot, weather.into());
        self
    }

    pub fn current_weather(&self) -> Option<&str> {
        self.weather_by_slot.get(&self.current_slot).map(String::as_str)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Hidden,
    Visible,
    /// Deactivated custom card shown only so it can be reactivated.
    Inactive,
}

impl Visibility {
    pub fn is_shown(self) -> bool {
        self != Visibility::Hidden
    }
}

fn is_wildcard(tag: Option<&str>) -> bool {
    match tag.map(str::trim) {
        None | Some("") => true,
        Some(t) => WILDCARDS.iter().any(|w| t.eq_ignore_ascii_case(w)),
    }
}

fn matches(tag: Option<&str>, actual: Option<&str>) -> bool {
    if is_wildcard(tag) {
        return true;
    }
    match (tag, actual) {
        (Some(t), Some(a)) => t.trim().eq_ignore_ascii_case(a.trim()),
        _ => false,
    }
}

/// True once `today` is strictly past the card's expiry date.
pub fn is_expired(task: &TaskDef, today: &DateKey) -> bool {
    if !task.time_limited {
        return false;
    }
    let Some(expiry) = task.expiry_date.as_deref() else {
        return false;
    };
    match (DateKey::from(expiry).to_date(), today.to_date()) {
        (Some(expiry), Some(today)) => today > expiry,
        _ => {
            tracing::debug!(id = %task.id, expiry, "unparseable expiry date; treating as open-ended");
            false
        }
    }
}

/// Time-limited card on its last visible day.
pub fn is_expiry_day(task: &TaskDef, today: &DateKey) -> bool {
    task.time_limited
        && task
            .expiry_date
            .as_deref()
            .and_then(|e| DateKey::from(e).to_date())
            .zip(today.to_date())
            .is_some_and(|(expiry, today)| expiry == today)
}

pub fn visibility(task: &TaskDef, env: &Environment, today: &DateKey, show_inactive: bool) -> Visibility {
    if !task.active {
        return if task.custom && show_inactive {
            Visibility::Inactive
        } else {
            Visibility::Hidden
        };
    }
    if is_expired(task, today) {
        return Visibility::Hidden;
    }
    if !matches(task.season.as_deref(), env.season.as_deref()) {
        return Visibility::Hidden;
    }
    if !matches(task.weather.as_deref(), env.current_weather()) {
        return Visibility::Hidden;
    }
    if !matches(task.time.as_deref(), Some(env.current_slot.as_str())) {
        return Visibility::Hidden;
    }
    Visibility::Visible
}

/// Shown as a normal (pending or completed) card.
pub fn is_visible(task: &TaskDef, env: &Environment, today: &DateKey) -> bool {
    visibility(task, env, today, false) == Visibility::Visible
}
