//! Task definitions ("cards"), packs, and the merged working task set.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Task category. Governs reset cadence and grouping.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Pack {
    Daily,
    DailyNpc,
    Weekly,
    GiftCodes,
    Others,
    /// Historical pack; behaves like Others.
    Seasonal,
    /// Anything the content feed introduces later. Never resets.
    Other(String),
}

impl Pack {
    /// Board order.
    pub const DISPLAY_ORDER: [Pack; 5] = [
        Pack::Daily,
        Pack::DailyNpc,
        Pack::Weekly,
        Pack::GiftCodes,
        Pack::Others,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Pack::Daily => "Daily",
            Pack::DailyNpc => "Daily-NPC",
            Pack::Weekly => "Weekly",
            Pack::GiftCodes => "Gift Codes",
            Pack::Others => "Others",
            Pack::Seasonal => "Seasonal",
            Pack::Other(s) => s,
        }
    }

    pub fn is_daily(&self) -> bool {
        matches!(self, Pack::Daily | Pack::DailyNpc)
    }

    /// Lenient parse for user input: case and separators are ignored.
    pub fn parse_loose(s: &str) -> Pack {
        let norm: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match norm.as_str() {
            "daily" => Pack::Daily,
            "dailynpc" | "npc" => Pack::DailyNpc,
            "weekly" => Pack::Weekly,
            "giftcodes" | "giftcode" | "codes" => Pack::GiftCodes,
            "others" | "other" => Pack::Others,
            "seasonal" => Pack::Seasonal,
            _ => Pack::Other(s.trim().to_string()),
        }
    }
}

impl From<String> for Pack {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Daily" => Pack::Daily,
            "Daily-NPC" => Pack::DailyNpc,
            "Weekly" => Pack::Weekly,
            "Gift Codes" => Pack::GiftCodes,
            "Others" => Pack::Others,
            "Seasonal" => Pack::Seasonal,
            _ => Pack::Other(s),
        }
    }
}

impl From<Pack> for String {
    fn from(p: Pack) -> Self {
        p.as_str().to_string()
    }
}

impl fmt::Display for Pack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_true() -> bool {
    true
}

/// A card as published by the content feed, or authored by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDef {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub pack: Pack,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// 0 = single action; otherwise the number of sequential steps.
    #[serde(default)]
    pub steps: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,

    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default)]
    pub time_limited: bool,
    /// `YYYY-MM-DD`; last effective day the task is shown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<String>,

    #[serde(default)]
    pub custom: bool,
}

impl TaskDef {
    pub fn new(id: impl Into<String>, title: impl Into<String>, pack: Pack) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            pack,
            image: None,
            steps: 0,
            season: None,
            weather: None,
            time: None,
            active: true,
            time_limited: false,
            expiry_date: None,
            custom: false,
        }
    }

    pub fn with_steps(mut self, steps: u32) -> Self {
        self.steps = steps;
        self
    }

    pub fn with_season(mut self, season: impl Into<String>) -> Self {
        self.season = Some(season.into());
        self
    }

    pub fn with_weather(mut self, weather: impl Into<String>) -> Self {
        self.weather = Some(weather.into());
        self
    }

    pub fn with_time(mut self, time: impl Into<String>) -> Self {
        self.time = Some(time.into());
        self
    }

    pub fn with_expiry(mut self, expiry_date: impl Into<String>) -> Self {
        self.time_limited = true;
        self.expiry_date = Some(expiry_date.into());
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    pub fn is_stepped(&self) -> bool {
        self.steps > 0
    }
}

/// Resolves task definitions by id. Injected into every policy/evaluator call.
pub trait TaskLookup {
    fn task(&self, id: &str) -> Option<&TaskDef>;
}

impl TaskLookup for HashMap<String, TaskDef> {
    fn task(&self, id: &str) -> Option<&TaskDef> {
        self.get(id)
    }
}

impl TaskLookup for [TaskDef] {
    fn task(&self, id: &str) -> Option<&TaskDef> {
        self.iter().find(|t| t.id == id)
    }
}

impl TaskLookup for Vec<TaskDef> {
    fn task(&self, id: &str) -> Option<&TaskDef> {
        self.as_slice().task(id)
    }
}

/// Content tasks followed by custom tasks, indexed by id.
///
/// On an id collision the content task wins.
#[derive(Debug, Clone, Default)]
pub struct TaskSet {
    tasks: Vec<TaskDef>,
    idx: HashMap<String, usize>,
}

impl TaskSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn merge(content: &[TaskDef], custom: &[TaskDef]) -> Self {
        let mut set = Self::new();
        for t in content.iter().chain(custom) {
            set.push(t.clone());
        }
        set
    }

    fn push(&mut self, task: TaskDef) {
        if self.idx.contains_key(&task.id) {
            tracing::debug!(id = %task.id, "duplicate task id ignored");
            return;
        }
        self.idx.insert(task.id.clone(), self.tasks.len());
        self.tasks.push(task);
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TaskDef> {
        self.tasks.iter()
    }

    /// Catalog position, used as the default pending order.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.idx.get(id).copied()
    }
}

impl TaskLookup for TaskSet {
    fn task(&self, id: &str) -> Option<&TaskDef> {
        self.idx.get(id).map(|&i| &self.tasks[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_round_trips_feed_spelling() {
        for (raw, pack) in [
            ("\"Daily-NPC\"", Pack::DailyNpc),
            ("\"Gift Codes\"", Pack::GiftCodes),
            ("\"Seasonal\"", Pack::Seasonal),
        ] {
            let p: Pack = serde_json::from_str(raw).unwrap();
            assert_eq!(p, pack);
            assert_eq!(serde_json::to_string(&p).unwrap(), raw);
        }
        let p: Pack = serde_json::from_str("\"Event\"").unwrap();
        assert_eq!(p, Pack::Other("Event".into()));
    }

    #[test]
    fn parse_loose_accepts_cli_spellings() {
        assert_eq!(Pack::parse_loose("daily-npc"), Pack::DailyNpc);
        assert_eq!(Pack::parse_loose("gift_codes"), Pack::GiftCodes);
        assert_eq!(Pack::parse_loose("WEEKLY"), Pack::Weekly);
    }

    #[test]
    fn task_def_defaults_from_sparse_json() {
        let t: TaskDef = serde_json::from_str(r#"{"id":"a","title":"A","pack":"Daily"}"#).unwrap();
        assert!(t.active);
        assert_eq!(t.steps, 0);
        assert!(!t.time_limited);
        assert!(!t.custom);

        let t: TaskDef = serde_json::from_str(
            r#"{"id":"b","pack":"Weekly","steps":3,"timeLimited":true,"expiryDate":"2026-03-01","active":false}"#,
        )
        .unwrap();
        assert_eq!(t.steps, 3);
        assert_eq!(t.expiry_date.as_deref(), Some("2026-03-01"));
        assert!(!t.active);
    }

    #[test]
    fn merged_set_prefers_content_on_collision() {
        let content = vec![TaskDef::new("x", "content", Pack::Daily)];
        let mut custom = TaskDef::new("x", "custom", Pack::Others);
        custom.custom = true;
        let set = TaskSet::merge(&content, &[custom, TaskDef::new("y", "y", Pack::Others)]);
        assert_eq!(set.len(), 2);
        assert_eq!(set.task("x").unwrap().title, "content");
        assert_eq!(set.position("y"), Some(1));
    }
}
