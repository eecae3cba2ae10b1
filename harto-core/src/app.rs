//! Application state: the single object the presentation layer holds.
//!
//! It owns the store, the clock, the active region and the merged task set, runs
//! resets before every read of completion state, and turns user actions into
//! store writes.

use anyhow::{Result, bail};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use crate::calendar::{Calendar, Clock, DateKey};
use crate::completion::{CompletionMap, CompletionStore};
use crate::custom::{self, CustomTaskPatch, NewCustomTask};
use crate::prefs::{Prefs, Theme, ViewMode};
use crate::progress;
use crate::region::{Region, TimeSlot};
use crate::reset::apply_resets;
use crate::storage::KeyValueStore;
use crate::task::{Pack, TaskDef, TaskLookup, TaskSet};
use crate::visibility::{Environment, Visibility, is_expiry_day, visibility};

/// What `reset_completed_in_pack` clears.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResetScope {
    All,
    Pack(Pack),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CardState {
    Pending,
    Completed,
    Inactive,
}

/// One visible card as the presentation layer needs it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardView {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub pack: Pack,
    /// Grouping for display; differs from `pack` in the weekly merge window and on expiry day.
    pub display_pack: Pack,
    pub state: CardState,
    pub steps: u32,
    pub steps_completed: u32,
    pub custom: bool,
}

impl CardView {
    pub fn is_completed(&self) -> bool {
        self.state == CardState::Completed
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Board {
    pub region: Region,
    pub today: DateKey,
    pub week_start: DateKey,
    pub slot: TimeSlot,
    pub weekly_merge_window: bool,
    pub pending: Vec<CardView>,
    pub completed: Vec<CardView>,
    pub inactive: Vec<CardView>,
    /// Pending cards per display pack, for badges.
    pub pending_counts: BTreeMap<Pack, usize>,
}

pub struct Harto<S: KeyValueStore, C: Clock> {
    store: S,
    clock: C,
    region: Region,
    content: Vec<TaskDef>,
    custom: Vec<TaskDef>,
    tasks: TaskSet,
    season: Option<String>,
    weather_by_slot: HashMap<TimeSlot, String>,
}

impl<S: KeyValueStore, C: Clock> Harto<S, C> {
    /// Load persisted region and custom tasks. Content arrives later via `load_content`.
    pub fn open(store: S, clock: C) -> Self {
        let region = Prefs::region(&store);
        let custom = custom::load(&store);
        let tasks = TaskSet::merge(&[], &custom);
        Self {
            store,
            clock,
            region,
            content: Vec::new(),
            custom,
            tasks,
            season: None,
            weather_by_slot: HashMap::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn region(&self) -> Region {
        self.region
    }

    pub fn calendar(&self) -> Calendar {
        Calendar::at(self.region, &self.clock)
    }

    pub fn tasks(&self) -> &TaskSet {
        &self.tasks
    }

    pub fn custom_tasks(&self) -> &[TaskDef] {
        &self.custom
    }

    pub fn load_content(&mut self, cards: Vec<TaskDef>) {
        self.content = cards;
        self.rebuild();
    }

    pub fn set_environment(&mut self, season: Option<String>, weather_by_slot: HashMap<TimeSlot, String>) {
        self.season = season;
        self.weather_by_slot = weather_by_slot;
    }

    pub fn environment(&self) -> Environment {
        Environment {
            season: self.season.clone(),
            weather_by_slot: self.weather_by_slot.clone(),
            current_slot: self.calendar().slot(),
        }
    }

    fn rebuild(&mut self) {
        self.tasks = TaskSet::merge(&self.content, &self.custom);
    }

    fn reload_custom(&mut self) {
        self.custom = custom::load(&self.store);
        self.rebuild();
    }

    fn require_task(&self, task_id: &str) -> Result<&TaskDef> {
        match self.tasks.task(task_id) {
            Some(t) => Ok(t),
            None => bail!("unknown task: {task_id}"),
        }
    }

    /// Completion map for the active region with stale records purged.
    pub fn completions(&mut self) -> CompletionMap {
        let cal = self.calendar();
        let mut map = CompletionStore::get(&self.store, self.region);
        if apply_resets(&mut map, &self.tasks, &cal) {
            CompletionStore::set(&mut self.store, self.region, &map);
        }
        map
    }

    pub fn is_completed(&mut self, task_id: &str) -> bool {
        let map = self.completions();
        progress::is_completed(task_id, &map, &self.tasks, &self.calendar())
    }

    pub fn steps_completed(&mut self, task_id: &str) -> u32 {
        let map = self.completions();
        progress::current_steps(task_id, &map, &self.tasks, &self.calendar())
    }

    pub fn complete(&mut self, task_id: &str) -> Result<()> {
        self.require_task(task_id)?;
        let cal = self.calendar();
        let mut map = self.completions();
        progress::complete(&mut map, task_id, &self.tasks, &cal, self.clock.timestamp_millis());
        CompletionStore::set(&mut self.store, self.region, &map);
        tracing::info!(id = task_id, region = %self.region, "task completed");
        Ok(())
    }

    /// Works for orphaned ids too.
    pub fn uncomplete(&mut self, task_id: &str) -> bool {
        let mut map = self.completions();
        let removed = progress::uncomplete(&mut map, task_id);
        if removed {
            CompletionStore::set(&mut self.store, self.region, &map);
            tracing::info!(id = task_id, region = %self.region, "task reverted");
        }
        removed
    }

    /// Returns true when the toggle brought the task to full completion.
    pub fn toggle_step(&mut self, task_id: &str, step_index: u32) -> Result<bool> {
        let task = self.require_task(task_id)?;
        if !task.is_stepped() {
            tracing::debug!(id = task_id, "toggle_step on single-action task ignored");
            return Ok(false);
        }
        if step_index >= task.steps {
            bail!("step {step_index} out of range for {task_id} ({} steps)", task.steps);
        }
        let cal = self.calendar();
        let mut map = self.completions();
        let done = progress::toggle_step(
            &mut map,
            task_id,
            step_index,
            &self.tasks,
            &cal,
            self.clock.timestamp_millis(),
        );
        CompletionStore::set(&mut self.store, self.region, &map);
        Ok(done)
    }

    pub fn add_custom_task(&mut self, input: NewCustomTask) -> Result<TaskDef> {
        let t = custom::add(&mut self.store, input)?;
        self.reload_custom();
        Ok(t)
    }

    /// A step count change rewrites the card's record in the active region so stored
    /// progress never exceeds the new count.
    pub fn update_custom_task(&mut self, id: &str, patch: CustomTaskPatch) -> Result<TaskDef> {
        let old_steps = self.custom.iter().find(|t| t.id == id).map(|t| t.steps);
        let t = custom::update(&mut self.store, id, patch)?;
        self.reload_custom();

        if let Some(old) = old_steps.filter(|old| *old != t.steps) {
            let mut map = CompletionStore::get(&self.store, self.region);
            if progress::rescale_steps(&mut map, &t.id, old, t.steps) {
                CompletionStore::set(&mut self.store, self.region, &map);
                tracing::debug!(id = %t.id, from = old, to = t.steps, "step progress rescaled");
            }
        }
        Ok(t)
    }

    pub fn delete_custom_task(&mut self, id: &str) -> Result<TaskDef> {
        let t = custom::delete(&mut self.store, id)?;
        self.reload_custom();
        Ok(t)
    }

    pub fn set_custom_task_active(&mut self, id: &str, active: bool) -> Result<TaskDef> {
        let t = custom::set_active(&mut self.store, id, active)?;
        self.reload_custom();
        Ok(t)
    }

    /// Switches the visible completion scope. Nothing is migrated between regions.
    pub fn switch_region(&mut self, region: Region) {
        if region != self.region {
            tracing::info!(from = %self.region, to = %region, "region switched");
        }
        self.region = region;
        Prefs::set_region(&mut self.store, region);
    }

    /// Clear completions in the active region. Returns the number of records removed.
    ///
    /// A pack scope matches the task's native pack; orphaned records only go with `All`.
    pub fn reset_completed_in_pack(&mut self, scope: ResetScope) -> usize {
        let mut map = self.completions();
        let before = map.len();
        match &scope {
            ResetScope::All => map.clear(),
            ResetScope::Pack(pack) => {
                let tasks = &self.tasks;
                map.retain(|id, _| tasks.task(id).is_none_or(|t| t.pack != *pack));
            }
        }
        let removed = before - map.len();
        if removed > 0 {
            CompletionStore::set(&mut self.store, self.region, &map);
        }
        tracing::info!(?scope, removed, "completions reset");
        removed
    }

    pub fn pending_order(&self) -> Vec<String> {
        Prefs::pending_order(&self.store)
    }

    pub fn set_pending_order(&mut self, ids: Vec<String>) {
        Prefs::set_pending_order(&mut self.store, &ids);
    }

    pub fn show_inactive(&self) -> bool {
        Prefs::show_inactive(&self.store)
    }

    pub fn set_show_inactive(&mut self, on: bool) {
        Prefs::set_show_inactive(&mut self.store, on);
    }

    pub fn theme(&self) -> Theme {
        Prefs::theme(&self.store)
    }

    pub fn set_theme(&mut self, theme: Theme) {
        Prefs::set_theme(&mut self.store, theme);
    }

    pub fn view_mode(&self) -> ViewMode {
        Prefs::view_mode(&self.store)
    }

    pub fn set_view_mode(&mut self, view: ViewMode) {
        Prefs::set_view_mode(&mut self.store, view);
    }

    pub fn display_pack(&self, task: &TaskDef, cal: &Calendar) -> Pack {
        if task.pack == Pack::Weekly && cal.in_weekly_merge_window() {
            return Pack::Daily;
        }
        if is_expiry_day(task, &cal.today()) {
            return Pack::Daily;
        }
        task.pack.clone()
    }

    /// Everything the presentation layer renders in one pass.
    pub fn board(&mut self) -> Board {
        let map = self.completions();
        let cal = self.calendar();
        let today = cal.today();
        let env = self.environment();
        let show_inactive = self.show_inactive();

        let mut pending = Vec::new();
        let mut completed = Vec::new();
        let mut inactive = Vec::new();

        for task in self.tasks.iter() {
            let vis = visibility(task, &env, &today, show_inactive);
            if !vis.is_shown() {
                continue;
            }
            let done = progress::is_completed(&task.id, &map, &self.tasks, &cal);
            let state = match (vis, done) {
                (Visibility::Inactive, _) => CardState::Inactive,
                (_, true) => CardState::Completed,
                _ => CardState::Pending,
            };
            let view = CardView {
                id: task.id.clone(),
                title: task.title.clone(),
                description: task.description.clone(),
                image: task.image.clone(),
                pack: task.pack.clone(),
                display_pack: self.display_pack(task, &cal),
                state,
                steps: task.steps,
                steps_completed: progress::current_steps(&task.id, &map, &self.tasks, &cal),
                custom: task.custom,
            };
            match state {
                CardState::Pending => pending.push(view),
                CardState::Completed => completed.push(view),
                CardState::Inactive => inactive.push(view),
            }
        }

        let order = self.pending_order();
        let rank = |id: &str| order.iter().position(|o| o == id).unwrap_or(usize::MAX);
        let tasks = &self.tasks;
        pending.sort_by_key(|v| (rank(&v.id), tasks.position(&v.id).unwrap_or(usize::MAX)));

        let mut pending_counts = BTreeMap::new();
        for v in &pending {
            *pending_counts.entry(v.display_pack.clone()).or_insert(0) += 1;
        }

        Board {
            region: self.region,
            today,
            week_start: cal.week_start(),
            slot: cal.slot(),
            weekly_merge_window: cal.in_weekly_merge_window(),
            pending,
            completed,
            inactive,
            pending_counts,
        }
    }
}
