//! harto-core: completion/reset state machine for the Harto card checklist.
//!
//! Everything here is synchronous and pure with respect to the injected store and
//! clock. Content fetching lives in `harto-feed`; rendering in `harto-cli`.

pub mod app;
pub mod calendar;
pub mod completion;
pub mod custom;
pub mod prefs;
pub mod progress;
pub mod region;
pub mod reset;
pub mod storage;
pub mod task;
pub mod visibility;

pub use app::{Board, CardState, CardView, Harto, ResetScope};
pub use calendar::{
    Calendar, Clock, DateKey, FixedClock, LocalClock, ZonedClock, effective_today,
    effective_week_start, is_weekly_merge_window, time_slot,
};
pub use completion::{CompletionMap, CompletionRecord, CompletionStore};
pub use custom::{CustomTaskError, CustomTaskPatch, NewCustomTask};
pub use prefs::{Prefs, Theme, ViewMode};
pub use region::{Region, TimeSlot};
pub use reset::{apply_resets, date_key_for, is_stale};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use task::{Pack, TaskDef, TaskLookup, TaskSet};
pub use visibility::{Environment, Visibility, is_visible, visibility};
