//! Custom task manager: user-authored cards persisted as one list.
//!
//! Every operation reads the whole list, modifies it, and writes it back.

use thiserror::Error;
use uuid::Uuid;

use crate::storage::{KeyValueStore, load_json, persist_or_warn};
use crate::task::{Pack, TaskDef};

pub const CUSTOM_TASKS_KEY: &str = "harto_custom_cards";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CustomTaskError {
    #[error("custom task title must not be empty")]
    EmptyTitle,

    #[error("custom task not found: {0}")]
    NotFound(String),
}

/// Form fields for a new custom card.
#[derive(Debug, Clone)]
pub struct NewCustomTask {
    pub title: String,
    pub description: Option<String>,
    pub pack: Pack,
    pub steps: u32,
}

impl NewCustomTask {
    pub fn new(title: impl Into<String>, pack: Pack) -> Self {
        Self {
            title: title.into(),
            description: None,
            pack,
            steps: 0,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_steps(mut self, steps: u32) -> Self {
        self.steps = steps;
        self
    }
}

/// Partial edit. `None` leaves a field unchanged; an empty description clears it.
#[derive(Debug, Clone, Default)]
pub struct CustomTaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub pack: Option<Pack>,
    pub active: Option<bool>,
    pub steps: Option<u32>,
}

fn clean_title(title: &str) -> Result<String, CustomTaskError> {
    let t = title.trim();
    if t.is_empty() {
        return Err(CustomTaskError::EmptyTitle);
    }
    Ok(t.to_string())
}

fn clean_description(description: Option<String>) -> Option<String> {
    description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
}

pub fn generate_id() -> String {
    format!("custom-{}", Uuid::new_v4().simple())
}

pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Vec<TaskDef> {
    let mut tasks: Vec<TaskDef> = load_json(store, CUSTOM_TASKS_KEY);
    for t in &mut tasks {
        t.custom = true;
    }
    tasks
}

fn save<S: KeyValueStore + ?Sized>(store: &mut S, tasks: &[TaskDef]) {
    persist_or_warn(store, CUSTOM_TASKS_KEY, tasks);
}

/// Read-modify-write one card by id.
fn modify<S, F>(store: &mut S, id: &str, f: F) -> Result<TaskDef, CustomTaskError>
where
    S: KeyValueStore + ?Sized,
    F: FnOnce(&mut TaskDef) -> Result<(), CustomTaskError>,
{
    let mut tasks = load(store);
    let task = tasks
        .iter_mut()
        .find(|t| t.id == id)
        .ok_or_else(|| CustomTaskError::NotFound(id.to_string()))?;
    f(task)?;
    let updated = task.clone();
    save(store, &tasks);
    Ok(updated)
}

pub fn add<S: KeyValueStore + ?Sized>(store: &mut S, input: NewCustomTask) -> Result<TaskDef, CustomTaskError> {
    let title = clean_title(&input.title)?;
    let mut task = TaskDef::new(generate_id(), title, input.pack).with_steps(input.steps);
    task.description = clean_description(input.description);
    task.custom = true;

    let mut tasks = load(store);
    tasks.push(task.clone());
    save(store, &tasks);
    tracing::info!(id = %task.id, pack = %task.pack, "custom task added");
    Ok(task)
}

pub fn update<S: KeyValueStore + ?Sized>(
    store: &mut S,
    id: &str,
    patch: CustomTaskPatch,
) -> Result<TaskDef, CustomTaskError> {
    modify(store, id, |t| {
        if let Some(title) = patch.title.as_deref() {
            t.title = clean_title(title)?;
        }
        if patch.description.is_some() {
            t.description = clean_description(patch.description);
        }
        if let Some(pack) = patch.pack {
            t.pack = pack;
        }
        if let Some(active) = patch.active {
            t.active = active;
        }
        if let Some(steps) = patch.steps {
            t.steps = steps;
        }
        Ok(())
    })
}

/// Removes the card. Its completion record, if any, is left as an orphan.
pub fn delete<S: KeyValueStore + ?Sized>(store: &mut S, id: &str) -> Result<TaskDef, CustomTaskError> {
    let mut tasks = load(store);
    let pos = tasks
        .iter()
        .position(|t| t.id == id)
        .ok_or_else(|| CustomTaskError::NotFound(id.to_string()))?;
    let removed = tasks.remove(pos);
    save(store, &tasks);
    tracing::info!(id, "custom task deleted");
    Ok(removed)
}

pub fn set_active<S: KeyValueStore + ?Sized>(
    store: &mut S,
    id: &str,
    active: bool,
) -> Result<TaskDef, CustomTaskError> {
    modify(store, id, |t| {
        t.active = active;
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn add_assigns_unique_custom_ids() {
        let mut s = MemoryStore::new();
        let a = add(&mut s, NewCustomTask::new("  Feed cat ", Pack::Daily)).unwrap();
        let b = add(&mut s, NewCustomTask::new("Feed cat", Pack::Daily)).unwrap();
        assert_ne!(a.id, b.id);
        assert!(a.id.starts_with("custom-"));
        assert!(a.custom);
        assert_eq!(a.title, "Feed cat");
        assert_eq!(load(&s).len(), 2);
    }

    #[test]
    fn empty_title_is_rejected() {
        let mut s = MemoryStore::new();
        assert_eq!(
            add(&mut s, NewCustomTask::new("   ", Pack::Daily)).unwrap_err(),
            CustomTaskError::EmptyTitle
        );
        assert!(load(&s).is_empty());
    }

    #[test]
    fn update_applies_only_given_fields() {
        let mut s = MemoryStore::new();
        let t = add(&mut s, NewCustomTask::new("Fish", Pack::Daily).with_description("pond")).unwrap();

        let patch = CustomTaskPatch {
            pack: Some(Pack::Weekly),
            ..Default::default()
        };
        let u = update(&mut s, &t.id, patch).unwrap();
        assert_eq!(u.title, "Fish");
        assert_eq!(u.description.as_deref(), Some("pond"));
        assert_eq!(u.pack, Pack::Weekly);

        let patch = CustomTaskPatch {
            description: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(update(&mut s, &t.id, patch).unwrap().description, None);
    }

    #[test]
    fn deactivate_delete_and_missing_ids() {
        let mut s = MemoryStore::new();
        let t = add(&mut s, NewCustomTask::new("Mine ore", Pack::Others)).unwrap();

        assert!(!set_active(&mut s, &t.id, false).unwrap().active);
        assert!(!load(&s)[0].active);

        delete(&mut s, &t.id).unwrap();
        assert!(load(&s).is_empty());
        assert_eq!(
            delete(&mut s, &t.id).unwrap_err(),
            CustomTaskError::NotFound(t.id.clone())
        );
        assert!(set_active(&mut s, "nope", true).is_err());
    }
}
