//! Progress evaluator: completion and step progress over a completion map.
//!
//! Steps are an ordered checklist. Progress is a single count representing a
//! contiguous prefix of checked steps.

use crate::calendar::Calendar;
use crate::completion::{CompletionMap, CompletionRecord};
use crate::reset::{date_key_for, is_stale};
use crate::task::TaskLookup;

pub fn steps_completed(record: &CompletionRecord) -> u32 {
    record.steps_completed.unwrap_or(0)
}

pub fn is_completed<L>(task_id: &str, map: &CompletionMap, lookup: &L, cal: &Calendar) -> bool
where
    L: TaskLookup + ?Sized,
{
    let record = map.get(task_id);
    let Some(task) = lookup.task(task_id) else {
        // Orphaned record: the card was removed from content after being done.
        return record.is_some();
    };
    let Some(record) = record else {
        return false;
    };
    if is_stale(&task.pack, &record.date, cal) {
        return false;
    }
    if task.is_stepped() {
        return steps_completed(record) >= task.steps;
    }
    true
}

/// Step progress that still counts this cycle (0 when the record is stale or absent).
pub fn current_steps<L>(task_id: &str, map: &CompletionMap, lookup: &L, cal: &Calendar) -> u32
where
    L: TaskLookup + ?Sized,
{
    match (lookup.task(task_id), map.get(task_id)) {
        (Some(task), Some(record)) if !is_stale(&task.pack, &record.date, cal) => {
            steps_completed(record).min(task.steps)
        }
        _ => 0,
    }
}

/// Mark done in one action; stepped tasks jump to full progress.
pub fn complete<L>(map: &mut CompletionMap, task_id: &str, lookup: &L, cal: &Calendar, timestamp: i64)
where
    L: TaskLookup + ?Sized,
{
    let record = match lookup.task(task_id) {
        Some(task) => {
            let r = CompletionRecord::new(date_key_for(&task.pack, cal), timestamp);
            if task.is_stepped() { r.with_steps(task.steps) } else { r }
        }
        None => CompletionRecord::new(cal.today(), timestamp),
    };
    map.insert(task_id.to_string(), record);
}

/// Full revert regardless of step progress. Returns whether a record existed.
pub fn uncomplete(map: &mut CompletionMap, task_id: &str) -> bool {
    map.remove(task_id).is_some()
}

/// Toggle one step. Returns true when this left the task fully complete.
///
/// Clicking a checked step snaps progress back to that step; clicking an unchecked
/// one checks it and everything before it.
pub fn toggle_step<L>(
    map: &mut CompletionMap,
    task_id: &str,
    step_index: u32,
    lookup: &L,
    cal: &Calendar,
    timestamp: i64,
) -> bool
where
    L: TaskLookup + ?Sized,
{
    let Some(task) = lookup.task(task_id) else {
        return false;
    };
    if !task.is_stepped() || step_index >= task.steps {
        return false;
    }

    let key = date_key_for(&task.pack, cal);
    let current = match map.get(task_id) {
        Some(r) if !is_stale(&task.pack, &r.date, cal) => steps_completed(r).min(task.steps),
        _ => 0,
    };

    let next = if step_index < current { step_index } else { step_index + 1 };
    let record = CompletionRecord::new(key, timestamp).with_steps(next);
    map.insert(task_id.to_string(), record);

    next >= task.steps
}

/// Rewrite a record after the task's step count changed from `old_steps` to `new_steps`.
///
/// Progress is clamped to the new count. Dropping to a single action keeps the record
/// only if it was already fully complete. Returns whether the map changed.
pub fn rescale_steps(map: &mut CompletionMap, task_id: &str, old_steps: u32, new_steps: u32) -> bool {
    let Some(record) = map.get_mut(task_id) else {
        return false;
    };
    let was_complete = old_steps == 0 || steps_completed(record) >= old_steps;
    let before = record.steps_completed;

    if new_steps == 0 {
        if !was_complete {
            map.remove(task_id);
            return true;
        }
        record.steps_completed = None;
    } else if old_steps == 0 {
        record.steps_completed = Some(new_steps);
    } else {
        record.steps_completed = Some(steps_completed(record).min(new_steps));
    }
    record.steps_completed != before
}
