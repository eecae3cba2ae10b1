//! Reset/expiry policy: when a completion record no longer counts.
//!
//! Staleness is a pure function of the record's date-key and the current calendar.
//! Nothing runs on a timer; callers apply resets before every read.

use crate::calendar::{Calendar, DateKey};
use crate::completion::CompletionMap;
use crate::task::{Pack, TaskLookup};

/// Key stamped into new records for this pack.
pub fn date_key_for(pack: &Pack, cal: &Calendar) -> DateKey {
    match pack {
        Pack::Weekly => cal.week_start(),
        _ => cal.today(),
    }
}

pub fn is_stale(pack: &Pack, record_date: &DateKey, cal: &Calendar) -> bool {
    match pack {
        Pack::Daily | Pack::DailyNpc => *record_date != cal.today(),
        Pack::Weekly => *record_date != cal.week_start(),
        Pack::GiftCodes | Pack::Others | Pack::Seasonal | Pack::Other(_) => false,
    }
}

/// Drop stale records. Returns true if anything was removed.
///
/// Records whose task cannot be resolved are kept until it can.
pub fn apply_resets<L>(map: &mut CompletionMap, lookup: &L, cal: &Calendar) -> bool
where
    L: TaskLookup + ?Sized,
{
    let before = map.len();
    map.retain(|id, record| match lookup.task(id) {
        Some(task) => {
            let stale = is_stale(&task.pack, &record.date, cal);
            if stale {
                tracing::debug!(id = %id, pack = %task.pack, date = %record.date, "completion expired");
            }
            !stale
        }
        None => true,
    });
    map.len() != before
}
