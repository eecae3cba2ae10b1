//! Calendar engine: reset-hour-shifted dates, Saturday-anchored weeks, time slots.
//!
//! A game "day" starts at the region's reset hour rather than at midnight, so every
//! date-key handed to the rest of the crate comes from here and never from the raw
//! wall-clock date.

use anyhow::Result;
use chrono::{Datelike, Duration, Local, NaiveDate, NaiveDateTime, Timelike, Utc, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::fmt;

use crate::region::{Region, TimeSlot};

/// A `YYYY-MM-DD` string used as a completion epoch stamp.
///
/// Kept as a string so records with malformed dates still load (they simply never
/// match the current key and read as stale).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DateKey(String);

impl DateKey {
    pub const FORMAT: &'static str = "%Y-%m-%d";

    pub fn from_date(date: NaiveDate) -> Self {
        Self(date.format(Self::FORMAT).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn to_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.0, Self::FORMAT).ok()
    }
}

impl From<NaiveDate> for DateKey {
    fn from(date: NaiveDate) -> Self {
        Self::from_date(date)
    }
}

impl From<&str> for DateKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source of the current wall-clock time.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;

    /// Epoch milliseconds, used only for informational record timestamps.
    fn timestamp_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Host local time.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Wall-clock time in a fixed IANA zone.
#[derive(Debug, Clone, Copy)]
pub struct ZonedClock {
    tz: Tz,
}

impl ZonedClock {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    pub fn from_name(name: &str) -> Result<Self> {
        let tz: Tz = name
            .parse()
            .map_err(|_| anyhow::anyhow!("invalid timezone: {name}"))?;
        Ok(Self::new(tz))
    }
}

impl Clock for ZonedClock {
    fn now(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.tz).naive_local()
    }
}

/// Settable clock for tests and replays.
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Cell<NaiveDateTime>,
}

impl FixedClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self { now: Cell::new(now) }
    }

    pub fn set(&self, now: NaiveDateTime) {
        self.now.set(now);
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.now.get()
    }

    fn timestamp_millis(&self) -> i64 {
        self.now.get().and_utc().timestamp_millis()
    }
}

/// The calendar date the game considers "today".
fn effective_date(region: Region, now: NaiveDateTime) -> NaiveDate {
    let date = now.date();
    if now.hour() < region.reset_hour() {
        date - Duration::days(1)
    } else {
        date
    }
}

pub fn effective_today(region: Region, now: NaiveDateTime) -> DateKey {
    DateKey::from_date(effective_date(region, now))
}

/// Most recent Saturday (at or before the effective day).
///
/// Saturday before the reset hour still belongs to the previous week.
pub fn effective_week_start(region: Region, now: NaiveDateTime) -> DateKey {
    let today = effective_date(region, now);
    let since_saturday = (today.weekday().num_days_from_sunday() + 1) % 7;
    DateKey::from_date(today - Duration::days(since_saturday.into()))
}

pub fn time_slot(region: Region, now: NaiveDateTime) -> TimeSlot {
    let starts = region.slot_starts();
    let hour = now.hour();
    // The slot whose start is the closest at-or-before the current hour, wrapping at midnight.
    [
        (TimeSlot::Dawn, starts.dawn),
        (TimeSlot::Day, starts.day),
        (TimeSlot::Dusk, starts.dusk),
        (TimeSlot::Night, starts.night),
    ]
    .into_iter()
    .min_by_key(|(_, start)| (hour + 24 - start) % 24)
    .map(|(slot, _)| slot)
    .unwrap_or(TimeSlot::Day)
}

/// Friday at/after the reset hour through Saturday before it.
///
/// During this window weekly tasks are regrouped under Daily so they are not forgotten
/// before the weekly reset.
pub fn is_weekly_merge_window(region: Region, now: NaiveDateTime) -> bool {
    effective_date(region, now).weekday() == Weekday::Fri
}

/// Region and instant captured once per evaluation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calendar {
    pub region: Region,
    pub now: NaiveDateTime,
}

impl Calendar {
    pub fn new(region: Region, now: NaiveDateTime) -> Self {
        Self { region, now }
    }

    pub fn at(region: Region, clock: &impl Clock) -> Self {
        Self::new(region, clock.now())
    }

    pub fn today(&self) -> DateKey {
        effective_today(self.region, self.now)
    }

    pub fn week_start(&self) -> DateKey {
        effective_week_start(self.region, self.now)
    }

    pub fn slot(&self) -> TimeSlot {
        time_slot(self.region, self.now)
    }

    pub fn in_weekly_merge_window(&self) -> bool {
        is_weekly_merge_window(self.region, self.now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    // 2026-02-18 is a Wednesday, 2026-02-21 a Saturday.

    #[test]
    fn today_shifts_back_before_reset_hour() {
        for region in Region::ALL {
            let reset = region.reset_hour();
            let before = effective_today(region, at(2026, 2, 18, reset - 1, 59));
            let prev_evening = effective_today(region, at(2026, 2, 17, 23, 59));
            let at_reset = effective_today(region, at(2026, 2, 18, reset, 0));
            assert_eq!(before, prev_evening, "{region}");
            assert_ne!(before, at_reset, "{region}");
            assert_eq!(at_reset.as_str(), "2026-02-18");
        }
    }

    #[test]
    fn same_instant_differs_by_region() {
        let now = at(2026, 2, 18, 6, 0);
        assert_eq!(effective_today(Region::Sea, now).as_str(), "2026-02-17");
        assert_eq!(effective_today(Region::Tw, now).as_str(), "2026-02-18");
    }

    #[test]
    fn week_start_is_saturday_anchored() {
        let r = Region::Sea;
        // Saturday after reset -> same day
        assert_eq!(effective_week_start(r, at(2026, 2, 21, 8, 0)).as_str(), "2026-02-21");
        // Saturday before reset -> previous Saturday
        assert_eq!(effective_week_start(r, at(2026, 2, 21, 6, 0)).as_str(), "2026-02-14");
        // Sunday before reset -> effective day is Saturday
        assert_eq!(effective_week_start(r, at(2026, 2, 22, 3, 0)).as_str(), "2026-02-21");
        // Wednesday midday
        assert_eq!(effective_week_start(r, at(2026, 2, 18, 12, 0)).as_str(), "2026-02-14");
        // Friday late evening
        assert_eq!(effective_week_start(r, at(2026, 2, 20, 23, 0)).as_str(), "2026-02-14");
    }

    #[test]
    fn time_slots_follow_region_boundaries() {
        let sea = |h| time_slot(Region::Sea, at(2026, 2, 18, h, 0));
        assert_eq!(sea(7), TimeSlot::Dawn);
        assert_eq!(sea(12), TimeSlot::Dawn);
        assert_eq!(sea(13), TimeSlot::Day);
        assert_eq!(sea(19), TimeSlot::Dusk);
        assert_eq!(sea(0), TimeSlot::Dusk);
        assert_eq!(sea(1), TimeSlot::Night);
        assert_eq!(sea(6), TimeSlot::Night);

        let tw = |h| time_slot(Region::Tw, at(2026, 2, 18, h, 0));
        assert_eq!(tw(0), TimeSlot::Night);
        assert_eq!(tw(5), TimeSlot::Night);
        assert_eq!(tw(6), TimeSlot::Dawn);
        assert_eq!(tw(12), TimeSlot::Day);
        assert_eq!(tw(18), TimeSlot::Dusk);
        assert_eq!(tw(23), TimeSlot::Dusk);
    }

    #[test]
    fn merge_window_spans_friday_reset_to_saturday_reset() {
        let r = Region::Sea;
        assert!(!is_weekly_merge_window(r, at(2026, 2, 20, 6, 59)));
        assert!(is_weekly_merge_window(r, at(2026, 2, 20, 7, 0)));
        assert!(is_weekly_merge_window(r, at(2026, 2, 20, 23, 0)));
        assert!(is_weekly_merge_window(r, at(2026, 2, 21, 6, 59)));
        assert!(!is_weekly_merge_window(r, at(2026, 2, 21, 7, 0)));
    }

    #[test]
    fn tw_merge_window_and_week_start_turn_at_six() {
        let r = Region::Tw;
        assert!(!is_weekly_merge_window(r, at(2026, 2, 20, 5, 59)));
        assert!(is_weekly_merge_window(r, at(2026, 2, 20, 6, 0)));
        assert!(is_weekly_merge_window(r, at(2026, 2, 21, 5, 59)));
        assert!(!is_weekly_merge_window(r, at(2026, 2, 21, 6, 0)));

        assert_eq!(effective_week_start(r, at(2026, 2, 20, 5, 59)).as_str(), "2026-02-14");
        assert_eq!(effective_week_start(r, at(2026, 2, 20, 6, 0)).as_str(), "2026-02-14");
        assert_eq!(effective_week_start(r, at(2026, 2, 21, 5, 59)).as_str(), "2026-02-14");
        assert_eq!(effective_week_start(r, at(2026, 2, 21, 6, 0)).as_str(), "2026-02-21");
    }

    #[test]
    fn fixed_clock_advances() {
        let clock = FixedClock::new(at(2026, 2, 18, 6, 30));
        clock.advance(Duration::minutes(30));
        assert_eq!(clock.now(), at(2026, 2, 18, 7, 0));
    }

    #[test]
    fn zoned_clock_rejects_unknown_zone() {
        assert!(ZonedClock::from_name("Asia/Taipei").is_ok());
        assert!(ZonedClock::from_name("Mars/Olympus").is_err());
    }
}
