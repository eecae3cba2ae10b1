use chrono::{Duration, NaiveDate, NaiveDateTime};
use harto_core::{
    CompletionStore, FileStore, FixedClock, Harto, KeyValueStore, MemoryStore, NewCustomTask, Pack,
    Region, TaskDef, effective_today,
};

// February 2026: Wed 18, Fri 20, Sat 21.
fn at(d: u32, h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 2, d)
        .unwrap()
        .and_hms_opt(h, m, 0)
        .unwrap()
}

fn catalog() -> Vec<TaskDef> {
    vec![
        TaskDef::new("daily-water", "Water the garden", Pack::Daily),
        TaskDef::new("npc-mayor", "Talk to the mayor", Pack::DailyNpc).with_steps(2),
        TaskDef::new("weekly-boss", "Defeat the weekly boss", Pack::Weekly),
        TaskDef::new("gift-spring", "Redeem SPRING26", Pack::GiftCodes),
        TaskDef::new("quest-lost-cat", "Find the lost cat", Pack::Others).with_steps(3),
    ]
}

fn app_at(now: NaiveDateTime) -> Harto<MemoryStore, FixedClock> {
    let mut app = Harto::open(MemoryStore::new(), FixedClock::new(now));
    app.load_content(catalog());
    app
}

/// Wednesday 06:00: SEA has not reset yet, TW has.
#[test]
fn test_region_switch_changes_effective_day() {
    let now = at(18, 6, 0);
    assert_eq!(effective_today(Region::Sea, now).as_str(), "2026-02-17");
    assert_eq!(effective_today(Region::Tw, now).as_str(), "2026-02-18");

    let mut app = app_at(now);
    assert_eq!(app.board().today.as_str(), "2026-02-17");
    app.switch_region(Region::Tw);
    assert_eq!(app.board().today.as_str(), "2026-02-18");
}

/// Daily completion survives until the next reset hour, then reverts.
#[test]
fn test_daily_completion_resets_at_reset_hour() {
    let mut app = app_at(at(18, 20, 0));
    app.complete("daily-water").unwrap();
    assert!(app.is_completed("daily-water"));

    app.clock().set(at(19, 6, 59));
    assert!(app.is_completed("daily-water"));

    app.clock().set(at(19, 7, 0));
    assert!(!app.is_completed("daily-water"));
    // Purged from the persisted scope, not just masked.
    assert!(!CompletionStore::get(app.store(), Region::Sea).contains_key("daily-water"));
}

/// Weekly done Friday 23:00 stays done through the merge window, resets Saturday 07:00.
#[test]
fn test_weekly_completion_through_merge_window() {
    let mut app = app_at(at(20, 23, 0));
    app.complete("weekly-boss").unwrap();

    let board = app.board();
    assert!(board.weekly_merge_window);
    let boss = board.completed.iter().find(|c| c.id == "weekly-boss").unwrap();
    assert_eq!(boss.display_pack, Pack::Daily);

    app.clock().set(at(21, 6, 59));
    assert!(app.is_completed("weekly-boss"));

    app.clock().set(at(21, 7, 0));
    assert!(!app.is_completed("weekly-boss"));
    let board = app.board();
    assert!(!board.weekly_merge_window);
    let boss = board.pending.iter().find(|c| c.id == "weekly-boss").unwrap();
    assert_eq!(boss.display_pack, Pack::Weekly);
}

/// Gift codes never expire on their own.
#[test]
fn test_gift_codes_persist_across_weeks() {
    let mut app = app_at(at(18, 12, 0));
    app.complete("gift-spring").unwrap();
    app.clock().advance(Duration::days(30));
    assert!(app.is_completed("gift-spring"));
}

#[test]
fn test_stepped_task_progress_and_snap_back() {
    let mut app = app_at(at(18, 12, 0));
    assert!(!app.toggle_step("quest-lost-cat", 0).unwrap());
    assert!(!app.toggle_step("quest-lost-cat", 1).unwrap());
    assert_eq!(app.steps_completed("quest-lost-cat"), 2);
    assert!(!app.is_completed("quest-lost-cat"));

    assert!(app.toggle_step("quest-lost-cat", 2).unwrap());
    assert!(app.is_completed("quest-lost-cat"));

    assert!(!app.toggle_step("quest-lost-cat", 1).unwrap());
    assert_eq!(app.steps_completed("quest-lost-cat"), 1);
    assert!(!app.is_completed("quest-lost-cat"));
}

/// Partial progress on a daily stepped task does not carry into the next day.
#[test]
fn test_partial_daily_steps_expire() {
    let mut app = app_at(at(18, 12, 0));
    app.toggle_step("npc-mayor", 0).unwrap();
    assert_eq!(app.steps_completed("npc-mayor"), 1);

    app.clock().set(at(19, 8, 0));
    assert_eq!(app.steps_completed("npc-mayor"), 0);
    app.toggle_step("npc-mayor", 0).unwrap();
    assert_eq!(app.steps_completed("npc-mayor"), 1);
}

/// Records for content that has not loaded yet are preserved, then evaluated once it has.
#[test]
fn test_unresolved_records_survive_until_content_loads() {
    let clock = FixedClock::new(at(18, 12, 0));
    let mut first = Harto::open(MemoryStore::new(), clock.clone());
    first.load_content(catalog());
    first.complete("daily-water").unwrap();

    let store = first.store().clone();
    let mut app = Harto::open(store, clock);
    app.clock().set(at(19, 12, 0));

    // No content: the record is an orphan and reads completed.
    assert!(app.is_completed("daily-water"));
    assert!(CompletionStore::get(app.store(), Region::Sea).contains_key("daily-water"));

    app.load_content(catalog());
    assert!(!app.is_completed("daily-water"));
}

#[test]
fn test_state_survives_reopen_with_file_store() {
    let tmp = tempfile::tempdir().unwrap();
    let clock = FixedClock::new(at(18, 12, 0));

    let custom_id = {
        let store = FileStore::open(tmp.path()).unwrap();
        let mut app = Harto::open(store, clock.clone());
        app.load_content(catalog());
        app.switch_region(Region::Tw);
        app.complete("gift-spring").unwrap();
        let t = app
            .add_custom_task(NewCustomTask::new("Brush the horse", Pack::Daily).with_steps(2))
            .unwrap();
        app.toggle_step(&t.id, 0).unwrap();
        t.id
    };

    let store = FileStore::open(tmp.path()).unwrap();
    let mut app = Harto::open(store, clock);
    app.load_content(catalog());
    assert_eq!(app.region(), Region::Tw);
    assert!(app.is_completed("gift-spring"));
    assert_eq!(app.steps_completed(&custom_id), 1);
    assert_eq!(app.custom_tasks().len(), 1);
}

#[test]
fn test_corrupt_completion_scope_reads_empty() {
    let mut store = MemoryStore::new();
    store
        .set(CompletionStore::key(Region::Sea), "{\"daily-water\": 42")
        .unwrap();
    let mut app = Harto::open(store, FixedClock::new(at(18, 12, 0)));
    app.load_content(catalog());
    assert!(!app.is_completed("daily-water"));
    assert_eq!(app.board().pending.len(), 5);
}
