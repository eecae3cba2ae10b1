use chrono::NaiveDate;
use harto_core::{FixedClock, Harto, MemoryStore, Pack, TimeSlot};
use harto_feed::{parse_catalog, parse_weather};
use pretty_assertions::assert_eq;

const CARDS: &str = r#"{"cards":[
    {"id":"water","title":"Water the garden","pack":"Daily"},
    {"id":"snow-angel","title":"Make a snow angel","pack":"Daily","season":"winter"},
    {"id":"rain-frog","title":"Catch a rain frog","pack":"Daily","weather":"rain"},
    {"id":"night-moth","title":"Net a night moth","pack":"Others","time":"night"},
    {"id":"festival","title":"Lantern festival","pack":"Others","timeLimited":true,"expiryDate":"2026-02-18"},
    {"id":"retired","title":"Old event","pack":"Seasonal","active":false}
]}"#;

const WEATHER: &str = r#"{"season":"winter","weather":{"dawn":"rain","day":"sunny","dusk":"rain","night":"clear"}}"#;

/// Feed documents drive visibility in the core once loaded.
#[test]
fn test_feed_documents_drive_visibility() {
    let catalog = parse_catalog(CARDS, "https://cdn.example.test").unwrap();
    let weather = parse_weather(WEATHER).unwrap();

    // Wednesday 2026-02-18 09:00 SEA -> dawn slot.
    let now = NaiveDate::from_ymd_opt(2026, 2, 18).unwrap().and_hms_opt(9, 0, 0).unwrap();
    let mut app = Harto::open(MemoryStore::new(), FixedClock::new(now));
    app.load_content(catalog.cards);
    app.set_environment(weather.season.clone(), weather.by_slot());

    let board = app.board();
    assert_eq!(board.slot, TimeSlot::Dawn);
    let ids: Vec<&str> = board.pending.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["water", "snow-angel", "rain-frog", "festival"]);

    // Expiry day regroups under Daily.
    let festival = board.pending.iter().find(|c| c.id == "festival").unwrap();
    assert_eq!(festival.display_pack, Pack::Daily);

    // Next day at 14:00 (day slot, sunny): the rain frog and the festival are gone.
    app.clock().set(NaiveDate::from_ymd_opt(2026, 2, 19).unwrap().and_hms_opt(14, 0, 0).unwrap());
    let ids: Vec<String> = app.board().pending.into_iter().map(|c| c.id).collect();
    assert_eq!(ids, vec!["water", "snow-angel"]);
}
