use super::*;
use serde_json::json;
use std::collections::HashSet;

fn series(id: u64, name: &str) -> WatchlistEntry {
    WatchlistEntry::new(id, name).with_poster(format!("/poster-{}.jpg", id))
}

fn season(id: u64, series_id: u64, season_number: u32, name: &str) -> WatchlistEntry {
    WatchlistEntry::new(id, name)
        .with_series(series_id)
        .with_season(season_number)
        .with_poster(format!("/poster-{}.jpg", series_id))
}

fn episode(id: u64, series_id: u64, season_number: u32, episode_number: u32, show: &str) -> WatchlistEntry {
    WatchlistEntry::new(id, format!("{} - S{}E{}: Title {}", show, season_number, episode_number, episode_number))
        .with_series(series_id)
        .with_episode(season_number, episode_number)
        .with_poster(format!("/poster-{}.jpg", series_id))
}

fn baskets(items: &[DisplayItem]) -> Vec<&SeasonBasket> {
    items.iter().filter_map(DisplayItem::as_basket).collect()
}

fn series_items(items: &[DisplayItem]) -> Vec<&SeriesDisplayItem> {
    items.iter().filter_map(DisplayItem::as_series).collect()
}

fn episode_numbers(basket: &SeasonBasket) -> Vec<Option<u32>> {
    basket.episodes().iter().map(|e| e.episode_number).collect()
}

#[test]
fn test_empty_input() {
    assert!(aggregate(&[]).is_empty());
}

#[test]
fn test_season_add_is_superseded_by_basket() {
    let entries = vec![
        WatchlistEntry::new(1, "Show - S1E1: Pilot").with_series(9).with_season(1),
        WatchlistEntry::new(2, "Show - S1E1: Pilot").with_series(9).with_episode(1, 1),
        WatchlistEntry::new(3, "Show - S1E1: Pilot").with_series(9).with_episode(1, 2),
    ];

    let items = aggregate(&entries);

    assert_eq!(items.len(), 1);
    assert!(series_items(&items).is_empty());
    let basket = items[0].as_basket().unwrap();
    assert_eq!(basket.series_id(), &CatalogId::Number(9));
    assert_eq!(basket.season_number(), 1);
    assert_eq!(basket.episode_count(), 2);
    assert_eq!(basket.name(), "Show (Season 1)");
}

#[test]
fn test_lone_series_uses_id_as_series() {
    let items = aggregate(&[WatchlistEntry::new(1, "Lone Show")]);

    assert_eq!(items.len(), 1);
    let item = items[0].as_series().unwrap();
    assert_eq!(item.series_key(), &CatalogId::Number(1));
    assert!(!item.is_season);
    assert_eq!(items[0].series_id(), &CatalogId::Number(1));
}

#[test]
fn test_episodes_grouped_and_sorted() {
    let entries = vec![
        episode(13, 100, 2, 3, "Drama"),
        episode(11, 100, 2, 1, "Drama"),
        episode(21, 200, 1, 5, "Comedy"),
        episode(12, 100, 2, 2, "Drama"),
        episode(22, 200, 1, 4, "Comedy"),
    ];

    let items = aggregate(&entries);
    let found = baskets(&items);

    assert_eq!(found.len(), 2);
    assert_eq!(found[0].name(), "Drama (Season 2)");
    assert_eq!(episode_numbers(found[0]), vec![Some(1), Some(2), Some(3)]);
    assert_eq!(found[1].name(), "Comedy (Season 1)");
    assert_eq!(episode_numbers(found[1]), vec![Some(4), Some(5)]);
    for basket in found {
        assert_eq!(basket.episode_count(), basket.episodes().len());
    }
}

#[test]
fn test_different_seasons_get_different_baskets() {
    let entries = vec![
        episode(1, 100, 1, 1, "Drama"),
        episode(2, 100, 2, 1, "Drama"),
    ];

    let items = aggregate(&entries);
    let found = baskets(&items);
    assert_eq!(found.len(), 2);
    assert_eq!(found[0].season_number(), 1);
    assert_eq!(found[1].season_number(), 2);
}

#[test]
fn test_output_order_series_then_baskets() {
    let entries = vec![
        episode(10, 300, 1, 1, "Third"),
        series(1, "First"),
        episode(20, 400, 2, 1, "Fourth"),
        season(2, 500, 3, "Second (Season 3)"),
        episode(11, 300, 1, 2, "Third"),
    ];

    let items = aggregate(&entries);
    let names: Vec<&str> = items.iter().map(DisplayItem::name).collect();

    assert_eq!(
        names,
        vec!["First", "Second (Season 3)", "Third (Season 1)", "Fourth (Season 2)"]
    );
}

#[test]
fn test_season_without_episodes_passes_through() {
    let entries = vec![
        season(1, 100, 2, "Drama Season 2"),
        episode(2, 100, 1, 1, "Drama"),
    ];

    let items = aggregate(&entries);

    assert_eq!(items.len(), 2);
    let item = items[0].as_series().unwrap();
    assert!(item.is_season);
    assert_eq!(item.entry.season_number, Some(2));
    assert_eq!(items[1].as_basket().unwrap().season_number(), 1);
}

#[test]
fn test_whole_series_is_not_deduplicated_by_basket() {
    let entries = vec![series(100, "Drama"), episode(2, 100, 1, 1, "Drama")];

    let items = aggregate(&entries);

    assert_eq!(series_items(&items).len(), 1);
    assert_eq!(baskets(&items).len(), 1);
}

#[test]
fn test_dedup_law_holds_for_every_basket() {
    let entries = vec![
        season(1, 100, 1, "Drama S1"),
        season(2, 100, 2, "Drama S2"),
        season(3, 200, 1, "Comedy S1"),
        episode(4, 100, 1, 3, "Drama"),
        episode(5, 200, 1, 1, "Comedy"),
        series(6, "Other"),
    ];

    let items = aggregate(&entries);

    let basket_keys: HashSet<BasketKey> = baskets(&items)
        .iter()
        .map(|b| BasketKey::new(b.series_id(), b.season_number()))
        .collect();
    for item in series_items(&items) {
        if let Some(key) = BasketKey::for_entry(&item.entry) {
            assert!(!basket_keys.contains(&key), "season item shadowed by basket: {:?}", key);
        }
    }
    assert_eq!(series_items(&items).len(), 2);
}

#[test]
fn test_season_poster_first_non_empty_wins() {
    let entries = vec![
        episode(1, 100, 1, 2, "Drama").with_season_poster(""),
        episode(2, 100, 1, 3, "Drama"),
        episode(3, 100, 1, 1, "Drama").with_season_poster("/season-a.jpg"),
        episode(4, 100, 1, 4, "Drama").with_season_poster("/season-b.jpg"),
    ];

    let items = aggregate(&entries);
    let basket = items[0].as_basket().unwrap();
    assert_eq!(basket.poster_path(), Some("/season-a.jpg"));
}

#[test]
fn test_poster_falls_back_to_first_sorted_episode() {
    let entries = vec![
        episode(1, 100, 1, 2, "Drama").with_poster("/second.jpg"),
        episode(2, 100, 1, 1, "Drama").with_poster("/first.jpg"),
    ];

    let items = aggregate(&entries);
    assert_eq!(items[0].as_basket().unwrap().poster_path(), Some("/first.jpg"));
}

#[test]
fn test_basket_name_from_first_sorted_episode() {
    let entries = vec![
        WatchlistEntry::new(1, "Later Name - S1E2: B").with_series(7).with_episode(1, 2),
        WatchlistEntry::new(2, "Earlier Name - S1E1: A").with_series(7).with_episode(1, 1),
    ];

    let items = aggregate(&entries);
    assert_eq!(items[0].name(), "Earlier Name (Season 1)");
}

#[test]
fn test_basket_name_without_delimiter() {
    let entries = vec![WatchlistEntry::new(1, "Just A Title").with_series(7).with_episode(3, 1)];

    let items = aggregate(&entries);
    assert_eq!(items[0].name(), "Just A Title (Season 3)");
}

#[test]
fn test_basket_name_with_delimiter_in_series_name() {
    // Recorded behavior: the first delimiter wins, even inside the series name
    let entries = vec![WatchlistEntry::new(1, "Star Trek - Picard - S1E1: Remembrance")
        .with_series(7)
        .with_episode(1, 1)];

    let items = aggregate(&entries);
    assert_eq!(items[0].name(), "Star Trek (Season 1)");
}

#[test]
fn test_missing_name_reads_as_empty() {
    let mut unnamed = WatchlistEntry::new(1, "").with_series(7).with_episode(2, 1);
    unnamed.name = None;

    let items = aggregate(&[unnamed]);
    assert_eq!(items[0].name(), " (Season 2)");
}

#[test]
fn test_missing_series_id_groups_by_entry_id() {
    let entries = vec![
        WatchlistEntry::new(55, "Solo - S1E1: A").with_episode(1, 1),
        WatchlistEntry::new(55, "Solo - S1E2: B").with_episode(1, 2),
    ];

    let items = aggregate(&entries);
    let basket = items[0].as_basket().unwrap();
    assert_eq!(basket.series_id(), &CatalogId::Number(55));
    assert_eq!(basket.episode_count(), 2);
}

#[test]
fn test_numeric_and_string_series_ids_share_a_basket() {
    let entries = vec![
        WatchlistEntry::new(1, "Show - S1E1: A").with_series(9).with_episode(1, 1),
        WatchlistEntry::new(2, "Show - S1E2: B").with_series("9").with_episode(1, 2),
        WatchlistEntry::new(3, "Show").with_series("9").with_season(1),
    ];

    let items = aggregate(&entries);

    assert_eq!(items.len(), 1);
    let basket = items[0].as_basket().unwrap();
    assert_eq!(basket.series_id(), &CatalogId::Number(9));
    assert_eq!(basket.episode_count(), 2);
}

#[test]
fn test_duplicate_episode_numbers_keep_input_order() {
    let entries = vec![
        WatchlistEntry::new("b", "Show - S1E1: dup one").with_series(9).with_episode(1, 1),
        WatchlistEntry::new("a", "Show - S1E1: dup two").with_series(9).with_episode(1, 1),
        WatchlistEntry::new("c", "Show - S1E0: zero").with_series(9).with_episode(1, 0),
    ];

    let items = aggregate(&entries);
    let basket = items[0].as_basket().unwrap();
    let ids: Vec<String> = basket.episodes().iter().map(|e| e.id.to_string()).collect();
    assert_eq!(ids, vec!["c", "b", "a"]);
    assert_eq!(basket.episode_count(), 3);
}

#[test]
fn test_episode_without_season_is_series_level() {
    let mut orphan = WatchlistEntry::new(8, "Odd Entry");
    orphan.episode_number = Some(3);

    let items = aggregate(&[orphan]);

    assert_eq!(items.len(), 1);
    let item = items[0].as_series().unwrap();
    assert!(!item.is_season);
}

#[test]
fn test_pass_through_copies_stored_fields() {
    let mut entry = series(1, "Show");
    entry.added_at = Some(json!("2024-03-01T12:00:00Z"));
    entry.extra.insert("vote_average".to_string(), json!(7.5));
    entry.extra.insert("isSeason".to_string(), json!("stale"));

    let items = aggregate(&[entry.clone()]);
    let value = serde_json::to_value(&items).unwrap();

    assert_eq!(value[0]["type"], json!("series"));
    assert_eq!(value[0]["isSeason"], json!(false));
    assert_eq!(value[0]["addedAt"], json!("2024-03-01T12:00:00Z"));
    assert_eq!(value[0]["vote_average"], json!(7.5));
    assert_eq!(value[0]["poster_path"], json!("/poster-1.jpg"));
}

#[test]
fn test_aggregate_is_deterministic() {
    let entries = vec![
        episode(3, 100, 1, 2, "Drama"),
        series(1, "First"),
        season(2, 100, 1, "Drama S1"),
        episode(4, 100, 1, 1, "Drama").with_season_poster("/s1.jpg"),
        season(5, 200, 4, "Comedy S4"),
        episode(6, 300, 2, 9, "Thriller"),
    ];

    let first = serde_json::to_string(&aggregate(&entries)).unwrap();
    for _ in 0..10 {
        assert_eq!(serde_json::to_string(&aggregate(&entries)).unwrap(), first);
    }
}

#[test]
fn test_series_name_helper() {
    assert_eq!(series_name("Show - S1E1: Pilot"), "Show");
    assert_eq!(series_name("Show"), "Show");
    assert_eq!(series_name(""), "");
    assert_eq!(basket_name("Show - S2E5: X", 2), "Show (Season 2)");
}

#[test]
fn test_season_zero_is_not_basketed() {
    let entries = vec![
        episode(1, 9, 0, 1, "Show"),
        WatchlistEntry::new(2, "Show").with_series(9).with_season(0),
        episode(3, 9, 1, 1, "Show"),
    ];

    let items = aggregate(&entries);

    let baskets = baskets(&items);
    assert_eq!(baskets.len(), 1);
    assert_eq!(baskets[0].season_number(), 1);

    let passed = series_items(&items);
    assert_eq!(passed.len(), 2);
    assert!(passed.iter().all(|item| !item.is_season));
    assert_eq!(passed[0].entry.id, CatalogId::Number(1));
    assert_eq!(passed[1].entry.id, CatalogId::Number(2));
}
