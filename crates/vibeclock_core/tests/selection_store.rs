use vibeclock_core::{
    CityCatalog, FallbackReason, KeyValueStore, MemoryKeyValueStore, RepoError, RepoResult,
    SelectionError, SelectionSource, SelectionStore, StaticCatalog, ACCENT_PALETTE,
    DEFAULT_CITY_IDS, SELECTION_STORAGE_KEY,
};

fn defaults() -> Vec<String> {
    DEFAULT_CITY_IDS.iter().map(|id| id.to_string()).collect()
}

fn stored_ids(storage: &MemoryKeyValueStore) -> Vec<String> {
    let raw = storage
        .get(SELECTION_STORAGE_KEY)
        .unwrap()
        .expect("selection should be persisted");
    serde_json::from_str(&raw).unwrap()
}

struct FailingStore;

impl KeyValueStore for FailingStore {
    fn get(&self, _key: &str) -> RepoResult<Option<String>> {
        Err(RepoError::Unavailable("disabled".to_string()))
    }

    fn set(&self, _key: &str, _value: &str) -> RepoResult<()> {
        Err(RepoError::Unavailable("quota exceeded".to_string()))
    }
}

#[test]
fn first_launch_uses_defaults_and_persists_them() {
    let storage = MemoryKeyValueStore::new();
    let store = SelectionStore::initialize(StaticCatalog::builtin(), &storage);

    assert_eq!(store.selected_ids(), defaults().as_slice());
    assert_eq!(store.source(), SelectionSource::Default(FallbackReason::Missing));
    assert_eq!(stored_ids(&storage), defaults());
}

#[test]
fn stored_order_is_restored() {
    let storage = MemoryKeyValueStore::with_entry(SELECTION_STORAGE_KEY, r#"["tokyo","paris"]"#);
    let store = SelectionStore::initialize(StaticCatalog::builtin(), &storage);

    assert_eq!(store.selected_ids(), ["tokyo", "paris"]);
    assert_eq!(store.source(), SelectionSource::Persisted { dropped: 0 });
}

#[test]
fn unusable_stored_values_fall_back_to_defaults() {
    let cases = [
        ("not json at all", FallbackReason::Corrupt),
        (r#"{"ids":["tokyo"]}"#, FallbackReason::NotAnArray),
        (r#""tokyo""#, FallbackReason::NotAnArray),
        ("[]", FallbackReason::Empty),
        (r#"["atlantis","gotham"]"#, FallbackReason::NoResolvableIds),
        ("[1, 2, null]", FallbackReason::NoResolvableIds),
    ];

    for (raw, reason) in cases {
        let storage = MemoryKeyValueStore::with_entry(SELECTION_STORAGE_KEY, raw);
        let store = SelectionStore::initialize(StaticCatalog::builtin(), &storage);

        assert_eq!(store.selected_ids(), defaults().as_slice(), "payload {raw}");
        assert_eq!(store.source(), SelectionSource::Default(reason), "payload {raw}");
        assert_eq!(stored_ids(&storage), defaults(), "payload {raw}");
    }
}

#[test]
fn stale_and_duplicate_ids_are_dropped_on_load() {
    let storage = MemoryKeyValueStore::with_entry(
        SELECTION_STORAGE_KEY,
        r#"["tokyo","ghost","paris","tokyo",7]"#,
    );
    let store = SelectionStore::initialize(StaticCatalog::builtin(), &storage);

    assert_eq!(store.selected_ids(), ["tokyo", "paris"]);
    assert_eq!(store.source(), SelectionSource::Persisted { dropped: 3 });
    assert_eq!(stored_ids(&storage), ["tokyo", "paris"]);
}

#[test]
fn partially_stale_selection_keeps_the_resolvable_city_with_first_accent() {
    let storage =
        MemoryKeyValueStore::with_entry(SELECTION_STORAGE_KEY, r#"["tokyo","ghost-id"]"#);
    let store = SelectionStore::initialize(StaticCatalog::builtin(), &storage);

    let cities = store.selected_cities();
    assert_eq!(cities.len(), 1);
    assert_eq!(cities[0].city.id, "tokyo");
    assert_eq!(cities[0].position, 0);
    assert_eq!(cities[0].accent.index, 0);
    assert_eq!(cities[0].accent.color, ACCENT_PALETTE[0]);
}

#[test]
fn add_appends_and_rejects_duplicates_and_unknown_ids() {
    let storage = MemoryKeyValueStore::new();
    let mut store = SelectionStore::initialize(StaticCatalog::builtin(), &storage);

    assert!(store.add("tokyo"));
    assert_eq!(store.selected_ids().last().map(String::as_str), Some("tokyo"));
    assert_eq!(store.selected_ids().len(), 5);

    assert!(!store.add("tokyo"));
    assert!(!store.add("atlantis"));
    assert_eq!(store.selected_ids().len(), 5);
    assert_eq!(stored_ids(&storage), store.selected_ids());
}

#[test]
fn remove_can_empty_the_selection() {
    let storage = MemoryKeyValueStore::new();
    let mut store = SelectionStore::initialize(StaticCatalog::builtin(), &storage);

    for id in DEFAULT_CITY_IDS {
        assert!(store.remove(id));
    }
    assert!(!store.remove("london"));
    assert!(store.selected_ids().is_empty());
    assert!(store.selected_cities().is_empty());
    assert_eq!(stored_ids(&storage), Vec::<String>::new());

    store.reset_to_default();
    assert_eq!(store.selected_ids(), defaults().as_slice());
    assert_eq!(stored_ids(&storage), defaults());
}

#[test]
fn reorder_moves_one_entry_and_keeps_the_rest_in_order() {
    let storage = MemoryKeyValueStore::with_entry(
        SELECTION_STORAGE_KEY,
        r#"["tokyo","paris","london","sydney"]"#,
    );
    let mut store = SelectionStore::initialize(StaticCatalog::builtin(), &storage);

    store.reorder(0, 2).unwrap();
    assert_eq!(store.selected_ids(), ["paris", "london", "tokyo", "sydney"]);

    store.reorder(3, 0).unwrap();
    assert_eq!(store.selected_ids(), ["sydney", "paris", "london", "tokyo"]);
    assert_eq!(stored_ids(&storage), store.selected_ids());

    store.reorder(1, 1).unwrap();
    assert_eq!(store.selected_ids(), ["sydney", "paris", "london", "tokyo"]);
}

#[test]
fn reorder_out_of_bounds_is_rejected_without_changes() {
    let storage = MemoryKeyValueStore::new();
    let mut store = SelectionStore::initialize(StaticCatalog::builtin(), &storage);

    let error = store.reorder(0, 4).unwrap_err();
    assert_eq!(error, SelectionError::IndexOutOfBounds { index: 4, len: 4 });
    assert_eq!(store.selected_ids(), defaults().as_slice());
}

#[test]
fn accents_follow_position_and_cycle() {
    let catalog = StaticCatalog::builtin();
    let ids: Vec<&str> = catalog
        .all()
        .iter()
        .take(ACCENT_PALETTE.len() + 2)
        .map(|city| city.id.as_str())
        .collect();
    let storage = MemoryKeyValueStore::with_entry(
        SELECTION_STORAGE_KEY,
        serde_json::to_string(&ids).unwrap(),
    );
    let store = SelectionStore::initialize(catalog, &storage);

    let cities = store.selected_cities();
    assert_eq!(cities.len(), ACCENT_PALETTE.len() + 2);
    for (position, selected) in cities.iter().enumerate() {
        assert_eq!(selected.position, position);
        assert_eq!(selected.accent.color, ACCENT_PALETTE[position % ACCENT_PALETTE.len()]);
    }
    assert_eq!(cities[12].accent, cities[0].accent);
}

#[test]
fn accent_moves_with_reordered_city() {
    let storage = MemoryKeyValueStore::new();
    let mut store = SelectionStore::initialize(StaticCatalog::builtin(), &storage);

    store.reorder(3, 0).unwrap();
    let cities = store.selected_cities();
    assert_eq!(cities[0].city.id, "bangalore");
    assert_eq!(cities[0].accent.color, ACCENT_PALETTE[0]);
    assert_eq!(cities[1].city.id, "sanfrancisco");
    assert_eq!(cities[1].accent.color, ACCENT_PALETTE[1]);
}

#[test]
fn selection_survives_a_restart() {
    let storage = MemoryKeyValueStore::new();
    {
        let mut store = SelectionStore::initialize(StaticCatalog::builtin(), &storage);
        store.add("tokyo");
        store.remove("paris");
        store.reorder(3, 0).unwrap();
    }

    let restored = SelectionStore::initialize(StaticCatalog::builtin(), &storage);
    assert_eq!(
        restored.selected_ids(),
        ["tokyo", "sanfrancisco", "london", "bangalore"]
    );
}

#[test]
fn storage_failures_degrade_to_session_only_mode() {
    let mut store = SelectionStore::initialize(StaticCatalog::builtin(), FailingStore);

    assert_eq!(
        store.source(),
        SelectionSource::Default(FallbackReason::Unavailable)
    );
    assert!(store.is_session_only());

    assert!(store.add("tokyo"));
    assert!(store.is_selected("tokyo"));
    assert_eq!(store.selected_ids().len(), 5);
}

#[test]
fn browse_lists_selected_cities_first() {
    let storage = MemoryKeyValueStore::with_entry(SELECTION_STORAGE_KEY, r#"["zurich","amsterdam"]"#);
    let store = SelectionStore::initialize(StaticCatalog::builtin(), &storage);

    let listing = store.browse(&vibeclock_core::BrowseQuery::default());
    assert_eq!(listing.len(), store.catalog().all().len());
    assert_eq!(listing[0].id, "amsterdam");
    assert_eq!(listing[1].id, "zurich");
    assert_eq!(listing[2].id, "auckland");
}
