//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose dashboard use cases (selection, search, clock reading, theme) to
//!   Dart via FRB.
//! - Hide storage setup: the first call opens the configured database and
//!   builds one process-wide selection and theme session; an in-memory store
//!   stands in when the database cannot be opened.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Failures are reported inside response envelopes, never thrown.
//! - Stored data is loaded once per process; later calls see in-memory
//!   state, including an empty selection.

use chrono::{DateTime, Utc};
use log::warn;
use once_cell::sync::OnceCell;
use std::sync::{Arc, Mutex, PoisonError};
use vibeclock_core::db::open_db;
use vibeclock_core::{
    core_version as core_version_inner, derive_time, init_logging as init_logging_inner,
    ping as ping_inner, BrowseQuery, CityCatalog, CityRecord, DashboardConfig, KeyValueStore,
    MemoryKeyValueStore, Region, RepoResult, SelectedCity, SelectionStore, SqliteKeyValueStore,
    StaticCatalog, ThemeStore,
};

static SESSION: OnceCell<Mutex<DashboardSession>> = OnceCell::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// One city row for cards and the selection modal.
#[derive(Debug, Clone, PartialEq)]
pub struct CityItem {
    pub id: String,
    pub name: String,
    pub country: String,
    pub flag: String,
    pub timezone: String,
    /// Static offset label from the catalog.
    pub utc_offset: String,
    /// Stable region id (`asia|europe|americas|middle_east|oceania|africa`).
    pub region: String,
    pub map_url: String,
    pub area: String,
    pub population: String,
    pub labor_force: String,
    pub challenge: String,
    pub news: Vec<String>,
    /// Accent colour; `None` outside the selected list.
    pub accent_color: Option<String>,
    pub selected: bool,
}

/// City list envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct CityListResponse {
    pub items: Vec<CityItem>,
    /// `true` when changes are not being persisted.
    pub session_only: bool,
    pub message: String,
}

/// Generic action envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    pub ok: bool,
    /// Selected ids after the action, in display order.
    pub selected_ids: Vec<String>,
    pub message: String,
}

/// Live clock reading for one city.
#[derive(Debug, Clone, PartialEq)]
pub struct ClockReading {
    pub ok: bool,
    pub city_id: String,
    /// `HH:MM:SS`, 24-hour.
    pub digital: String,
    pub calendar_date: String,
    pub is_daytime: bool,
    /// Live offset label, e.g. `UTC+5:30`.
    pub utc_offset: String,
    pub hour_angle: f64,
    pub minute_angle: f64,
    pub second_angle: f64,
    pub message: String,
}

impl ClockReading {
    fn failure(city_id: String, message: impl Into<String>) -> Self {
        Self {
            ok: false,
            city_id,
            digital: String::new(),
            calendar_date: String::new(),
            is_daytime: false,
            utc_offset: String::new(),
            hour_angle: 0.0,
            minute_angle: 0.0,
            second_angle: 0.0,
            message: message.into(),
        }
    }
}

/// Theme envelope; `theme` is `dark` or `light`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeResponse {
    pub theme: String,
    pub message: String,
}

/// Selected cities in display order with their accents.
///
/// # FFI contract
/// - Sync call, served from the process-wide session.
/// - Never panics; an empty selection returns no items.
#[flutter_rust_bridge::frb(sync)]
pub fn list_selected_cities() -> CityListResponse {
    with_session(|session| selected_cities_in(session))
}

/// Appends a city to the selection.
///
/// Already-selected and unknown ids are reported as `ok=false` without
/// changing anything.
#[flutter_rust_bridge::frb(sync)]
pub fn add_city(city_id: String) -> ActionResponse {
    with_session(|session| add_city_in(session, city_id.trim()))
}

/// Removes a city from the selection. The list may become empty.
#[flutter_rust_bridge::frb(sync)]
pub fn remove_city(city_id: String) -> ActionResponse {
    with_session(|session| remove_city_in(session, city_id.trim()))
}

/// Moves the card at `from_index` to `to_index`.
#[flutter_rust_bridge::frb(sync)]
pub fn move_city(from_index: u32, to_index: u32) -> ActionResponse {
    with_session(|session| move_city_in(session, from_index as usize, to_index as usize))
}

/// Restores the default four-city selection.
#[flutter_rust_bridge::frb(sync)]
pub fn reset_cities() -> ActionResponse {
    with_session(|session| reset_cities_in(session))
}

/// Free-text search over name, country, and aliases.
///
/// Blank text returns no items.
#[flutter_rust_bridge::frb(sync)]
pub fn search_cities(text: String) -> CityListResponse {
    with_session(|session| search_cities_in(session, &text))
}

/// Selection modal listing: selected first, then by name.
///
/// `region` is one of the stable region ids; `None` or an unknown id lists
/// every region.
#[flutter_rust_bridge::frb(sync)]
pub fn browse_cities(text: String, region: Option<String>) -> CityListResponse {
    with_session(|session| browse_cities_in(session, text, region.as_deref()))
}

/// Clock reading for `city_id` at `at_epoch_ms`, or now when `None`.
///
/// # FFI contract
/// - Sync call, pure computation; no storage access.
/// - Never panics; unknown ids and out-of-range instants return `ok=false`.
#[flutter_rust_bridge::frb(sync)]
pub fn city_clock(city_id: String, at_epoch_ms: Option<i64>) -> ClockReading {
    let instant = match at_epoch_ms {
        Some(millis) => match DateTime::<Utc>::from_timestamp_millis(millis) {
            Some(instant) => instant,
            None => return ClockReading::failure(city_id, "city_clock failed: instant out of range"),
        },
        None => Utc::now(),
    };
    clock_reading_at(city_id, instant)
}

/// Current theme (`dark` on first launch).
#[flutter_rust_bridge::frb(sync)]
pub fn get_theme() -> ThemeResponse {
    with_session(|session| ThemeResponse {
        theme: session.theme.theme().as_str().to_string(),
        message: String::new(),
    })
}

/// Flips dark/light, persists it, and returns the new theme.
#[flutter_rust_bridge::frb(sync)]
pub fn toggle_theme() -> ThemeResponse {
    with_session(|session| toggle_theme_in(session))
}

/// Key-value backend shared by the selection and theme stores of a session.
#[derive(Clone)]
struct SharedStorage(Arc<Mutex<Box<dyn KeyValueStore + Send>>>);

impl SharedStorage {
    fn new(storage: Box<dyn KeyValueStore + Send>) -> Self {
        Self(Arc::new(Mutex::new(storage)))
    }
}

impl KeyValueStore for SharedStorage {
    fn get(&self, key: &str) -> RepoResult<Option<String>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).get(key)
    }

    fn set(&self, key: &str, value: &str) -> RepoResult<()> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .set(key, value)
    }
}

type SessionSelection = SelectionStore<&'static StaticCatalog, SharedStorage>;

/// Selection and theme loaded once and kept for the life of the process.
///
/// Writes go through to storage, but reads are served from memory, so an
/// emptied selection stays empty and a session-only change survives until
/// exit.
struct DashboardSession {
    selection: SessionSelection,
    theme: ThemeStore<SharedStorage>,
}

impl DashboardSession {
    fn new(storage: Box<dyn KeyValueStore + Send>) -> Self {
        let storage = SharedStorage::new(storage);
        Self {
            selection: SelectionStore::initialize(StaticCatalog::builtin(), storage.clone()),
            theme: ThemeStore::load(storage),
        }
    }
}

fn with_session<T>(f: impl FnOnce(&mut DashboardSession) -> T) -> T {
    let session = SESSION.get_or_init(|| Mutex::new(DashboardSession::new(open_storage())));
    let mut session = session.lock().unwrap_or_else(PoisonError::into_inner);
    f(&mut session)
}

fn open_storage() -> Box<dyn KeyValueStore + Send> {
    let db_path = match DashboardConfig::from_env() {
        Ok(config) => config.db_path,
        Err(err) => {
            warn!("event=config_load module=ffi status=error error={err}");
            DashboardConfig::default().db_path
        }
    };
    match open_db(&db_path) {
        Ok(conn) => Box::new(SqliteKeyValueStore::new(conn)),
        Err(err) => {
            warn!("event=storage_open module=ffi status=fallback mode=session error={err}");
            Box::new(MemoryKeyValueStore::new())
        }
    }
}

fn selected_cities_in(session: &DashboardSession) -> CityListResponse {
    let store = &session.selection;
    let items = store
        .selected_cities()
        .into_iter()
        .map(to_selected_item)
        .collect::<Vec<_>>();
    list_response(items, store.is_session_only())
}

fn add_city_in(session: &mut DashboardSession, city_id: &str) -> ActionResponse {
    let store = &mut session.selection;
    if store.is_selected(city_id) {
        return action_failed(store, format!("add_city failed: `{city_id}` already selected"));
    }
    if store.add(city_id) {
        action_ok(store, "City added.")
    } else {
        action_failed(store, format!("add_city failed: unknown city `{city_id}`"))
    }
}

fn remove_city_in(session: &mut DashboardSession, city_id: &str) -> ActionResponse {
    let store = &mut session.selection;
    if store.remove(city_id) {
        action_ok(store, "City removed.")
    } else {
        action_failed(store, format!("remove_city failed: `{city_id}` not selected"))
    }
}

fn move_city_in(session: &mut DashboardSession, from: usize, to: usize) -> ActionResponse {
    let store = &mut session.selection;
    match store.reorder(from, to) {
        Ok(()) => action_ok(store, "City moved."),
        Err(err) => action_failed(store, format!("move_city failed: {err}")),
    }
}

fn reset_cities_in(session: &mut DashboardSession) -> ActionResponse {
    session.selection.reset_to_default();
    action_ok(&session.selection, "Selection reset.")
}

fn search_cities_in(session: &DashboardSession, text: &str) -> CityListResponse {
    let store = &session.selection;
    let items = store
        .catalog()
        .search(text)
        .into_iter()
        .map(|city| to_city_item(city, None, store.is_selected(&city.id)))
        .collect::<Vec<_>>();
    list_response(items, store.is_session_only())
}

fn browse_cities_in(
    session: &DashboardSession,
    text: String,
    region: Option<&str>,
) -> CityListResponse {
    let store = &session.selection;
    let mut query = BrowseQuery::new(text);
    if let Some(region) = region.and_then(Region::parse) {
        query = query.with_region(region);
    }
    let items = store
        .browse(&query)
        .into_iter()
        .map(|city| to_city_item(city, None, store.is_selected(&city.id)))
        .collect::<Vec<_>>();
    list_response(items, store.is_session_only())
}

fn toggle_theme_in(session: &mut DashboardSession) -> ThemeResponse {
    let theme = session.theme.toggle();
    ThemeResponse {
        theme: theme.as_str().to_string(),
        message: "Theme toggled.".to_string(),
    }
}

fn clock_reading_at(city_id: String, instant: DateTime<Utc>) -> ClockReading {
    let Some(city) = StaticCatalog::builtin().lookup(city_id.trim()) else {
        return ClockReading::failure(city_id, "city_clock failed: unknown city");
    };
    match derive_time(&city.timezone, instant) {
        Ok(snapshot) => {
            let angles = snapshot.hand_angles();
            ClockReading {
                ok: true,
                city_id: city.id.clone(),
                digital: snapshot.digital_label(),
                utc_offset: snapshot.utc_offset_label(),
                calendar_date: snapshot.calendar_date,
                is_daytime: snapshot.is_daytime,
                hour_angle: angles.hour,
                minute_angle: angles.minute,
                second_angle: angles.second,
                message: String::new(),
            }
        }
        Err(err) => ClockReading::failure(city_id, format!("city_clock failed: {err}")),
    }
}

fn action_ok(store: &SessionSelection, message: &str) -> ActionResponse {
    ActionResponse {
        ok: true,
        selected_ids: store.selected_ids().to_vec(),
        message: session_note(message.to_string(), store.is_session_only()),
    }
}

fn action_failed(store: &SessionSelection, message: String) -> ActionResponse {
    ActionResponse {
        ok: false,
        selected_ids: store.selected_ids().to_vec(),
        message,
    }
}

fn list_response(items: Vec<CityItem>, session_only: bool) -> CityListResponse {
    let message = if items.is_empty() {
        "No cities.".to_string()
    } else {
        format!("{} city(ies).", items.len())
    };
    CityListResponse {
        items,
        session_only,
        message: session_note(message, session_only),
    }
}

fn session_note(message: String, session_only: bool) -> String {
    if session_only {
        format!("{message} Changes are kept for this session only.")
    } else {
        message
    }
}

fn to_selected_item(selected: SelectedCity<'_>) -> CityItem {
    to_city_item(selected.city, Some(selected.accent.color), true)
}

fn to_city_item(city: &CityRecord, accent: Option<&str>, selected: bool) -> CityItem {
    CityItem {
        id: city.id.clone(),
        name: city.name.clone(),
        country: city.country.clone(),
        flag: city.flag.clone(),
        timezone: city.timezone.clone(),
        utc_offset: city.utc_offset.clone(),
        region: city.region().as_str().to_string(),
        map_url: city.map_url(),
        area: city.area.clone(),
        population: city.population.clone(),
        labor_force: city.labor_force.clone(),
        challenge: city.challenge.clone(),
        news: city.news.clone(),
        accent_color: accent.map(str::to_string),
        selected,
    }
}
