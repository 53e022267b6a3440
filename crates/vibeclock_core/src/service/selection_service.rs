//! Persisted, user-ordered city selection.
//!
//! # Responsibility
//! - Own the ordered id list the dashboard renders.
//! - Load it at construction, tolerating bad stored data, and write it back after every
//!   mutation.
//! - Join ids against the catalog and attach position-based accents.
//!
//! # Invariants
//! - `selected_ids` has no duplicates and, right after load, only ids that
//!   resolve in the catalog.
//! - Load never yields an empty list; removal may, and the empty list is kept
//!   until an explicit reset.
//! - Storage failures never escape: reads fall back to the default list,
//!   failed writes switch the store to session-only mode.

use crate::catalog::{browse, BrowseQuery, CityCatalog};
use crate::model::accent::Accent;
use crate::model::city::{CityId, CityRecord};
use crate::repo::kv_repo::KeyValueStore;
use log::{debug, info, warn};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage key holding the JSON array of selected ids.
pub const SELECTION_STORAGE_KEY: &str = "vibe-o-clock-cities";

/// Selection shown on first launch and after a reset.
pub const DEFAULT_CITY_IDS: [&str; 4] = ["sanfrancisco", "london", "paris", "bangalore"];

/// Storage key and default list used by a [`SelectionStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionConfig {
    pub storage_key: String,
    pub default_ids: Vec<CityId>,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            storage_key: SELECTION_STORAGE_KEY.to_string(),
            default_ids: DEFAULT_CITY_IDS.iter().map(|id| id.to_string()).collect(),
        }
    }
}

/// Why load fell back to the default list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    /// Nothing stored under the key.
    Missing,
    /// The storage read failed.
    Unavailable,
    /// Stored value is not valid JSON.
    Corrupt,
    /// Stored JSON is not an array.
    NotAnArray,
    /// Stored array is empty.
    Empty,
    /// No stored id resolves in the catalog.
    NoResolvableIds,
}

/// Origin of the list held after [`SelectionStore::initialize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionSource {
    /// Restored from storage; `dropped` stale, duplicate, or non-string
    /// entries were discarded.
    Persisted { dropped: usize },
    Default(FallbackReason),
}

/// Rejected selection operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    IndexOutOfBounds { index: usize, len: usize },
}

impl Display for SelectionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IndexOutOfBounds { index, len } => {
                write!(f, "selection index {index} out of bounds for length {len}")
            }
        }
    }
}

impl Error for SelectionError {}

/// One rendered entry of the selection.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedCity<'a> {
    /// Position within the resolved list.
    pub position: usize,
    pub city: &'a CityRecord,
    pub accent: Accent,
}

/// Selection store over a catalog and a key-value backend.
pub struct SelectionStore<C: CityCatalog, S: KeyValueStore> {
    catalog: C,
    storage: S,
    config: SelectionConfig,
    selected_ids: Vec<CityId>,
    source: SelectionSource,
    session_only: bool,
}

impl<C: CityCatalog, S: KeyValueStore> SelectionStore<C, S> {
    /// Loads the selection with the default key and default list.
    pub fn initialize(catalog: C, storage: S) -> Self {
        Self::initialize_with(catalog, storage, SelectionConfig::default())
    }

    /// Loads the selection, falling back to `config.default_ids` when the
    /// stored value is absent, unreadable, or has no resolvable ids.
    ///
    /// # Side effects
    /// - Writes the resulting list back, so storage always mirrors state.
    pub fn initialize_with(catalog: C, storage: S, config: SelectionConfig) -> Self {
        let (selected_ids, source) =
            match load_persisted(&catalog, &storage, &config.storage_key) {
                Ok((ids, dropped)) => (ids, SelectionSource::Persisted { dropped }),
                Err(reason) => (
                    checked_defaults(&catalog, &config.default_ids),
                    SelectionSource::Default(reason),
                ),
            };

        info!(
            "event=selection_init module=selection status=ok source={} count={}",
            source_label(source),
            selected_ids.len()
        );

        let mut store = Self {
            catalog,
            storage,
            config,
            selected_ids,
            source,
            session_only: false,
        };
        store.persist();
        store
    }

    /// Ids in display order.
    pub fn selected_ids(&self) -> &[CityId] {
        &self.selected_ids
    }

    pub fn source(&self) -> SelectionSource {
        self.source
    }

    /// `true` once a write failed; the selection then lives in memory only.
    pub fn is_session_only(&self) -> bool {
        self.session_only
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected_ids.iter().any(|selected| selected == id)
    }

    /// Appends `id` at the end.
    ///
    /// Returns `false` (no-op) when the id is already selected or unknown to
    /// the catalog.
    pub fn add(&mut self, id: &str) -> bool {
        if self.is_selected(id) {
            return false;
        }
        if self.catalog.lookup(id).is_none() {
            debug!("event=selection_add module=selection status=skipped reason=unknown_id city_id={id}");
            return false;
        }
        self.selected_ids.push(id.to_string());
        debug!(
            "event=selection_add module=selection status=ok city_id={id} count={}",
            self.selected_ids.len()
        );
        self.persist();
        true
    }

    /// Removes `id`. Returns `false` when it was not selected.
    ///
    /// Removing the last city leaves an empty selection.
    pub fn remove(&mut self, id: &str) -> bool {
        let Some(position) = self.selected_ids.iter().position(|selected| selected == id) else {
            return false;
        };
        self.selected_ids.remove(position);
        debug!(
            "event=selection_remove module=selection status=ok city_id={id} count={}",
            self.selected_ids.len()
        );
        self.persist();
        true
    }

    /// Moves the entry at `from` to `to`, shifting the entries between them.
    ///
    /// # Errors
    /// - [`SelectionError::IndexOutOfBounds`] when either index is not a valid
    ///   position; the selection is left untouched.
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<(), SelectionError> {
        let len = self.selected_ids.len();
        for index in [from, to] {
            if index >= len {
                return Err(SelectionError::IndexOutOfBounds { index, len });
            }
        }
        if from == to {
            return Ok(());
        }

        let moved = self.selected_ids.remove(from);
        self.selected_ids.insert(to, moved);
        debug!("event=selection_reorder module=selection status=ok from={from} to={to}");
        self.persist();
        Ok(())
    }

    /// Replaces the selection with the default list.
    pub fn reset_to_default(&mut self) {
        self.selected_ids = self.config.default_ids.clone();
        debug!(
            "event=selection_reset module=selection status=ok count={}",
            self.selected_ids.len()
        );
        self.persist();
    }

    /// Resolved cities in display order with accents by resolved position.
    ///
    /// Ids missing from the catalog are skipped and do not consume an accent.
    pub fn selected_cities(&self) -> Vec<SelectedCity<'_>> {
        self.selected_ids
            .iter()
            .filter_map(|id| self.catalog.lookup(id))
            .enumerate()
            .map(|(position, city)| SelectedCity {
                position,
                city,
                accent: Accent::for_position(position),
            })
            .collect()
    }

    /// Selection modal listing, selected cities first.
    pub fn browse(&self, query: &BrowseQuery) -> Vec<&CityRecord> {
        browse(&self.catalog, query, |id| self.is_selected(id))
    }

    fn persist(&mut self) {
        let payload = match serde_json::to_string(&self.selected_ids) {
            Ok(payload) => payload,
            Err(err) => {
                warn!("event=selection_persist module=selection status=error error_code=encode_failed error={err}");
                self.session_only = true;
                return;
            }
        };

        match self.storage.set(&self.config.storage_key, &payload) {
            Ok(()) => {
                if self.session_only {
                    info!("event=selection_persist module=selection status=recovered");
                }
                self.session_only = false;
            }
            Err(err) => {
                warn!(
                    "event=selection_persist module=selection status=error error_code=write_failed count={} error={}",
                    self.selected_ids.len(),
                    err
                );
                self.session_only = true;
            }
        }
    }
}

fn load_persisted<C: CityCatalog, S: KeyValueStore>(
    catalog: &C,
    storage: &S,
    key: &str,
) -> Result<(Vec<CityId>, usize), FallbackReason> {
    let raw = match storage.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Err(FallbackReason::Missing),
        Err(err) => {
            warn!("event=selection_load module=selection status=error error_code=read_failed error={err}");
            return Err(FallbackReason::Unavailable);
        }
    };

    let value: Value = serde_json::from_str(&raw).map_err(|_| FallbackReason::Corrupt)?;
    let Value::Array(items) = value else {
        return Err(FallbackReason::NotAnArray);
    };
    if items.is_empty() {
        return Err(FallbackReason::Empty);
    }

    let stored = items.len();
    let mut ids: Vec<CityId> = Vec::with_capacity(stored);
    for item in items {
        let Value::String(id) = item else {
            continue;
        };
        if catalog.lookup(&id).is_some() && !ids.contains(&id) {
            ids.push(id);
        }
    }

    if ids.is_empty() {
        return Err(FallbackReason::NoResolvableIds);
    }
    let dropped = stored - ids.len();
    if dropped > 0 {
        info!("event=selection_load module=selection status=filtered dropped={dropped}");
    }
    Ok((ids, dropped))
}

fn checked_defaults<C: CityCatalog>(catalog: &C, defaults: &[CityId]) -> Vec<CityId> {
    let ids = defaults.to_vec();
    let unresolved = ids
        .iter()
        .filter(|id| catalog.lookup(id).is_none())
        .count();
    if unresolved > 0 {
        warn!("event=selection_defaults module=selection status=degraded unresolved={unresolved}");
    }
    ids
}

fn source_label(source: SelectionSource) -> &'static str {
    match source {
        SelectionSource::Persisted { .. } => "persisted",
        SelectionSource::Default(FallbackReason::Missing) => "default_missing",
        SelectionSource::Default(FallbackReason::Unavailable) => "default_unavailable",
        SelectionSource::Default(FallbackReason::Corrupt) => "default_corrupt",
        SelectionSource::Default(FallbackReason::NotAnArray) => "default_not_array",
        SelectionSource::Default(FallbackReason::Empty) => "default_empty",
        SelectionSource::Default(FallbackReason::NoResolvableIds) => "default_stale",
    }
}
