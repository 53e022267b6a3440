//! Core logic for the Vibe O'Clock world-clock dashboard.
//! Owns the city catalog, the persisted selection, time derivation, and the
//! timer-driven view drivers; UI shells consume it through the FFI crate.

pub mod catalog;
pub mod clock;
pub mod config;
pub mod db;
pub mod driver;
pub mod logging;
pub mod model;
pub mod repo;
pub mod schedule;
pub mod service;

pub use catalog::{browse, BrowseQuery, CatalogError, CityCatalog, StaticCatalog};
pub use clock::{derive_time, parse_timezone, ClockError, FixedClock, SystemClock, WallClock};
pub use config::{ConfigError, DashboardConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::accent::{Accent, ACCENT_PALETTE};
pub use model::city::{CityId, CityRecord, Region};
pub use model::snapshot::{HandAngles, TimeSnapshot};
pub use model::theme::Theme;
pub use repo::kv_repo::{
    KeyValueStore, MemoryKeyValueStore, RepoError, RepoResult, SqliteKeyValueStore,
};
pub use schedule::{DelayWindow, Scheduler, TimerHandle};
pub use service::selection_service::{
    FallbackReason, SelectedCity, SelectionConfig, SelectionError, SelectionSource,
    SelectionStore, DEFAULT_CITY_IDS, SELECTION_STORAGE_KEY,
};
pub use service::theme_service::{ThemeStore, THEME_STORAGE_KEY};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping, CityCatalog, StaticCatalog, DEFAULT_CITY_IDS};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn default_selection_resolves_in_builtin_catalog() {
        let catalog = StaticCatalog::builtin();
        for id in DEFAULT_CITY_IDS {
            assert!(catalog.lookup(id).is_some(), "missing default city {id}");
        }
    }
}
