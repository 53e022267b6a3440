//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `vibeclock_core` linkage.
//! - Print the persisted selection with one live reading per city.

use chrono::Utc;
use vibeclock_core::db::open_db;
use vibeclock_core::{
    derive_time, DashboardConfig, MemoryKeyValueStore, SelectionStore, SqliteKeyValueStore,
    StaticCatalog,
};

fn main() {
    println!("vibeclock_core ping={}", vibeclock_core::ping());
    println!("vibeclock_core version={}", vibeclock_core::core_version());

    let config = match DashboardConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("config error: {err}; using defaults");
            DashboardConfig::default()
        }
    };

    match open_db(&config.db_path) {
        Ok(conn) => print_selection(SqliteKeyValueStore::new(&conn)),
        Err(err) => {
            eprintln!("db open failed ({}): {err}; using session store", config.db_path.display());
            print_selection(MemoryKeyValueStore::new());
        }
    }
}

fn print_selection<S: vibeclock_core::KeyValueStore>(storage: S) {
    let store = SelectionStore::initialize(StaticCatalog::builtin(), storage);
    let now = Utc::now();

    for selected in store.selected_cities() {
        let city = selected.city;
        match derive_time(&city.timezone, now) {
            Ok(snapshot) => println!(
                "{:>2}. {} {:<16} {} {} {:<9} {}",
                selected.position + 1,
                city.flag,
                city.name,
                snapshot.digital_label(),
                snapshot.calendar_date,
                snapshot.utc_offset_label(),
                if snapshot.is_daytime { "day" } else { "night" }
            ),
            Err(err) => println!("{:>2}. {} error={err}", selected.position + 1, city.name),
        }
    }
    if store.selected_ids().is_empty() {
        println!("no cities selected");
    }
}
