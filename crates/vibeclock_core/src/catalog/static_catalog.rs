//! Catalog backed by an in-process table.
//!
//! # Invariants
//! - Ids are non-blank and unique.
//! - Every timezone id resolves in the tz database, so clock derivation for a
//!   catalog city cannot fail.

use super::CityCatalog;
use crate::clock::parse_timezone;
use crate::model::city::CityRecord;
use log::{error, info};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

const BUILTIN_CITIES_JSON: &str = include_str!("cities.json");

static BUILTIN: Lazy<StaticCatalog> = Lazy::new(|| {
    match StaticCatalog::from_json(BUILTIN_CITIES_JSON) {
        Ok(catalog) => {
            info!(
                "event=catalog_load module=catalog status=ok cities={}",
                catalog.len()
            );
            catalog
        }
        Err(err) => {
            error!("event=catalog_load module=catalog status=error error={err}");
            StaticCatalog::default()
        }
    }
});

/// Catalog table validation failure.
#[derive(Debug)]
pub enum CatalogError {
    Parse(serde_json::Error),
    BlankId { position: usize },
    DuplicateId(String),
    InvalidTimezone { id: String, timezone: String },
}

impl Display for CatalogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "invalid catalog payload: {err}"),
            Self::BlankId { position } => write!(f, "city at position {position} has blank id"),
            Self::DuplicateId(id) => write!(f, "duplicate city id: {id}"),
            Self::InvalidTimezone { id, timezone } => {
                write!(f, "city `{id}` has unknown timezone `{timezone}`")
            }
        }
    }
}

impl Error for CatalogError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// Immutable catalog with an id index.
#[derive(Debug, Default)]
pub struct StaticCatalog {
    cities: Vec<CityRecord>,
    by_id: HashMap<String, usize>,
}

impl StaticCatalog {
    /// The catalog bundled with the crate.
    ///
    /// An invalid bundled table is logged and replaced by an empty catalog,
    /// which makes every stored id stale instead of aborting the process.
    pub fn builtin() -> &'static StaticCatalog {
        &BUILTIN
    }

    /// Builds a validated catalog from records.
    pub fn new(cities: Vec<CityRecord>) -> Result<Self, CatalogError> {
        let mut by_id = HashMap::with_capacity(cities.len());
        for (position, city) in cities.iter().enumerate() {
            if city.id.trim().is_empty() {
                return Err(CatalogError::BlankId { position });
            }
            if parse_timezone(&city.timezone).is_err() {
                return Err(CatalogError::InvalidTimezone {
                    id: city.id.clone(),
                    timezone: city.timezone.clone(),
                });
            }
            if by_id.insert(city.id.clone(), position).is_some() {
                return Err(CatalogError::DuplicateId(city.id.clone()));
            }
        }
        Ok(Self { cities, by_id })
    }

    /// Parses and validates a JSON array of city records.
    pub fn from_json(payload: &str) -> Result<Self, CatalogError> {
        let cities: Vec<CityRecord> = serde_json::from_str(payload)?;
        Self::new(cities)
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }
}

impl CityCatalog for StaticCatalog {
    fn all(&self) -> &[CityRecord] {
        &self.cities
    }

    fn lookup(&self, id: &str) -> Option<&CityRecord> {
        self.by_id.get(id).map(|&position| &self.cities[position])
    }
}
