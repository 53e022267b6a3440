//! Read-only city catalog.
//!
//! # Responsibility
//! - Resolve city ids to records and answer free-text search.
//! - Provide the unfiltered list and the modal browse ordering.
//!
//! # Invariants
//! - Catalog content never changes after load.
//! - Blank search text yields no results; browsing is the unfiltered path.

mod browse;
mod static_catalog;

pub use browse::{browse, BrowseQuery};
pub use static_catalog::{CatalogError, StaticCatalog};

use crate::model::city::CityRecord;

/// Lookup contract consumed by selection and rendering.
pub trait CityCatalog {
    /// Every record, in catalog order.
    fn all(&self) -> &[CityRecord];

    /// Resolves one id; `None` marks a stale or unknown id.
    fn lookup(&self, id: &str) -> Option<&CityRecord> {
        self.all().iter().find(|city| city.id == id)
    }

    /// Case-insensitive substring search over name, country, and aliases.
    fn search(&self, query: &str) -> Vec<&CityRecord> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.all()
            .iter()
            .filter(|city| city.matches_normalized(&needle))
            .collect()
    }
}

impl<C: CityCatalog + ?Sized> CityCatalog for &C {
    fn all(&self) -> &[CityRecord] {
        (**self).all()
    }

    fn lookup(&self, id: &str) -> Option<&CityRecord> {
        (**self).lookup(id)
    }

    fn search(&self, query: &str) -> Vec<&CityRecord> {
        (**self).search(query)
    }
}
