//! Selection modal listing: search or full list, region filter, then
//! selected-first alphabetical order.

use super::CityCatalog;
use crate::model::city::{CityRecord, Region};

/// Modal list request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrowseQuery {
    /// Free text; blank means "show every city".
    pub text: String,
    /// `None` is the "All" tab.
    pub region: Option<Region>,
}

impl BrowseQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            region: None,
        }
    }

    pub fn with_region(mut self, region: Region) -> Self {
        self.region = Some(region);
        self
    }
}

/// Lists cities for the selection modal.
///
/// Selected cities sort before unselected ones; ties order by name ignoring
/// case and Latin diacritics.
pub fn browse<'c, C>(
    catalog: &'c C,
    query: &BrowseQuery,
    is_selected: impl Fn(&str) -> bool,
) -> Vec<&'c CityRecord>
where
    C: CityCatalog + ?Sized,
{
    let mut results = if query.text.trim().is_empty() {
        catalog.all().iter().collect::<Vec<_>>()
    } else {
        catalog.search(&query.text)
    };

    if let Some(region) = query.region {
        results.retain(|city| city.region() == region);
    }

    results.sort_by_cached_key(|city| (!is_selected(&city.id), collation_key(&city.name)));
    results
}

fn collation_key(name: &str) -> String {
    name.chars().map(fold_char).flat_map(char::to_lowercase).collect()
}

/// Folds the Latin accents that occur in the bundled city names. Not a
/// general collation; extend the table when the catalog gains new letters.
fn fold_char(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' => 'a',
        'ç' | 'Ç' => 'c',
        'è' | 'é' | 'ê' | 'ë' | 'È' | 'É' | 'Ê' | 'Ë' => 'e',
        'ì' | 'í' | 'î' | 'ï' | 'Ì' | 'Í' | 'Î' | 'Ï' => 'i',
        'ñ' | 'Ñ' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' => 'o',
        'ù' | 'ú' | 'û' | 'ü' | 'Ù' | 'Ú' | 'Û' | 'Ü' => 'u',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::collation_key;
    use crate::catalog::{CityCatalog, StaticCatalog};

    #[test]
    fn every_bundled_name_folds_to_ascii() {
        for city in StaticCatalog::builtin().all() {
            assert!(collation_key(&city.name).is_ascii(), "unfolded name {}", city.name);
        }
    }

    #[test]
    fn collation_ignores_case_and_accents() {
        assert_eq!(collation_key("São Paulo"), "sao paulo");
        assert!(collation_key("São Paulo") < collation_key("Seattle"));
        assert!(collation_key("San Francisco") < collation_key("São Paulo"));
    }
}
