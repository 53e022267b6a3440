//! City catalog record.
//!
//! # Invariants
//! - `id` is unique across the catalog and never reused for another city.
//! - `timezone` is an IANA zone id resolvable by the tz database.
//! - Display fields are opaque to the core and passed through unchanged.

use serde::{Deserialize, Serialize};

/// Stable catalog identifier (e.g. `tokyo`, `sanfrancisco`).
pub type CityId = String;

/// One immutable row of the city catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityRecord {
    pub id: CityId,
    pub name: String,
    pub country: String,
    /// IANA zone id, e.g. `Asia/Kolkata`.
    pub timezone: String,
    /// Static label from the data table; the live offset comes from
    /// [`crate::TimeSnapshot::utc_offset_label`].
    pub utc_offset: String,
    pub lat: f64,
    pub lng: f64,
    pub area: String,
    pub population: String,
    pub labor_force: String,
    pub challenge: String,
    /// Rotating headlines shown by the news ticker. May be empty.
    #[serde(default)]
    pub news: Vec<String>,
    pub flag: String,
    /// Lowercase aliases matched by free-text search.
    #[serde(default)]
    pub search_keys: Vec<String>,
}

impl CityRecord {
    /// Coarse world region derived from the timezone prefix.
    pub fn region(&self) -> Region {
        Region::from_timezone(&self.timezone)
    }

    /// Map deep link centred on the city.
    pub fn map_url(&self) -> String {
        format!("https://www.google.com/maps/@{},{},12z", self.lat, self.lng)
    }

    /// Case-insensitive substring match on name, country, or any alias.
    ///
    /// `needle` must already be trimmed and lowercased.
    pub(crate) fn matches_normalized(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.country.to_lowercase().contains(needle)
            || self
                .search_keys
                .iter()
                .any(|key| key.to_lowercase().contains(needle))
    }
}

/// Region tabs of the city selection modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    Asia,
    Europe,
    Americas,
    MiddleEast,
    Oceania,
    Africa,
}

impl Region {
    pub const ALL: [Region; 6] = [
        Region::Asia,
        Region::Europe,
        Region::Americas,
        Region::MiddleEast,
        Region::Oceania,
        Region::Africa,
    ];

    /// Classifies an IANA zone id. Unknown prefixes fall back to `Asia`.
    pub fn from_timezone(timezone: &str) -> Self {
        if timezone.starts_with("Asia/Dubai") || timezone.starts_with("Europe/Istanbul") {
            Self::MiddleEast
        } else if timezone.starts_with("Asia/") {
            Self::Asia
        } else if timezone.starts_with("Europe/") {
            Self::Europe
        } else if timezone.starts_with("America/") || timezone.starts_with("Pacific/Honolulu") {
            Self::Americas
        } else if timezone.starts_with("Australia/") || timezone.starts_with("Pacific/") {
            Self::Oceania
        } else if timezone.starts_with("Africa/") {
            Self::Africa
        } else {
            Self::Asia
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asia => "asia",
            Self::Europe => "europe",
            Self::Americas => "americas",
            Self::MiddleEast => "middle_east",
            Self::Oceania => "oceania",
            Self::Africa => "africa",
        }
    }

    /// Parses the stable string id; `None` for unknown values.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|region| region.as_str() == value.trim())
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Asia => "Asia",
            Self::Europe => "Europe",
            Self::Americas => "Americas",
            Self::MiddleEast => "Middle East",
            Self::Oceania => "Oceania",
            Self::Africa => "Africa",
        }
    }
}
