//! Dashboard tuning and storage location.
//!
//! # Responsibility
//! - Hold every timer cadence and the database path in one value.
//! - Read `VIBECLOCK_*` overrides from the environment and validate them.
//!
//! # Invariants
//! - A validated config has a digital cadence of at most one second and
//!   non-zero periods.
//! - The surprise window is non-empty (`min < max`).

use crate::driver::clock_driver::{DEFAULT_FRAME_INTERVAL, MAX_DIGITAL_REFRESH};
use crate::driver::news_ticker::NewsTiming;
use crate::driver::vibe_flash::FlashTiming;
use crate::schedule::DelayWindow;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;

pub const DB_PATH_ENV: &str = "VIBECLOCK_DB_PATH";
pub const SURPRISE_MIN_MS_ENV: &str = "VIBECLOCK_SURPRISE_MIN_MS";
pub const SURPRISE_MAX_MS_ENV: &str = "VIBECLOCK_SURPRISE_MAX_MS";
pub const FLASH_DISMISS_MS_ENV: &str = "VIBECLOCK_FLASH_DISMISS_MS";
pub const DIGITAL_REFRESH_MS_ENV: &str = "VIBECLOCK_DIGITAL_REFRESH_MS";

const DEFAULT_DB_FILE: &str = "vibeclock.sqlite3";

/// Invalid configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Variable set but not a non-negative integer.
    InvalidNumber { name: &'static str, value: String },
    /// Variable set but blank.
    Blank(&'static str),
    ZeroPeriod(&'static str),
    DigitalRefreshTooCoarse(Duration),
    EmptySurpriseWindow { min: Duration, max: Duration },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidNumber { name, value } => {
                write!(f, "{name} must be a whole number of milliseconds, got `{value}`")
            }
            Self::Blank(name) => write!(f, "{name} cannot be blank"),
            Self::ZeroPeriod(name) => write!(f, "{name} must be greater than zero"),
            Self::DigitalRefreshTooCoarse(value) => write!(
                f,
                "digital refresh must be at most {}ms, got {}ms",
                MAX_DIGITAL_REFRESH.as_millis(),
                value.as_millis()
            ),
            Self::EmptySurpriseWindow { min, max } => write!(
                f,
                "surprise window is empty: min {}ms >= max {}ms",
                min.as_millis(),
                max.as_millis()
            ),
        }
    }
}

impl Error for ConfigError {}

/// Runtime settings for the dashboard core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    pub db_path: PathBuf,
    pub digital_refresh: Duration,
    pub frame_interval: Duration,
    pub news: NewsTiming,
    pub flash: FlashTiming,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE),
            digital_refresh: MAX_DIGITAL_REFRESH,
            frame_interval: DEFAULT_FRAME_INTERVAL,
            news: NewsTiming::default(),
            flash: FlashTiming::default(),
        }
    }
}

impl DashboardConfig {
    /// Defaults overridden by `VIBECLOCK_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable.
    ///
    /// # Errors
    /// - Malformed numbers, a blank path, or a result failing [`Self::validate`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(raw) = lookup(DB_PATH_ENV) {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return Err(ConfigError::Blank(DB_PATH_ENV));
            }
            config.db_path = PathBuf::from(trimmed);
        }
        if let Some(value) = millis(&lookup, DIGITAL_REFRESH_MS_ENV)? {
            config.digital_refresh = value;
        }
        if let Some(value) = millis(&lookup, FLASH_DISMISS_MS_ENV)? {
            config.flash.dismiss_after = value;
        }
        if let Some(value) = millis(&lookup, SURPRISE_MIN_MS_ENV)? {
            config.flash.surprise_window.min = value;
        }
        if let Some(value) = millis(&lookup, SURPRISE_MAX_MS_ENV)? {
            config.flash.surprise_window.max = value;
        }

        config.validate()?;
        Ok(config)
    }

    /// Checks cadence bounds and the surprise window.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let periods = [
            (DIGITAL_REFRESH_MS_ENV, self.digital_refresh),
            ("frame_interval", self.frame_interval),
            ("news.rotate_every", self.news.rotate_every),
            (FLASH_DISMISS_MS_ENV, self.flash.dismiss_after),
        ];
        if let Some((name, _)) = periods.iter().find(|(_, period)| period.is_zero()) {
            return Err(ConfigError::ZeroPeriod(*name));
        }
        if self.digital_refresh > MAX_DIGITAL_REFRESH {
            return Err(ConfigError::DigitalRefreshTooCoarse(self.digital_refresh));
        }

        let DelayWindow { min, max } = self.flash.surprise_window;
        if min >= max {
            return Err(ConfigError::EmptySurpriseWindow { min, max });
        }
        Ok(())
    }

    pub fn surprise_window(&self) -> DelayWindow {
        self.flash.surprise_window
    }
}

fn millis(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<Option<Duration>, ConfigError> {
    let Some(raw) = lookup(name) else {
        return Ok(None);
    };
    raw.trim()
        .parse::<u64>()
        .map(|value| Some(Duration::from_millis(value)))
        .map_err(|_| ConfigError::InvalidNumber {
            name,
            value: raw.clone(),
        })
}

#[cfg(test)]
mod tests {
    use super::{
        ConfigError, DashboardConfig, DB_PATH_ENV, DIGITAL_REFRESH_MS_ENV, SURPRISE_MAX_MS_ENV,
        SURPRISE_MIN_MS_ENV,
    };
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::time::Duration;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn defaults_match_dashboard_timings() {
        let config = DashboardConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.digital_refresh, Duration::from_secs(1));
        assert_eq!(config.frame_interval, Duration::from_millis(16));
        assert_eq!(config.news.rotate_every, Duration::from_secs(5));
        assert_eq!(config.news.fade, Duration::from_millis(400));
        assert_eq!(config.flash.dismiss_after, Duration::from_millis(2_500));
        assert_eq!(config.surprise_window().min, Duration::from_millis(180_000));
        assert_eq!(config.surprise_window().max, Duration::from_millis(420_000));
        assert!(config.db_path.ends_with("vibeclock.sqlite3"));
    }

    #[test]
    fn overrides_are_applied() {
        let config = DashboardConfig::from_lookup(lookup_from(&[
            (DB_PATH_ENV, " /tmp/clock.db "),
            (SURPRISE_MIN_MS_ENV, "1000"),
            (SURPRISE_MAX_MS_ENV, "2000"),
            (DIGITAL_REFRESH_MS_ENV, "250"),
        ]))
        .unwrap();

        assert_eq!(config.db_path, PathBuf::from("/tmp/clock.db"));
        assert_eq!(config.surprise_window().min, Duration::from_secs(1));
        assert_eq!(config.surprise_window().max, Duration::from_secs(2));
        assert_eq!(config.digital_refresh, Duration::from_millis(250));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let error = DashboardConfig::from_lookup(lookup_from(&[(SURPRISE_MIN_MS_ENV, "soon")]))
            .unwrap_err();
        assert!(matches!(error, ConfigError::InvalidNumber { .. }));

        let error =
            DashboardConfig::from_lookup(lookup_from(&[(DIGITAL_REFRESH_MS_ENV, "1500")]))
                .unwrap_err();
        assert_eq!(
            error,
            ConfigError::DigitalRefreshTooCoarse(Duration::from_millis(1_500))
        );

        let error = DashboardConfig::from_lookup(lookup_from(&[
            (SURPRISE_MIN_MS_ENV, "5000"),
            (SURPRISE_MAX_MS_ENV, "5000"),
        ]))
        .unwrap_err();
        assert!(matches!(error, ConfigError::EmptySurpriseWindow { .. }));

        let error =
            DashboardConfig::from_lookup(lookup_from(&[(DB_PATH_ENV, "  ")])).unwrap_err();
        assert_eq!(error, ConfigError::Blank(DB_PATH_ENV));
    }

    #[test]
    fn zero_period_is_rejected() {
        let error =
            DashboardConfig::from_lookup(lookup_from(&[(DIGITAL_REFRESH_MS_ENV, "0")]))
                .unwrap_err();
        assert_eq!(error, ConfigError::ZeroPeriod(DIGITAL_REFRESH_MS_ENV));
    }
}
