//! Snapshot derivation over chrono-tz.

use crate::model::snapshot::{TimeSnapshot, DAY_END_HOUR, DAY_START_HOUR};
use chrono::{DateTime, Offset, Timelike, Utc};
use chrono_tz::Tz;
use std::error::Error;
use std::fmt::{Display, Formatter};

const NANOS_PER_SECOND: u32 = 1_000_000_000;
const CALENDAR_DATE_FORMAT: &str = "%a, %b %-d, %Y";

/// Clock derivation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClockError {
    /// Zone id is not present in the tz database.
    InvalidTimezone(String),
}

impl Display for ClockError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTimezone(value) => write!(f, "unknown timezone id `{value}`"),
        }
    }
}

impl Error for ClockError {}

/// Resolves an IANA zone id such as `Europe/London`.
pub fn parse_timezone(timezone: &str) -> Result<Tz, ClockError> {
    timezone
        .parse::<Tz>()
        .map_err(|_| ClockError::InvalidTimezone(timezone.to_string()))
}

/// Derives the local wall-clock reading of `instant` in `timezone`.
///
/// # Errors
/// - [`ClockError::InvalidTimezone`] when the id does not resolve. Ids from
///   the catalog are validated at load, so this indicates corrupt data.
pub fn derive_time(timezone: &str, instant: DateTime<Utc>) -> Result<TimeSnapshot, ClockError> {
    let tz = parse_timezone(timezone)?;
    Ok(derive_time_in(tz, instant))
}

/// Infallible variant for callers holding an already-resolved zone.
pub fn derive_time_in(tz: Tz, instant: DateTime<Utc>) -> TimeSnapshot {
    let local = instant.with_timezone(&tz);
    let hours = local.hour();
    // chrono encodes a leap second as nanos >= 1e9 on second 59.
    let nanos = local.nanosecond() % NANOS_PER_SECOND;

    TimeSnapshot {
        hours,
        minutes: local.minute(),
        seconds: local.second(),
        sub_second: f64::from(nanos) / f64::from(NANOS_PER_SECOND),
        calendar_date: local.format(CALENDAR_DATE_FORMAT).to_string(),
        is_daytime: (DAY_START_HOUR..DAY_END_HOUR).contains(&hours),
        utc_offset_seconds: local.offset().fix().local_minus_utc(),
    }
}

#[cfg(test)]
mod tests {
    use super::{derive_time, parse_timezone, ClockError};
    use chrono::{TimeZone, Utc};

    #[test]
    fn derives_fields_in_named_zone() {
        let instant = Utc.with_ymd_and_hms(2026, 10, 16, 3, 4, 5).unwrap();
        let snapshot = derive_time("Asia/Kolkata", instant).unwrap();

        assert_eq!(snapshot.hours, 8);
        assert_eq!(snapshot.minutes, 34);
        assert_eq!(snapshot.seconds, 5);
        assert_eq!(snapshot.sub_second, 0.0);
        assert_eq!(snapshot.calendar_date, "Fri, Oct 16, 2026");
        assert!(snapshot.is_daytime);
        assert_eq!(snapshot.utc_offset_label(), "UTC+5:30");
    }

    #[test]
    fn sub_second_fraction_comes_from_instant_nanos() {
        let instant = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
            + chrono::Duration::milliseconds(250);
        let snapshot = derive_time("UTC", instant).unwrap();
        assert_eq!(snapshot.sub_second, 0.25);
    }

    #[test]
    fn unknown_zone_is_rejected() {
        let instant = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(
            derive_time("Mars/Olympus_Mons", instant).unwrap_err(),
            ClockError::InvalidTimezone("Mars/Olympus_Mons".to_string())
        );
        assert!(parse_timezone("").is_err());
    }
}
