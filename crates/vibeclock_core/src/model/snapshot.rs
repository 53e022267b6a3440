//! Wall-clock readings derived for one timezone at one instant.
//!
//! # Invariants
//! - `hours < 24`, `minutes < 60`, `seconds < 60`.
//! - `sub_second` is in `[0, 1)`.
//! - `is_daytime == (6..18).contains(&hours)`.

use serde::Serialize;

/// First local hour counted as daytime.
pub const DAY_START_HOUR: u32 = 6;
/// First local hour counted as night again.
pub const DAY_END_HOUR: u32 = 18;

/// Structured local time for one city.
///
/// Built by [`crate::derive_time`]; identical inputs give identical values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSnapshot {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
    /// Fraction of the current second, for continuous hand motion.
    pub sub_second: f64,
    /// en-US short form, e.g. `Thu, Oct 16, 2026`.
    pub calendar_date: String,
    pub is_daytime: bool,
    /// Offset from UTC in effect at this instant, DST included.
    pub utc_offset_seconds: i32,
}

impl TimeSnapshot {
    /// 24-hour `HH:MM:SS` readout.
    pub fn digital_label(&self) -> String {
        format!("{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
    }

    /// `UTC+9`, `UTC+5:30`, `UTC-3`, `UTC+0`.
    pub fn utc_offset_label(&self) -> String {
        let sign = if self.utc_offset_seconds < 0 { '-' } else { '+' };
        let total_minutes = self.utc_offset_seconds.unsigned_abs() / 60;
        let (hours, minutes) = (total_minutes / 60, total_minutes % 60);
        if minutes == 0 {
            format!("UTC{sign}{hours}")
        } else {
            format!("UTC{sign}{hours}:{minutes:02}")
        }
    }

    /// Continuous analog hand angles in degrees clockwise from 12.
    pub fn hand_angles(&self) -> HandAngles {
        let smooth_seconds = f64::from(self.seconds) + self.sub_second;
        let smooth_minutes = f64::from(self.minutes) + smooth_seconds / 60.0;
        let smooth_hours = f64::from(self.hours % 12) + smooth_minutes / 60.0;

        HandAngles {
            hour: smooth_hours * 30.0,
            minute: smooth_minutes * 6.0,
            second: smooth_seconds * 6.0,
        }
    }
}

/// Analog hand rotation in degrees; each value is in `[0, 360)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HandAngles {
    pub hour: f64,
    pub minute: f64,
    pub second: f64,
}
