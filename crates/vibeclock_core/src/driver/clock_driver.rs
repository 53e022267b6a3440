//! Per-city clock polling.

use crate::clock::{derive_time_in, parse_timezone, ClockError, WallClock};
use crate::model::snapshot::{HandAngles, TimeSnapshot};
use crate::schedule::{Scheduler, TimerHandle};
use std::sync::Arc;
use std::time::Duration;

/// Coarsest cadence allowed for the digital readout.
pub const MAX_DIGITAL_REFRESH: Duration = Duration::from_secs(1);
/// Default analog cadence, one frame at 60 Hz.
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Starts the digital readout for `timezone`.
///
/// Emits one snapshot immediately, then one per `refresh`. `refresh` is capped
/// at [`MAX_DIGITAL_REFRESH`].
///
/// # Errors
/// - [`ClockError::InvalidTimezone`] before anything is scheduled.
pub fn start_digital_clock<F>(
    scheduler: &Scheduler,
    timezone: &str,
    clock: Arc<dyn WallClock>,
    refresh: Duration,
    mut on_snapshot: F,
) -> Result<TimerHandle, ClockError>
where
    F: FnMut(TimeSnapshot) + Send + 'static,
{
    let tz = parse_timezone(timezone)?;
    let refresh = refresh.min(MAX_DIGITAL_REFRESH);
    Ok(scheduler.repeat(refresh, move || {
        on_snapshot(derive_time_in(tz, clock.now()));
    }))
}

/// Starts analog hand updates for `timezone`, one per display frame.
///
/// # Errors
/// - [`ClockError::InvalidTimezone`] before anything is scheduled.
pub fn start_analog_clock<F>(
    scheduler: &Scheduler,
    timezone: &str,
    clock: Arc<dyn WallClock>,
    frame_interval: Duration,
    mut on_angles: F,
) -> Result<TimerHandle, ClockError>
where
    F: FnMut(HandAngles) + Send + 'static,
{
    let tz = parse_timezone(timezone)?;
    Ok(scheduler.repeat(frame_interval, move || {
        on_angles(derive_time_in(tz, clock.now()).hand_angles());
    }))
}
