//! Timezone-aware clock derivation.
//!
//! # Responsibility
//! - Map `(timezone id, instant)` to a [`crate::TimeSnapshot`] using the
//!   bundled IANA tz database (DST and historical offsets included).
//! - Abstract "now" behind [`WallClock`] so drivers can be tested.
//!
//! # Invariants
//! - Derivation holds no state; repeated calls with equal inputs are equal.
//! - Unknown timezone ids fail the whole derivation.

mod derive;
mod wall_clock;

pub use derive::{derive_time, derive_time_in, parse_timezone, ClockError};
pub use wall_clock::{FixedClock, SystemClock, WallClock};
