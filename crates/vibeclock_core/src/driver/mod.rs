//! Timer-driven view drivers.
//!
//! # Responsibility
//! - Turn the scheduling contract into per-view update streams: digital and
//!   analog clock readings, news rotation, and the vibe flash overlay.
//!
//! # Invariants
//! - Each driver is owned by exactly one view through its handle; dropping the
//!   handle stops every timer the driver started.
//! - Drivers for different cities share no mutable state.

pub mod clock_driver;
pub mod news_ticker;
pub mod vibe_flash;
