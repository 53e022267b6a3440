//! Domain model shared by catalog, selection, and clock derivation.
//!
//! # Responsibility
//! - Define the city record consumed by id from the catalog.
//! - Define derived, presentation-neutral values (accent, theme, snapshot).
//!
//! # Invariants
//! - City records are immutable once loaded.
//! - Snapshots are pure functions of `(timezone, instant)`.

pub mod accent;
pub mod city;
pub mod snapshot;
pub mod theme;
