//! Use-case services over catalog and key-value storage.
//!
//! # Responsibility
//! - Keep UI/FFI layers decoupled from storage details.
//! - Own every piece of mutable, persisted dashboard state.

pub mod selection_service;
pub mod theme_service;
