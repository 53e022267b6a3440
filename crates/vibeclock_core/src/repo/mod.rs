//! Persistence contracts and implementations.
//!
//! # Responsibility
//! - Define the key-value contract used by selection and theme services.
//! - Keep SQL inside the persistence boundary.
//!
//! # Invariants
//! - A `set` is durable (or has failed) when it returns; there is no
//!   deferred write queue.

pub mod kv_repo;
