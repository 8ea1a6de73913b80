//! Storage abstractions for service layer
//!
//! Contains the file-backed map store used to persist the whole dataset as a
//! single JSON document.

pub mod json_map_store;

pub use json_map_store::{JsonMapStore, LoadOutcome, PersistOptions};
