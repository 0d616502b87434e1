//! # fsmkit-store
//!
//! Local persistence for fsmkit.
//!
//! This crate provides:
//! - A directory store of named automaton records
//! - Pretty-printed JSON persistence in the exchange document shape
//! - An on-disk index with per-record crc32c integrity checks

pub mod error;
pub mod store;

pub use error::StoreError;
pub use store::{AutomatonRecord, AutomatonStore, RecordMeta};
