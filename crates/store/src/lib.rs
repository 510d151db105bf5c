//! Store backends for the lead pipeline
//!
//! The default backend keeps everything in process memory behind
//! `parking_lot` locks. The trait seam in `leadflow-core` allows a
//! database-backed implementation to replace it without touching the
//! engines.

pub mod memory;

pub use memory::{InMemoryLeadStore, InMemoryProfileStore};
