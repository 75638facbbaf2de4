//! Small numeric helpers shared by ingest and search.

pub mod stats;

pub use stats::*;
