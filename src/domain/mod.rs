//! Domain types used throughout the search.
//!
//! This module defines:
//!
//! - input data (`LightCurve`) and search parameters (`BlsParams`)
//! - per-segment intermediates (`BinnedSegment`, `DurationBounds`)
//! - search outputs (`Detection`, `SegmentResult`, `SegmentResultSet`)

pub mod types;

pub use types::*;
