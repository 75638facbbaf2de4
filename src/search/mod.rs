//! Box-least-squares pulse search.
//!
//! Responsibilities:
//!
//! - convert physical durations into bin counts (`duration`)
//! - bin one segment's samples into equal-width time bins (`binning`)
//! - score every admissible bin pair by signal residue (`residue`)
//! - split the light curve into segments and search each one (`segments`)

pub mod binning;
pub mod duration;
pub mod residue;
pub mod segments;

pub use binning::*;
pub use duration::*;
pub use residue::*;
pub use segments::*;
