//! Reporting utilities: formatted terminal output of search results.

pub mod format;

pub use format::*;
