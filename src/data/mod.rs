//! Data sources that do not come from disk or the network.

pub mod synthetic;

pub use synthetic::*;
