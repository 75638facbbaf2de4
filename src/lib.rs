//! `bls-pulse` library crate.
//!
//! Segmented box-least-squares search for transit-like events in light curves.
//! The binary (`bls`) is a thin wrapper around this library so that the search is
//! testable without spawning processes.

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod math;
pub mod report;
pub mod search;
