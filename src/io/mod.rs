//! Input/output helpers.
//!
//! - light curve ingest + cleaning (`ingest`)
//! - CSV exports of results and light curves (`export`)
//! - results JSON read/write (`results`)

pub mod export;
pub mod ingest;
pub mod results;

pub use export::*;
pub use ingest::*;
pub use results::*;
