//! Read/write results JSON files.
//!
//! A results file is the portable record of a finished search: the parameters it
//! ran with and every segment's outcome. Segments without a candidate store
//! `null`, so no NaN ever reaches the JSON.

use std::fs::File;
use std::path::Path;

use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::domain::{BlsParams, SegmentResultSet};
use crate::error::AppError;

/// On-disk results schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultsFile {
    pub tool: String,
    /// RFC 3339 local time of the run.
    pub generated: String,
    /// Light curve path or URL.
    pub source: String,
    pub params: BlsParams,
    pub results: SegmentResultSet,
}

impl ResultsFile {
    pub fn new(source: &str, params: &BlsParams, results: &SegmentResultSet) -> Self {
        Self {
            tool: "bls".to_string(),
            generated: Local::now().to_rfc3339(),
            source: source.to_string(),
            params: params.clone(),
            results: results.clone(),
        }
    }
}

/// Write a results JSON file.
pub fn write_results_json(path: &Path, file: &ResultsFile) -> Result<(), AppError> {
    let out = File::create(path)
        .map_err(|e| AppError::new(4, format!("Failed to create results JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(out, file)
        .map_err(|e| AppError::new(4, format!("Failed to write results JSON: {e}")))?;
    Ok(())
}

/// Read a results JSON file.
pub fn read_results_json(path: &Path) -> Result<ResultsFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open results JSON '{}': {e}", path.display())))?;
    serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid results JSON: {e}")))
}
