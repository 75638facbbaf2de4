//! Light curve ingest and cleaning.
//!
//! This module turns a CSV or JSON light curve (local file or http(s) URL) into a
//! `LightCurve` that is safe to search.
//!
//! Design goals:
//! - **Strict schema** for required columns (clear errors + exit code 2)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **Deterministic behavior**: rows are sorted by time, duplicates are rejected
//! - **Separation of concerns**: no search logic here

use std::collections::HashMap;
use std::path::Path;

use csv::StringRecord;
use log::{info, warn};
use reqwest::blocking::Client;
use serde::Deserialize;

use crate::domain::LightCurve;
use crate::error::AppError;
use crate::math::median_spacing;

const TIME_COLUMNS: &[&str] = &["time", "t", "bjd", "btjd"];
const FLUX_COLUMNS: &[&str] = &["flux", "pdcsap_flux", "sap_flux"];
const FLUX_ERR_COLUMNS: &[&str] = &[
    "flux_err",
    "flux_error",
    "fluxerr",
    "pdcsap_flux_err",
    "sap_flux_err",
    "err",
];
const QUALITY_COLUMNS: &[&str] = &["quality", "sap_quality"];

/// How raw rows are cleaned before the search.
#[derive(Debug, Clone, Default)]
pub struct IngestOptions {
    /// Added to every time stamp (days).
    pub time_offset: f64,
    /// Keep rows whose quality flag is non-zero.
    pub keep_flagged: bool,
}

/// A row-level problem encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    /// 1-based line (CSV) or element index + 1 (JSON).
    pub line: usize,
    pub message: String,
}

/// Summary stats about the samples actually kept.
#[derive(Debug, Clone)]
pub struct IngestStats {
    pub rows_read: usize,
    pub rows_used: usize,
    pub rows_flagged: usize,
    pub time_min: f64,
    pub time_max: f64,
    pub median_spacing: Option<f64>,
}

/// Ingest output: cleaned light curve + stats + row errors.
#[derive(Debug, Clone)]
pub struct IngestedCurve {
    pub curve: LightCurve,
    pub stats: IngestStats,
    pub row_errors: Vec<RowError>,
}

#[derive(Debug, Clone, Copy)]
struct CsvColumns {
    time: usize,
    flux: usize,
    flux_err: Option<usize>,
    quality: Option<usize>,
}

#[derive(Debug, Clone, Copy)]
struct RawSample {
    time: f64,
    flux: f64,
    flux_err: f64,
    flagged: bool,
}

/// Load a light curve from a path or `http(s)://` URL.
///
/// Sources ending in `.json` are parsed as JSON, everything else as CSV.
pub fn load_light_curve(source: &str, opts: &IngestOptions) -> Result<IngestedCurve, AppError> {
    let text = read_source(source)?;
    if is_json_source(source) {
        parse_json_light_curve(&text, opts)
    } else {
        parse_csv_light_curve(&text, opts)
    }
}

/// Parse CSV text with a header row.
pub fn parse_csv_light_curve(text: &str, opts: &IngestOptions) -> Result<IngestedCurve, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);

    let columns = CsvColumns {
        time: find_column(&header_map, TIME_COLUMNS)
            .ok_or_else(|| missing_column("time", TIME_COLUMNS))?,
        flux: find_column(&header_map, FLUX_COLUMNS)
            .ok_or_else(|| missing_column("flux", FLUX_COLUMNS))?,
        flux_err: find_column(&header_map, FLUX_ERR_COLUMNS),
        quality: find_column(&header_map, QUALITY_COLUMNS),
    };

    if columns.flux_err.is_none() {
        info!("No flux error column found; using 0 for every sample.");
    }

    let mut samples = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // records() starts after the header; lines are 1-based.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        let parsed = parse_sample(&record, &columns);

        match parsed {
            Ok(sample) => samples.push(sample),
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    finish(samples, rows_read, row_errors, opts)
}

#[derive(Debug, Deserialize)]
struct JsonLightCurve {
    time: Vec<Option<f64>>,
    flux: Vec<Option<f64>>,
    #[serde(default, alias = "flux_error")]
    flux_err: Option<Vec<Option<f64>>>,
    #[serde(default)]
    quality: Option<Vec<Option<i64>>>,
}

/// Parse a JSON object of parallel arrays (`time`, `flux`, optional `flux_err`
/// and `quality`). `null` entries count as non-finite rows.
pub fn parse_json_light_curve(text: &str, opts: &IngestOptions) -> Result<IngestedCurve, AppError> {
    let raw: JsonLightCurve = serde_json::from_str(text)
        .map_err(|e| AppError::new(2, format!("Invalid light curve JSON: {e}")))?;

    let n = raw.time.len();
    let err_len = raw.flux_err.as_ref().map_or(n, Vec::len);
    let quality_len = raw.quality.as_ref().map_or(n, Vec::len);
    if raw.flux.len() != n || err_len != n || quality_len != n {
        return Err(AppError::invalid_argument(format!(
            "Light curve JSON arrays differ in length: time={n}, flux={}, flux_err={err_len}, quality={quality_len}.",
            raw.flux.len()
        )));
    }

    let mut samples = Vec::with_capacity(n);
    let mut row_errors = Vec::new();
    for i in 0..n {
        let flux_err = match &raw.flux_err {
            Some(v) => v[i],
            None => Some(0.0),
        };
        let quality = match &raw.quality {
            Some(v) => v[i],
            None => Some(0),
        };
        let values = (raw.time[i], raw.flux[i], flux_err, quality);
        let (Some(time), Some(flux), Some(flux_err), Some(quality)) = values else {
            row_errors.push(RowError {
                line: i + 1,
                message: "null value".to_string(),
            });
            continue;
        };
        if !(time.is_finite() && flux.is_finite() && flux_err.is_finite()) {
            row_errors.push(RowError {
                line: i + 1,
                message: "non-finite value".to_string(),
            });
            continue;
        }
        samples.push(RawSample {
            time,
            flux,
            flux_err,
            flagged: quality != 0,
        });
    }

    finish(samples, n, row_errors, opts)
}

fn finish(
    samples: Vec<RawSample>,
    rows_read: usize,
    row_errors: Vec<RowError>,
    opts: &IngestOptions,
) -> Result<IngestedCurve, AppError> {
    if !opts.time_offset.is_finite() {
        return Err(AppError::invalid_argument("Time offset must be finite."));
    }

    for e in row_errors.iter().take(5) {
        warn!("skipping row {}: {}", e.line, e.message);
    }
    if row_errors.len() > 5 {
        warn!("... {} more rows skipped", row_errors.len() - 5);
    }

    let rows_flagged = samples
        .iter()
        .filter(|s| s.flagged && !opts.keep_flagged)
        .count();

    let mut kept: Vec<RawSample> = samples
        .into_iter()
        .filter(|s| opts.keep_flagged || !s.flagged)
        .map(|mut s| {
            s.time += opts.time_offset;
            s
        })
        .collect();

    if kept.is_empty() {
        return Err(AppError::new(3, "No valid samples remain after cleaning."));
    }

    kept.sort_by(|a, b| a.time.partial_cmp(&b.time).unwrap_or(std::cmp::Ordering::Equal));

    let curve = LightCurve::new(
        kept.iter().map(|s| s.time).collect(),
        kept.iter().map(|s| s.flux).collect(),
        kept.iter().map(|s| s.flux_err).collect(),
    )?;

    let (time_min, time_max) = curve
        .time_span()
        .ok_or_else(|| AppError::new(3, "No valid samples remain after cleaning."))?;

    let stats = IngestStats {
        rows_read,
        rows_used: curve.len(),
        rows_flagged,
        time_min,
        time_max,
        median_spacing: median_spacing(curve.time()),
    };

    Ok(IngestedCurve {
        curve,
        stats,
        row_errors,
    })
}

fn read_source(source: &str) -> Result<String, AppError> {
    if source.starts_with("http://") || source.starts_with("https://") {
        info!("fetching {source}");
        let response = Client::new()
            .get(source)
            .send()
            .map_err(|e| AppError::new(4, format!("Failed to fetch '{source}': {e}")))?
            .error_for_status()
            .map_err(|e| AppError::new(4, format!("Request for '{source}' failed: {e}")))?;
        return response
            .text()
            .map_err(|e| AppError::new(4, format!("Failed to read response from '{source}': {e}")));
    }

    std::fs::read_to_string(source)
        .map_err(|e| AppError::new(2, format!("Failed to open light curve '{source}': {e}")))
}

fn is_json_source(source: &str) -> bool {
    // Ignore any URL query string when looking at the extension.
    let path = source.split(['?', '#']).next().unwrap_or(source);
    Path::new(path)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn find_column(header_map: &HashMap<String, usize>, aliases: &[&str]) -> Option<usize> {
    aliases.iter().find_map(|a| header_map.get(*a).copied())
}

fn missing_column(name: &str, aliases: &[&str]) -> AppError {
    AppError::new(
        2,
        format!("Missing required '{name}' column (accepted: {}).", aliases.join(", ")),
    )
}

fn parse_sample(record: &StringRecord, columns: &CsvColumns) -> Result<RawSample, String> {
    let time = parse_number(record, columns.time, "time")?;
    let flux = parse_number(record, columns.flux, "flux")?;
    let flux_err = match columns.flux_err {
        Some(i) => parse_number(record, i, "flux_err")?,
        None => 0.0,
    };
    let flagged = match columns.quality {
        Some(i) => parse_number(record, i, "quality")? != 0.0,
        None => false,
    };
    Ok(RawSample {
        time,
        flux,
        flux_err,
        flagged,
    })
}

fn parse_number(record: &StringRecord, idx: usize, name: &str) -> Result<f64, String> {
    let raw = record
        .get(idx)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("missing {name}"))?;
    let value: f64 = raw
        .parse()
        .map_err(|_| format!("invalid {name} '{raw}'"))?;
    if !value.is_finite() {
        return Err(format!("non-finite {name}"));
    }
    Ok(value)
}
