//! Shared domain types.
//!
//! Outputs are serializable so a finished search can be exported to JSON and
//! reloaded later for display.

use std::path::PathBuf;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Expected polarity of the transit signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Dimming events only (`-1`).
    Dip,
    /// Either polarity (`0`).
    Either,
    /// Brightening events only (`+1`).
    Rise,
}

impl Direction {
    /// Numeric sign used in the polarity test `sign * s >= 0`.
    pub fn sign(self) -> f64 {
        match self {
            Direction::Dip => -1.0,
            Direction::Either => 0.0,
            Direction::Rise => 1.0,
        }
    }

    /// Map the conventional `-1 / 0 / +1` encoding to a direction.
    pub fn from_sign(sign: i32) -> Result<Self, AppError> {
        match sign {
            -1 => Ok(Direction::Dip),
            0 => Ok(Direction::Either),
            1 => Ok(Direction::Rise),
            other => Err(AppError::invalid_argument(format!(
                "Invalid direction {other}: expected -1, 0 or +1."
            ))),
        }
    }
}

impl FromStr for Direction {
    type Err = AppError;

    /// Accepts `dip`, `either`, `rise` (any case) or the signs `-1`, `0`, `+1`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(sign) = s.parse::<i32>() {
            return Direction::from_sign(sign);
        }
        <Direction as ValueEnum>::from_str(s, true).map_err(|_| {
            AppError::invalid_argument(format!(
                "Invalid direction '{s}': expected dip, either, rise or -1, 0, +1."
            ))
        })
    }
}

/// Whether a physical duration is a lower or an upper bound.
///
/// Lower bounds round down, upper bounds round up (and are clamped to the bin count).
/// `"min"` / `"max"` parse through `FromStr`; any other mode is an invalid argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationKind {
    Min,
    Max,
}

impl FromStr for DurationKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "min" => Ok(DurationKind::Min),
            "max" => Ok(DurationKind::Max),
            other => Err(AppError::invalid_argument(format!(
                "Unknown duration mode '{other}' (expected 'min' or 'max')."
            ))),
        }
    }
}

/// Where segment windows start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SegmentAnchor {
    /// Windows are `[q * size, (q + 1) * size)` on the absolute time axis.
    Zero,
    /// Windows start at the first sample of the light curve.
    First,
}

/// How results are printed to the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Tsv,
    None,
}

/// A cleaned light curve: finite samples, strictly increasing time.
#[derive(Debug, Clone, PartialEq)]
pub struct LightCurve {
    time: Vec<f64>,
    flux: Vec<f64>,
    flux_err: Vec<f64>,
}

impl LightCurve {
    /// Build a light curve, rejecting mismatched lengths, non-finite values and
    /// time stamps that are not strictly increasing.
    pub fn new(time: Vec<f64>, flux: Vec<f64>, flux_err: Vec<f64>) -> Result<Self, AppError> {
        if time.len() != flux.len() || time.len() != flux_err.len() {
            return Err(AppError::invalid_argument(format!(
                "Light curve sequences differ in length: time={}, flux={}, flux_err={}.",
                time.len(),
                flux.len(),
                flux_err.len()
            )));
        }
        for (i, ((t, f), e)) in time.iter().zip(&flux).zip(&flux_err).enumerate() {
            if !(t.is_finite() && f.is_finite() && e.is_finite()) {
                return Err(AppError::invalid_argument(format!(
                    "Non-finite light curve sample at index {i}."
                )));
            }
        }
        if let Some(i) = time.windows(2).position(|w| w[1] <= w[0]) {
            return Err(AppError::invalid_argument(format!(
                "Time is not strictly increasing at index {} ({} then {}).",
                i + 1,
                time[i],
                time[i + 1]
            )));
        }
        Ok(Self {
            time,
            flux,
            flux_err,
        })
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    pub fn time(&self) -> &[f64] {
        &self.time
    }

    pub fn flux(&self) -> &[f64] {
        &self.flux
    }

    pub fn flux_err(&self) -> &[f64] {
        &self.flux_err
    }

    /// First and last time stamp.
    pub fn time_span(&self) -> Option<(f64, f64)> {
        Some((*self.time.first()?, *self.time.last()?))
    }
}

/// Core search parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlsParams {
    /// Requested number of bins per segment.
    pub nbins: usize,
    /// Segment length (days).
    pub segment_size: f64,
    /// Shortest transit duration considered (days).
    pub min_duration: f64,
    /// Longest transit duration considered (days).
    pub max_duration: f64,
    pub direction: Direction,
    pub anchor: SegmentAnchor,
}

impl BlsParams {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.nbins == 0 {
            return Err(AppError::invalid_argument("Bin count must be >= 1."));
        }
        if !(self.segment_size.is_finite() && self.segment_size > 0.0) {
            return Err(AppError::invalid_argument(format!(
                "Invalid segment size {} (must be finite and > 0).",
                self.segment_size
            )));
        }
        if !(self.min_duration.is_finite()
            && self.max_duration.is_finite()
            && self.min_duration >= 0.0
            && self.max_duration >= self.min_duration)
        {
            return Err(AppError::invalid_argument(format!(
                "Invalid duration range: min={}, max={} (must be finite, >= 0, and max >= min).",
                self.min_duration, self.max_duration
            )));
        }
        Ok(())
    }
}

/// Admissible transit length in bins for one segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationBounds {
    pub min_bins: usize,
    pub max_bins: usize,
}

/// One segment's samples aggregated into equal-width time bins.
///
/// Empty bins hold `NaN` mean time/flux and a zero count.
#[derive(Debug, Clone, PartialEq)]
pub struct BinnedSegment {
    pub time: Vec<f64>,
    pub flux: Vec<f64>,
    pub points: Vec<usize>,
}

impl BinnedSegment {
    pub fn nbins(&self) -> usize {
        self.points.len()
    }
}

/// Best transit candidate of a segment. All fields are finite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub signal_residue: f64,
    /// Days between the mean times of the first and last bin.
    pub duration: f64,
    /// Extreme binned flux inside the transit window.
    pub depth: f64,
    /// Transit midpoint (days).
    pub mid_time: f64,
    pub start_bin: usize,
    pub end_bin: usize,
}

/// Outcome of the search over one segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentResult {
    pub index: usize,
    /// Window start (inclusive, days).
    pub start: f64,
    /// Window end (exclusive, days).
    pub end: f64,
    /// Samples inside the window.
    pub n_points: usize,
    /// Effective bin count after reduction to `n_points`.
    pub nbins: usize,
    /// Effective bounds; `None` for an empty segment.
    pub bounds: Option<DurationBounds>,
    /// `None` when no admissible bin pair existed.
    pub detection: Option<Detection>,
}

/// Per-segment results of a full search, in segment order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentResultSet {
    pub segments: Vec<SegmentResult>,
    /// Median spacing of consecutive samples over the whole light curve (days).
    pub median_spacing: f64,
    /// Minimum accumulated point weight of a candidate.
    pub r_min: usize,
}

impl SegmentResultSet {
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn detection_count(&self) -> usize {
        self.segments.iter().filter(|s| s.detection.is_some()).count()
    }

    pub fn signal_residue(&self) -> Vec<f64> {
        self.column(|d| d.signal_residue)
    }

    pub fn duration(&self) -> Vec<f64> {
        self.column(|d| d.duration)
    }

    pub fn depth(&self) -> Vec<f64> {
        self.column(|d| d.depth)
    }

    pub fn mid_time(&self) -> Vec<f64> {
        self.column(|d| d.mid_time)
    }

    fn column(&self, field: impl Fn(&Detection) -> f64) -> Vec<f64> {
        self.segments
            .iter()
            .map(|s| s.detection.as_ref().map_or(f64::NAN, &field))
            .collect()
    }
}

/// A full run's configuration, derived from CLI flags (plus env and defaults).
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Path or http(s) URL of the light curve.
    pub input: String,
    /// Added to every time stamp on ingest (days).
    pub time_offset: f64,
    /// Keep samples with a non-zero quality flag.
    pub keep_flagged: bool,
    pub params: BlsParams,
    pub format: OutputFormat,
    pub export_results: Option<PathBuf>,
    pub export_json: Option<PathBuf>,
}
