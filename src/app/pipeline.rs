//! Shared "search pipeline" logic used by the `search` and `demo` commands.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! ingest (or synthesize) -> segmented search -> results
//!
//! The front-ends can then focus on presentation (printing vs exports).

use log::info;

use crate::data::{SquareWave, generate_square_wave};
use crate::domain::{BlsParams, Direction, SearchConfig, SegmentAnchor, SegmentResultSet};
use crate::error::AppError;
use crate::io::ingest::{IngestOptions, IngestStats, IngestedCurve, load_light_curve};

/// All computed outputs of a single run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    /// Path, URL or a synthetic label.
    pub source: String,
    /// Ingest stats; `None` for synthetic input.
    pub stats: Option<IngestStats>,
    pub params: BlsParams,
    pub results: SegmentResultSet,
}

/// Load the configured light curve and search it.
pub fn run_search(config: &SearchConfig) -> Result<RunOutput, AppError> {
    let opts = IngestOptions {
        time_offset: config.time_offset,
        keep_flagged: config.keep_flagged,
    };
    let IngestedCurve {
        curve,
        stats,
        row_errors,
    } = load_light_curve(&config.input, &opts)?;
    info!(
        "ingested {} of {} rows ({} skipped, {} flagged)",
        stats.rows_used,
        stats.rows_read,
        row_errors.len(),
        stats.rows_flagged
    );

    let results = crate::search::run_search(&curve, &config.params)?;

    Ok(RunOutput {
        source: config.input.clone(),
        stats: Some(stats),
        params: config.params.clone(),
        results,
    })
}

/// Search parameters matched to a synthetic square wave: one segment covering the
/// whole series, one bin per sample, durations within 25% of the injected width.
pub fn demo_params(spec: &SquareWave, direction: Direction) -> BlsParams {
    let width_days = spec.width as f64 * spec.cadence;
    BlsParams {
        nbins: spec.samples,
        segment_size: spec.single_segment_size(),
        min_duration: 0.75 * width_days,
        max_duration: 1.25 * width_days,
        direction,
        anchor: SegmentAnchor::Zero,
    }
}

/// Generate a synthetic light curve and search it.
pub fn run_demo(spec: &SquareWave, direction: Direction) -> Result<RunOutput, AppError> {
    let curve = generate_square_wave(spec)?;
    let params = demo_params(spec, direction);
    let results = crate::search::run_search(&curve, &params)?;

    Ok(RunOutput {
        source: format!(
            "synthetic (n={}, period={}, width={}, depth={})",
            spec.samples, spec.period, spec.width, spec.depth
        ),
        stats: None,
        params,
        results,
    })
}
