//! Formatted terminal output.
//!
//! We keep formatting code in one place so the search code stays free of
//! presentation concerns.

use crate::domain::{BlsParams, Detection, SegmentResultSet};
use crate::io::ingest::IngestStats;

/// Format the run header (input stats + parameters + derived values).
pub fn format_run_summary(
    source: &str,
    stats: Option<&IngestStats>,
    params: &BlsParams,
    results: &SegmentResultSet,
) -> String {
    let mut out = String::new();

    out.push_str("=== bls - segmented box-least-squares pulse search ===\n");
    out.push_str(&format!("Source: {source}\n"));
    if let Some(stats) = stats {
        out.push_str(&format!(
            "Samples: used={} read={} flagged={} | time=[{:.5}, {:.5}]\n",
            stats.rows_used, stats.rows_read, stats.rows_flagged, stats.time_min, stats.time_max
        ));
    }
    out.push_str(&format!(
        "Params: nbins={} segment={}d duration=[{}, {}]d direction={:?} anchor={:?}\n",
        params.nbins,
        params.segment_size,
        params.min_duration,
        params.max_duration,
        params.direction,
        params.anchor,
    ));
    out.push_str(&format!(
        "Derived: spacing={:.6}d r_min={} segments={} detections={}\n",
        results.median_spacing,
        results.r_min,
        results.len(),
        results.detection_count()
    ));

    out
}

/// Format the per-segment results table.
pub fn format_segment_table(results: &SegmentResultSet) -> String {
    let mut out = String::new();
    out.push_str(
        format!(
            "{:<7} {:<13} {:<10} {:<9} {:<13}",
            "Segment", "srMax", "Duration", "Depth", "MidTime"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(&format!("{:-<7} {:-<13} {:-<10} {:-<9} {:-<13}\n", "", "", "", "", ""));

    for s in &results.segments {
        let (sr, duration, depth, mid) = columns(s.detection.as_ref());
        out.push_str(
            format!(
                "{:<7} {:<13.6} {:<10.6} {:<9.6} {:<13.6}",
                s.index, sr, duration, depth, mid
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

/// One tab-separated line per segment: `segment, sr, duration, depth, midtime`.
pub fn format_tsv(results: &SegmentResultSet) -> String {
    let mut out = String::new();
    for s in &results.segments {
        let (sr, duration, depth, mid) = columns(s.detection.as_ref());
        out.push_str(&format!("{}\t{sr}\t{duration}\t{depth}\t{mid}\n", s.index));
    }
    out
}

fn columns(d: Option<&Detection>) -> (f64, f64, f64, f64) {
    match d {
        Some(d) => (d.signal_residue, d.duration, d.depth, d.mid_time),
        None => (f64::NAN, f64::NAN, f64::NAN, f64::NAN),
    }
}
