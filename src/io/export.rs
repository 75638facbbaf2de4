//! CSV exports.
//!
//! The exports are meant to be easy to consume in spreadsheets or downstream scripts.
//! Missing candidates are written as `NaN`, so every row has the same columns.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::{LightCurve, SegmentResultSet};
use crate::error::AppError;

/// Write per-segment results to a CSV file.
pub fn write_results_csv(path: &Path, results: &SegmentResultSet) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(4, format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_results(file, results)
}

/// Write per-segment results as CSV to any writer.
pub fn write_results<W: Write>(mut out: W, results: &SegmentResultSet) -> Result<(), AppError> {
    writeln!(
        out,
        "segment,start,end,n_points,nbins,signal_residue,duration,depth,mid_time"
    )
    .map_err(|e| AppError::new(4, format!("Failed to write export CSV header: {e}")))?;

    for s in &results.segments {
        let (sr, duration, depth, mid) = match &s.detection {
            Some(d) => (d.signal_residue, d.duration, d.depth, d.mid_time),
            None => (f64::NAN, f64::NAN, f64::NAN, f64::NAN),
        };
        writeln!(
            out,
            "{},{:.6},{:.6},{},{},{sr:.10},{duration:.8},{depth:.8},{mid:.8}",
            s.index, s.start, s.end, s.n_points, s.nbins,
        )
        .map_err(|e| AppError::new(4, format!("Failed to write export CSV row: {e}")))?;
    }

    Ok(())
}

/// Write a light curve as `time,flux,flux_err` CSV (readable by the ingest module).
pub fn write_light_curve_csv(path: &Path, curve: &LightCurve) -> Result<(), AppError> {
    let mut file = File::create(path)
        .map_err(|e| AppError::new(4, format!("Failed to create light curve CSV '{}': {e}", path.display())))?;

    writeln!(file, "time,flux,flux_err")
        .map_err(|e| AppError::new(4, format!("Failed to write light curve header: {e}")))?;
    for ((t, f), e) in curve.time().iter().zip(curve.flux()).zip(curve.flux_err()) {
        // `{}` prints the shortest representation that parses back to the same f64.
        writeln!(file, "{t},{f},{e}")
            .map_err(|e| AppError::new(4, format!("Failed to write light curve row: {e}")))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Detection, SegmentResult};

    #[test]
    fn results_csv_writes_nan_for_missing_candidates() {
        let set = SegmentResultSet {
            segments: vec![
                SegmentResult {
                    index: 0,
                    start: 0.0,
                    end: 1.0,
                    n_points: 50,
                    nbins: 50,
                    bounds: None,
                    detection: Some(Detection {
                        signal_residue: 0.25,
                        duration: 0.1,
                        depth: -2.0,
                        mid_time: 0.5,
                        start_bin: 20,
                        end_bin: 25,
                    }),
                },
                SegmentResult {
                    index: 1,
                    start: 1.0,
                    end: 2.0,
                    n_points: 0,
                    nbins: 0,
                    bounds: None,
                    detection: None,
                },
            ],
            median_spacing: 0.02,
            r_min: 2,
        };

        let mut buf = Vec::new();
        write_results(&mut buf, &set).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("segment,"));
        assert!(lines[1].starts_with("0,0.000000,1.000000,50,50,0.2500000000"));
        assert!(lines[2].ends_with("NaN,NaN,NaN,NaN"));
    }
}
