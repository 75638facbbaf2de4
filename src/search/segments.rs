//! Segmented search over a whole light curve.
//!
//! The light curve is cut into fixed-length time windows. Each window is binned
//! and searched on its own; the only values shared between windows are the
//! median sample spacing and the minimum point weight `r_min`, both derived once
//! from the full light curve. Windows are evaluated in parallel and collected in
//! segment order.

use log::{debug, info};
use rayon::prelude::*;

use crate::domain::{BlsParams, LightCurve, SegmentAnchor, SegmentResult, SegmentResultSet};
use crate::error::AppError;
use crate::math::median_spacing;
use crate::search::{best_candidate, bin_segment, duration_bounds};

/// Upper limit on the number of segment windows in one search.
const MAX_SEGMENTS: usize = 1_000_000;

/// Search every segment of `curve` for its best transit candidate.
pub fn run_search(curve: &LightCurve, params: &BlsParams) -> Result<SegmentResultSet, AppError> {
    params.validate()?;

    let Some((t_min, t_max)) = curve.time_span() else {
        return Err(AppError::new(3, "Light curve has no samples."));
    };
    let spacing = median_spacing(curve.time())
        .ok_or_else(|| AppError::new(3, "At least two samples are needed to estimate the cadence."))?;

    // Typical number of samples in a transit of minimum duration.
    let r_min = (params.min_duration / spacing).ceil() as usize;
    let n_segments = segment_count(t_max - t_min, params.segment_size)?;
    let origin = match params.anchor {
        SegmentAnchor::Zero => 0.0,
        SegmentAnchor::First => t_min,
    };

    info!(
        "bls: n={} span=[{t_min:.5}, {t_max:.5}] spacing={spacing:.6} r_min={r_min} segments={n_segments}",
        curve.len()
    );

    let segments = (0..n_segments)
        .into_par_iter()
        .map(|index| search_segment(curve, params, origin, index, r_min))
        .collect::<Result<Vec<_>, AppError>>()?;

    Ok(SegmentResultSet {
        segments,
        median_spacing: spacing,
        r_min,
    })
}

/// Number of windows of `segment_size` needed to cover `span`.
fn segment_count(span: f64, segment_size: f64) -> Result<usize, AppError> {
    let count = (span / segment_size).floor() + 1.0;
    if !count.is_finite() || count > MAX_SEGMENTS as f64 {
        return Err(AppError::invalid_argument(format!(
            "Segment size {segment_size} splits a span of {span} into more than {MAX_SEGMENTS} segments."
        )));
    }
    Ok(count as usize)
}

/// Convenience entry point taking the three raw sequences.
pub fn search_arrays(
    time: &[f64],
    flux: &[f64],
    flux_err: &[f64],
    params: &BlsParams,
) -> Result<SegmentResultSet, AppError> {
    let curve = LightCurve::new(time.to_vec(), flux.to_vec(), flux_err.to_vec())?;
    run_search(&curve, params)
}

/// Index range of samples with `start <= t < end` (time is sorted).
pub fn segment_range(time: &[f64], start: f64, end: f64) -> std::ops::Range<usize> {
    let lo = time.partition_point(|&t| t < start);
    let hi = time.partition_point(|&t| t < end);
    lo..hi.max(lo)
}

fn search_segment(
    curve: &LightCurve,
    params: &BlsParams,
    origin: f64,
    index: usize,
    r_min: usize,
) -> Result<SegmentResult, AppError> {
    let start = origin + index as f64 * params.segment_size;
    let end = origin + (index + 1) as f64 * params.segment_size;
    let range = segment_range(curve.time(), start, end);
    let time = &curve.time()[range.clone()];
    let flux = &curve.flux()[range];
    let n = time.len();

    if n == 0 {
        debug!("segment {index}: empty window [{start:.5}, {end:.5})");
        return Ok(SegmentResult {
            index,
            start,
            end,
            n_points: 0,
            nbins: 0,
            bounds: None,
            detection: None,
        });
    }

    // Never ask for more bins than there are samples.
    let nbins = params.nbins.min(n);
    if nbins < params.nbins {
        debug!("segment {index}: only {n} samples, reducing bins from {}", params.nbins);
    }
    let bounds = duration_bounds(params.min_duration, params.max_duration, nbins, params.segment_size)?;

    let binned = bin_segment(time, flux, start, end, nbins);
    let detection = best_candidate(n, &binned, bounds, r_min, params.direction);

    match &detection {
        Some(d) => debug!(
            "segment {index}: n={n} nbins={nbins} sr={:.6} duration={:.5} depth={:.5} mid={:.5}",
            d.signal_residue, d.duration, d.depth, d.mid_time
        ),
        None => debug!("segment {index}: n={n} nbins={nbins} no admissible window"),
    }

    Ok(SegmentResult {
        index,
        start,
        end,
        n_points: n,
        nbins,
        bounds: Some(bounds),
        detection,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Direction, DurationBounds};

    fn params(nbins: usize, segment_size: f64) -> BlsParams {
        BlsParams {
            nbins,
            segment_size,
            min_duration: 0.1,
            max_duration: 0.4,
            direction: Direction::Dip,
            anchor: SegmentAnchor::Zero,
        }
    }

    fn curve(time: Vec<f64>, flux: Vec<f64>) -> LightCurve {
        let err = vec![0.0; time.len()];
        LightCurve::new(time, flux, err).unwrap()
    }

    #[test]
    fn segment_range_is_half_open() {
        let time = [0.0, 0.5, 1.0, 1.5, 2.0];
        assert_eq!(segment_range(&time, 0.5, 1.5), 1..3);
        assert_eq!(segment_range(&time, 3.0, 4.0), 5..5);
    }

    #[test]
    fn segment_count_follows_time_span() {
        let time: Vec<f64> = (0..50).map(|i| i as f64 * 0.1).collect();
        let flux = vec![0.0; 50];
        let out = run_search(&curve(time, flux), &params(10, 1.0)).unwrap();
        // floor(4.9 / 1.0) + 1
        assert_eq!(out.len(), 5);
        for (i, s) in out.segments.iter().enumerate() {
            assert_eq!(s.index, i);
        }
    }

    #[test]
    fn sparse_segment_reduces_bins_and_bounds() {
        // 10 samples per unit window, 100 bins requested.
        let time: Vec<f64> = (0..20).map(|i| i as f64 * 0.1).collect();
        let flux = vec![0.0; 20];
        let out = run_search(&curve(time, flux), &params(100, 1.0)).unwrap();

        let s = &out.segments[0];
        assert_eq!(s.n_points, 10);
        assert_eq!(s.nbins, 10);
        // min: floor(0.1 * 10 / 1) = 1, max: ceil(0.4 * 10 / 1) = 4
        assert_eq!(s.bounds, Some(DurationBounds { min_bins: 1, max_bins: 4 }));
    }

    #[test]
    fn empty_window_yields_no_candidate() {
        let mut time: Vec<f64> = (0..10).map(|i| i as f64 * 0.1).collect();
        time.extend((0..10).map(|i| 3.0 + i as f64 * 0.1));
        let flux = vec![-1.0; 20];
        let out = run_search(&curve(time, flux), &params(10, 1.0)).unwrap();

        assert_eq!(out.len(), 4);
        assert_eq!(out.segments[1].n_points, 0);
        assert_eq!(out.segments[1].detection, None);
        assert_eq!(out.segments[2].detection, None);
        assert!(out.signal_residue()[1].is_nan());
    }

    #[test]
    fn first_anchor_aligns_windows_with_data() {
        let time: Vec<f64> = (0..20).map(|i| 1000.25 + i as f64 * 0.1).collect();
        let flux = vec![0.0; 20];

        let mut p = params(10, 1.0);
        let zero = run_search(&curve(time.clone(), flux.clone()), &p).unwrap();
        assert!(zero.segments.iter().all(|s| s.n_points == 0));

        p.anchor = SegmentAnchor::First;
        let first = run_search(&curve(time, flux), &p).unwrap();
        assert_eq!(first.segments[0].start, 1000.25);
        assert_eq!(first.segments.iter().map(|s| s.n_points).sum::<usize>(), 20);
    }

    #[test]
    fn r_min_from_median_spacing() {
        let time: Vec<f64> = (0..40).map(|i| i as f64 * 0.25).collect();
        let flux = vec![0.0; 40];
        let mut p = params(10, 5.0);
        p.min_duration = 0.6;
        p.max_duration = 1.0;
        let out = run_search(&curve(time, flux), &p).unwrap();
        assert_eq!(out.median_spacing, 0.25);
        // ceil(0.6 / 0.25)
        assert_eq!(out.r_min, 3);
    }

    #[test]
    fn rejects_bad_parameters_and_lengths() {
        let p = params(10, -1.0);
        let err = search_arrays(&[0.0, 1.0], &[0.0, 0.0], &[0.0, 0.0], &p).unwrap_err();
        assert_eq!(err.exit_code(), 2);

        let err = search_arrays(&[0.0, 1.0], &[0.0], &[0.0, 0.0], &params(10, 1.0)).unwrap_err();
        assert_eq!(err.exit_code(), 2);

        let err = search_arrays(&[0.0], &[0.0], &[0.0], &params(10, 1.0)).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn tiny_segment_size_is_rejected_before_allocating() {
        let time = [0.0, 1.0];
        let flux = [0.0, -1.0];
        let err = [0.0, 0.0];

        let p = params(10, 1e-310);
        assert!(p.validate().is_ok());
        let e = search_arrays(&time, &flux, &err, &p).unwrap_err();
        assert_eq!(e.exit_code(), 2);

        let e = search_arrays(&time, &flux, &err, &params(10, 1e-9)).unwrap_err();
        assert_eq!(e.exit_code(), 2);
    }

    #[test]
    fn segment_count_limit_is_inclusive() {
        assert_eq!(segment_count(0.0, 1.0).unwrap(), 1);
        assert_eq!(segment_count((MAX_SEGMENTS - 1) as f64, 1.0).unwrap(), MAX_SEGMENTS);
        assert!(segment_count(MAX_SEGMENTS as f64, 1.0).is_err());
    }
}
