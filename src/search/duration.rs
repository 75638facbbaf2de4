//! Duration (days) to bin-count conversion.
//!
//! Lower bounds round down and upper bounds round up, so the admissible range never
//! shrinks below what was asked for. Both are at least one bin, and an upper bound
//! never exceeds the bin count.

use crate::domain::{DurationBounds, DurationKind};
use crate::error::AppError;

/// Convert `duration_days` into whole bins for a segment of `segment_size` days
/// split into `nbins` bins.
pub fn to_bins(
    duration_days: f64,
    nbins: usize,
    segment_size: f64,
    kind: DurationKind,
) -> Result<usize, AppError> {
    if !(segment_size.is_finite() && segment_size > 0.0) {
        return Err(AppError::invalid_argument(format!(
            "Invalid segment size {segment_size} (must be finite and > 0)."
        )));
    }

    let bins = duration_days * nbins as f64 / segment_size;
    let out = match kind {
        DurationKind::Min => (bins.floor() as i64).max(1),
        DurationKind::Max => (bins.ceil() as i64).min(nbins as i64).max(1),
    };
    Ok(out as usize)
}

/// Both duration bounds for a segment with `nbins` effective bins.
pub fn duration_bounds(
    min_duration: f64,
    max_duration: f64,
    nbins: usize,
    segment_size: f64,
) -> Result<DurationBounds, AppError> {
    Ok(DurationBounds {
        min_bins: to_bins(min_duration, nbins, segment_size, DurationKind::Min)?,
        max_bins: to_bins(max_duration, nbins, segment_size, DurationKind::Max)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn min_rounds_down_with_floor_of_one() {
        // 0.5 * 100 / 2 = 25.0
        assert_eq!(to_bins(0.5, 100, 2.0, DurationKind::Min).unwrap(), 25);
        // 0.3125 * 100 / 2 = 15.625
        assert_eq!(to_bins(0.3125, 100, 2.0, DurationKind::Min).unwrap(), 15);
        assert_eq!(to_bins(0.001, 100, 2.0, DurationKind::Min).unwrap(), 1);
        assert_eq!(to_bins(0.0, 100, 2.0, DurationKind::Min).unwrap(), 1);
    }

    #[test]
    fn max_rounds_up_and_clamps_to_bin_count() {
        assert_eq!(to_bins(0.3125, 100, 2.0, DurationKind::Max).unwrap(), 16);
        assert_eq!(to_bins(0.5, 100, 2.0, DurationKind::Max).unwrap(), 25);
        assert_eq!(to_bins(5.0, 100, 2.0, DurationKind::Max).unwrap(), 100);
        assert_eq!(to_bins(0.0, 100, 2.0, DurationKind::Max).unwrap(), 1);
    }

    #[test]
    fn bounds_stay_in_range_across_inputs() {
        for nbins in [1usize, 2, 7, 50, 1000] {
            for d in [0.0, 0.01, 0.1, 0.5, 1.0, 3.0, 100.0] {
                let max = to_bins(d, nbins, 1.5, DurationKind::Max).unwrap();
                let min = to_bins(d, nbins, 1.5, DurationKind::Min).unwrap();
                assert!((1..=nbins).contains(&max), "max={max} nbins={nbins} d={d}");
                assert!(min >= 1);
            }
        }
    }

    #[test]
    fn unknown_mode_is_rejected() {
        let err = "mean".parse::<DurationKind>().unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn non_positive_segment_size_is_rejected() {
        assert!(to_bins(0.1, 10, 0.0, DurationKind::Min).is_err());
        assert!(to_bins(0.1, 10, -1.0, DurationKind::Max).is_err());
        assert!(to_bins(0.1, 10, f64::NAN, DurationKind::Max).is_err());
    }

    #[test]
    fn duration_bounds_pairs_both_modes() {
        let b = duration_bounds(0.125, 0.3125, 100, 2.0).unwrap();
        assert_eq!(b, DurationBounds { min_bins: 6, max_bins: 16 });
    }
}
