//! Signal-residue maximization over one binned segment.
//!
//! For every start bin `i1` we grow the window one bin at a time, keeping running
//! sums of flux `s` and point count `r`. A window `[i1, i2]` is admissible when:
//!
//! - `i2 - i1 >= min_bins` (and `i2 - i1 <= max_bins` by loop bound)
//! - `r >= r_min`
//! - `direction * s >= 0`
//! - `r < n`
//!
//! and is scored with the signal residue `SR = s^2 / (r * (n - r))`
//! (Kovács, Zucker & Mazeh 2002). A `NaN` flux from an empty bin poisons `s`, so
//! the polarity test rejects every window crossing it.
//!
//! Ties keep the first window found, scanning `i1` then `i2` in ascending order.

use crate::domain::{BinnedSegment, Detection, Direction, DurationBounds};

/// Find the best-scoring admissible window, or `None` if there is none.
///
/// `n` is the number of raw samples in the segment (not the bin count).
pub fn best_candidate(
    n: usize,
    binned: &BinnedSegment,
    bounds: DurationBounds,
    r_min: usize,
    direction: Direction,
) -> Option<Detection> {
    let nbins = binned.nbins();
    let sign = direction.sign();
    let mut best: Option<Detection> = None;

    for i1 in 0..nbins {
        let mut s = 0.0;
        let mut r = 0usize;
        let last = (i1 + bounds.max_bins).min(nbins - 1);

        for i2 in i1..=last {
            s += binned.flux[i2];
            r += binned.points[i2];

            if i2 - i1 < bounds.min_bins || r < r_min || r >= n || !(sign * s >= 0.0) {
                continue;
            }

            let sr = s * s / (r as f64 * (n - r) as f64);
            if !sr.is_finite() {
                continue;
            }
            if best.as_ref().is_some_and(|b| sr <= b.signal_residue) {
                continue;
            }

            best = Some(Detection {
                signal_residue: sr,
                duration: binned.time[i2] - binned.time[i1],
                depth: extreme(&binned.flux[i1..=i2], direction),
                mid_time: (binned.time[i2] + binned.time[i1]) / 2.0,
                start_bin: i1,
                end_bin: i2,
            });
        }
    }

    best
}

/// The most extreme value in the direction of the signal.
///
/// Dips take the minimum, rises the maximum, and `Either` the value with the
/// largest magnitude (sign kept, first one wins on equal magnitude).
pub fn extreme(values: &[f64], direction: Direction) -> f64 {
    let mut iter = values.iter().copied();
    let Some(first) = iter.next() else {
        return f64::NAN;
    };
    iter.fold(first, |acc, v| match direction {
        Direction::Dip => acc.min(v),
        Direction::Rise => acc.max(v),
        Direction::Either => {
            if v.abs() > acc.abs() {
                v
            } else {
                acc
            }
        }
    })
}
