//! Equal-width time binning of one segment.
//!
//! Bin edges are `start + i * (end - start) / nbins` for `i < nbins`, with the last
//! edge set to `end` exactly. A sample belongs to bin `k` when
//! `edge[k] <= t < edge[k + 1]`, so a sample sitting on an interior edge goes to
//! the upper bin. Samples outside `[start, end)` are not binned.

use crate::domain::BinnedSegment;

/// `nbins + 1` equally spaced edges spanning `[start, end]`.
pub fn bin_edges(start: f64, end: f64, nbins: usize) -> Vec<f64> {
    let mut edges = Vec::with_capacity(nbins + 1);
    if nbins == 0 {
        edges.push(start);
        return edges;
    }
    let step = (end - start) / nbins as f64;
    for i in 0..nbins {
        edges.push(i as f64 * step + start);
    }
    edges.push(end);
    edges
}

/// Bin a segment's `(time, flux)` samples into `nbins` bins over `[start, end)`.
///
/// Each bin reports the mean time, mean flux and sample count of its members.
/// Empty bins report `NaN` means and a count of zero. No detrending or
/// normalization is applied.
pub fn bin_segment(time: &[f64], flux: &[f64], start: f64, end: f64, nbins: usize) -> BinnedSegment {
    let edges = bin_edges(start, end, nbins);

    let mut sum_t = vec![0.0; nbins];
    let mut sum_f = vec![0.0; nbins];
    let mut points = vec![0usize; nbins];

    for (&t, &f) in time.iter().zip(flux) {
        // Number of edges <= t; bin k holds samples with exactly k + 1 such edges.
        let k = edges.partition_point(|&e| e <= t);
        if k == 0 || k > nbins {
            continue;
        }
        sum_t[k - 1] += t;
        sum_f[k - 1] += f;
        points[k - 1] += 1;
    }

    let mean = |sum: &[f64]| -> Vec<f64> {
        sum.iter()
            .zip(&points)
            .map(|(&s, &c)| if c == 0 { f64::NAN } else { s / c as f64 })
            .collect()
    };

    let time = mean(&sum_t);
    let flux = mean(&sum_f);
    BinnedSegment { time, flux, points }
}
