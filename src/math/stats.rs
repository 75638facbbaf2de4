//! Order statistics.

/// Median of `values`, sorting them in place.
///
/// Returns `None` for an empty slice. Even-length input averages the two middle values.
pub fn median_mut(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        Some(values[mid])
    } else {
        Some((values[mid - 1] + values[mid]) / 2.0)
    }
}

/// Median difference between consecutive time stamps.
///
/// Gaps in the light curve barely move the median as long as most samples sit at
/// the nominal cadence. Needs at least two samples.
pub fn median_spacing(time: &[f64]) -> Option<f64> {
    let mut diffs: Vec<f64> = time.windows(2).map(|w| w[1] - w[0]).collect();
    median_mut(&mut diffs)
}
