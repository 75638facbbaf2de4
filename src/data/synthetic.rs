//! Synthetic square-wave transit light curves.
//!
//! Used as a known-answer fixture: a flat baseline with a box-shaped dip of fixed
//! width repeated every `period` samples, optionally with seeded Gaussian noise.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::LightCurve;
use crate::error::AppError;

/// Shape of the injected signal. All lengths are in samples.
#[derive(Debug, Clone)]
pub struct SquareWave {
    pub samples: usize,
    /// Time between samples (days).
    pub cadence: f64,
    pub period: usize,
    pub width: usize,
    /// Offset of the first transit from the first sample.
    pub phase: usize,
    /// Added to the baseline inside a transit (negative for a dip).
    pub depth: f64,
    pub baseline: f64,
    /// Gaussian noise standard deviation; `0` disables noise.
    pub noise_sigma: f64,
    pub seed: u64,
}

impl Default for SquareWave {
    fn default() -> Self {
        Self {
            samples: 20_000,
            cadence: 0.020433,
            period: 200,
            width: 20,
            phase: 30,
            depth: -10.0,
            baseline: 0.0,
            noise_sigma: 0.0,
            seed: 42,
        }
    }
}

impl SquareWave {
    /// Time span covered by the samples plus half a cadence.
    ///
    /// Using this as the segment size gives one segment whose bin edges fall
    /// between samples when `nbins == samples`.
    pub fn single_segment_size(&self) -> f64 {
        (self.samples as f64 + 0.5) * self.cadence
    }

    /// Sample index of the first transit's first point.
    pub fn first_transit_start(&self) -> usize {
        self.phase % self.samples.max(1)
    }
}

/// Generate the light curve described by `spec`.
pub fn generate_square_wave(spec: &SquareWave) -> Result<LightCurve, AppError> {
    if spec.samples == 0 {
        return Err(AppError::invalid_argument("Sample count must be > 0."));
    }
    if spec.period == 0 || spec.width > spec.period {
        return Err(AppError::invalid_argument(format!(
            "Invalid transit shape: period={}, width={} (need period > 0 and width <= period).",
            spec.period, spec.width
        )));
    }
    if !(spec.cadence.is_finite() && spec.cadence > 0.0) {
        return Err(AppError::invalid_argument("Cadence must be finite and > 0."));
    }
    if !(spec.depth.is_finite() && spec.baseline.is_finite()) {
        return Err(AppError::invalid_argument("Depth and baseline must be finite."));
    }
    if !(spec.noise_sigma.is_finite() && spec.noise_sigma >= 0.0) {
        return Err(AppError::invalid_argument("Noise sigma must be finite and >= 0."));
    }

    let time: Vec<f64> = (0..spec.samples).map(|i| i as f64 * spec.cadence).collect();
    let mut flux = vec![spec.baseline; spec.samples];

    let n_transits = spec.samples / spec.period;
    for k in 0..n_transits {
        for x in 0..spec.width {
            flux[(k * spec.period + x + spec.phase) % spec.samples] += spec.depth;
        }
    }

    if spec.noise_sigma > 0.0 {
        let mut rng = StdRng::seed_from_u64(spec.seed);
        let normal = Normal::new(0.0, spec.noise_sigma)
            .map_err(|e| AppError::new(4, format!("Noise distribution error: {e}")))?;
        for f in &mut flux {
            *f += normal.sample(&mut rng);
        }
    }

    let flux_err = vec![spec.noise_sigma; spec.samples];
    LightCurve::new(time, flux, flux_err)
}
