//! Coherence and instrument self-noise (Holcomb's method).
//!
//! Two co-located sensors see the same ground motion but carry independent
//! electronic noise. Per frequency bin the coherence
//!
//! ```text
//! γ² = |Pxy|² / (Pxx · Pyy)
//! ```
//!
//! measures how much of the power is shared, and `Pxx · (1 − γ)` is the
//! part of each channel's power the other channel cannot explain: its
//! self-noise.
//!
//! The estimate is only meaningful when both sensors share one input
//! (co-located, same orientation, same units). That is a property of the
//! deployment and is not checked here.
//!
//! Values are returned on a linear scale and numeric anomalies are kept:
//! γ² slightly above one from estimation noise is not clipped, and a zero
//! PSD bin yields NaN or infinity for that bin only.

use num_complex::Complex64;
use serde::Serialize;

use crate::error::{AnalysisError, Result};
use crate::spectrum::SpectralEstimator;

/// Per-bin coherence, cross phase and self-noise of two channels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoherenceResult {
    /// Bin frequencies (Hz).
    pub frequencies: Vec<f64>,
    /// Coherence γ², as estimated.
    pub gamma_squared: Vec<f64>,
    /// Cross-spectrum phase in degrees, wrapped to `[-90, 270)`.
    pub phase_deg: Vec<f64>,
    /// Self-noise PSD of the first channel.
    pub self_noise_1: Vec<f64>,
    /// Self-noise PSD of the second channel.
    pub self_noise_2: Vec<f64>,
}

impl CoherenceResult {
    /// Coherence amplitude γ.
    pub fn gamma(&self) -> Vec<f64> {
        self.gamma_squared.iter().map(|g| g.sqrt()).collect()
    }

    /// Number of frequency bins.
    pub fn len(&self) -> usize {
        self.gamma_squared.len()
    }

    /// Returns `true` if there are no bins.
    pub fn is_empty(&self) -> bool {
        self.gamma_squared.is_empty()
    }
}

/// Wrap a phase in degrees so that values below −90° gain 360°.
pub fn wrap_phase_deg(phase: f64) -> f64 {
    if phase < -90.0 { phase + 360.0 } else { phase }
}

/// Estimate coherence and self-noise from two PSDs and their CSD.
///
/// All four slices must have the same length.
pub fn estimate(psd1: &[f64], psd2: &[f64], csd: &[Complex64], frequencies: &[f64]) -> Result<CoherenceResult> {
    let n = psd1.len();
    for (what, len) in [("psd2", psd2.len()), ("csd", csd.len()), ("frequencies", frequencies.len())] {
        if len != n {
            return Err(AnalysisError::LengthMismatch {
                what,
                expected: n,
                found: len,
            });
        }
    }

    let mut gamma_squared = Vec::with_capacity(n);
    let mut phase_deg = Vec::with_capacity(n);
    let mut self_noise_1 = Vec::with_capacity(n);
    let mut self_noise_2 = Vec::with_capacity(n);

    for ((&p1, &p2), c) in psd1.iter().zip(psd2).zip(csd) {
        let g2 = c.norm_sqr() / (p1 * p2);
        let uncorrelated = 1.0 - g2.sqrt();
        gamma_squared.push(g2);
        phase_deg.push(wrap_phase_deg(c.arg().to_degrees()));
        self_noise_1.push(p1 * uncorrelated);
        self_noise_2.push(p2 * uncorrelated);
    }

    Ok(CoherenceResult {
        frequencies: frequencies.to_vec(),
        gamma_squared,
        phase_deg,
        self_noise_1,
        self_noise_2,
    })
}

/// Estimate PSDs and CSD of two equal-length recordings, then coherence.
pub fn estimate_from_samples(x: &[f64], y: &[f64], estimator: &SpectralEstimator) -> Result<CoherenceResult> {
    let psd1 = estimator.psd(x)?;
    let psd2 = estimator.psd(y)?;
    let csd = estimator.csd(x, y)?;
    estimate(&psd1.values, &psd2.values, &csd.values, &psd1.frequencies)
}
