//! Velocity / acceleration conversion in the frequency domain.
//!
//! Differentiation is multiplication by `i·2πf`, so a velocity power
//! spectrum becomes acceleration by `(2πf)²` and an amplitude spectrum by
//! `2πf`. Apply the same conversion to every curve that will be compared;
//! mixing velocity and acceleration curves is a caller error.
//!
//! Each function pairs frequencies with values one to one and fails with
//! [`AnalysisError::LengthMismatch`] when the two differ in length.

use num_complex::Complex64;
use std::f64::consts::PI;

use crate::error::{AnalysisError, Result};

fn omega(freq_hz: f64) -> f64 {
    2.0 * PI * freq_hz
}

fn map_bins<T: Copy>(frequencies: &[f64], values: &[T], f: impl Fn(f64, T) -> T) -> Result<Vec<T>> {
    if values.len() != frequencies.len() {
        return Err(AnalysisError::LengthMismatch {
            what: "spectrum",
            expected: frequencies.len(),
            found: values.len(),
        });
    }
    Ok(frequencies
        .iter()
        .zip(values)
        .map(|(&freq, &v)| f(freq, v))
        .collect())
}

/// Velocity PSD to acceleration PSD: `× (2πf)²`.
pub fn velocity_to_acceleration_power(frequencies: &[f64], psd: &[f64]) -> Result<Vec<f64>> {
    map_bins(frequencies, psd, |f, p| p * omega(f).powi(2))
}

/// Acceleration PSD to velocity PSD: `÷ (2πf)²`. The DC bin becomes
/// non-finite.
pub fn acceleration_to_velocity_power(frequencies: &[f64], psd: &[f64]) -> Result<Vec<f64>> {
    map_bins(frequencies, psd, |f, p| p / omega(f).powi(2))
}

/// Velocity amplitude spectrum to acceleration: `× 2πf`.
pub fn velocity_to_acceleration_amplitude(frequencies: &[f64], amplitude: &[f64]) -> Result<Vec<f64>> {
    map_bins(frequencies, amplitude, |f, a| a * omega(f))
}

/// Acceleration amplitude spectrum to velocity: `÷ 2πf`.
pub fn acceleration_to_velocity_amplitude(frequencies: &[f64], amplitude: &[f64]) -> Result<Vec<f64>> {
    map_bins(frequencies, amplitude, |f, a| a / omega(f))
}

/// Velocity CSD to acceleration CSD: `× (2πf)²`.
pub fn velocity_to_acceleration_cross(frequencies: &[f64], csd: &[Complex64]) -> Result<Vec<Complex64>> {
    map_bins(frequencies, csd, |f, c| c * omega(f).powi(2))
}

/// Acceleration CSD to velocity CSD: `÷ (2πf)²`.
pub fn acceleration_to_velocity_cross(frequencies: &[f64], csd: &[Complex64]) -> Result<Vec<Complex64>> {
    map_bins(frequencies, csd, |f, c| c / omega(f).powi(2))
}

/// Scale raw counts to physical units (e.g. `1.87e-9` m/s per count).
pub fn scale_samples(samples: &[f64], scale: f64) -> Vec<f64> {
    samples.iter().map(|&s| s * scale).collect()
}
