//! Sinc decimation filter synthesis.
//!
//! Sigma-delta converters decimate through cascaded moving-average stages.
//! An order-n sinc filter is n boxcars of the same length in series, so its
//! taps are the boxcar convolved with itself n − 1 times.

use crate::error::{ResponseError, Result};

/// Coefficients of an order-`order` sinc filter built from boxcars of
/// `length` taps.
///
/// Order 1 is the boxcar itself, every tap `1/length`. Each further order
/// full-convolves the running taps with the boxcar, so the result has
/// `(order − 1)·(length − 1) + length` taps, is symmetric, and sums to one.
/// No group delay compensation is applied; record it separately with
/// [`sinc_group_delay_samples`].
///
/// # Example
///
/// ```rust
/// use seisresp_core::sinc_coefficients;
///
/// let sinc3 = sinc_coefficients(3, 4).unwrap();
/// assert_eq!(sinc3.len(), 10);
/// assert!((sinc3.iter().sum::<f64>() - 1.0).abs() < 1e-12);
/// ```
pub fn sinc_coefficients(order: usize, length: usize) -> Result<Vec<f64>> {
    if order == 0 || length == 0 {
        return Err(ResponseError::InvalidSincParameters { order, length });
    }

    let boxcar = vec![1.0 / length as f64; length];
    let mut taps = boxcar.clone();
    for _ in 1..order {
        taps = convolve_full(&taps, &boxcar);
    }
    Ok(taps)
}

/// Full linear convolution, output length `a.len() + b.len() − 1`.
///
/// Returns an empty vector if either input is empty.
pub fn convolve_full(a: &[f64], b: &[f64]) -> Vec<f64> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }
    let mut out = vec![0.0; a.len() + b.len() - 1];
    for (i, &x) in a.iter().enumerate() {
        for (j, &y) in b.iter().enumerate() {
            out[i + j] += x * y;
        }
    }
    out
}

/// Delay of a symmetric FIR filter with `num_taps` taps, in input samples.
pub fn sinc_group_delay_samples(num_taps: usize) -> f64 {
    num_taps.saturating_sub(1) as f64 / 2.0
}
