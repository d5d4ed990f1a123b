//! Normalization factor (A0) for pole/zero stages.
//!
//! A0 scales an unnormalized pole/zero response so that its magnitude is
//! exactly one at the stage's reference frequency:
//!
//! ```text
//!            ∏(s − zₖ)
//! A0 · | ------------- | = 1      s = i·f (Hz)  or  i·2πf (rad/s)
//!            ∏(s − pⱼ)
//! ```
//!
//! so `A0 = |∏(s − pⱼ)| / |∏(s − zₖ)|`. The stage gain is then the
//! stage's magnitude at that frequency.

use num_complex::Complex64;

use crate::error::{ResponseError, Result};
use crate::transfer::TransferDomain;

/// Compute A0 for a pole/zero set at `reference_frequency`.
///
/// Fails with [`ResponseError::UndefinedReferenceFrequency`] when the
/// frequency is zero, negative or not finite, and with
/// [`ResponseError::UnsupportedDomain`] for z-transform roots. Callers that
/// get an error must leave the factor out rather than substitute a value.
///
/// # Example
///
/// ```rust
/// use num_complex::Complex64;
/// use seisresp_core::{normalization_factor, TransferDomain};
///
/// // Single pole at -586 rad/s (93 Hz RC corner), normalized at 1 Hz
/// let a0 = normalization_factor(
///     &[Complex64::new(-586.0, 0.0)],
///     &[],
///     1.0,
///     TransferDomain::LaplaceRadians,
/// ).unwrap();
/// assert!((a0 - 586.0).abs() < 0.1);
/// ```
pub fn normalization_factor(
    poles: &[Complex64],
    zeros: &[Complex64],
    reference_frequency: f64,
    domain: TransferDomain,
) -> Result<f64> {
    if !reference_frequency.is_finite() || reference_frequency <= 0.0 {
        return Err(ResponseError::UndefinedReferenceFrequency(reference_frequency));
    }
    let s = domain
        .laplace_variable(reference_frequency)
        .ok_or(ResponseError::UnsupportedDomain(domain))?;

    let mut a0 = Complex64::new(1.0, 0.0);
    for &p in poles {
        a0 *= s - p;
    }
    for &z in zeros {
        a0 /= s - z;
    }
    Ok(a0.norm())
}
