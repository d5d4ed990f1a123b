//! Complex transfer functions for analog and digital response stages.
//!
//! Two representations cover every linear stage in a station:
//!
//! - [`PoleZero`] - Laplace-domain poles and zeros, evaluated on the
//!   imaginary axis at `s = i·f` or `s = i·2πf`
//! - [`Coefficients`] - digital numerator/denominator polynomials in
//!   `z⁻¹`, evaluated on the unit circle at `z = e^{i2πf/fs}`

use core::f64::consts::PI;
use core::fmt;

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{ResponseError, Result};

/// Domain in which a set of poles and zeros is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransferDomain {
    /// Laplace transform with `s` in Hertz.
    #[serde(rename = "LAPLACE (HERTZ)", alias = "laplace_hertz")]
    LaplaceHertz,
    /// Laplace transform with `s` in radians per second.
    #[serde(rename = "LAPLACE (RADIANS/SECOND)", alias = "laplace_radians")]
    LaplaceRadians,
    /// Digital z-transform.
    #[serde(rename = "DIGITAL (Z-TRANSFORM)", alias = "digital")]
    DigitalZ,
}

impl TransferDomain {
    /// Metadata code for the domain.
    pub fn code(self) -> &'static str {
        match self {
            TransferDomain::LaplaceHertz => "LAPLACE (HERTZ)",
            TransferDomain::LaplaceRadians => "LAPLACE (RADIANS/SECOND)",
            TransferDomain::DigitalZ => "DIGITAL (Z-TRANSFORM)",
        }
    }

    /// Laplace variable on the imaginary axis at `freq_hz`.
    ///
    /// Returns `None` for the z-transform domain, which has no Laplace
    /// variable.
    pub fn laplace_variable(self, freq_hz: f64) -> Option<Complex64> {
        match self {
            TransferDomain::LaplaceHertz => Some(Complex64::new(0.0, freq_hz)),
            TransferDomain::LaplaceRadians => Some(Complex64::new(0.0, 2.0 * PI * freq_hz)),
            TransferDomain::DigitalZ => None,
        }
    }
}

impl fmt::Display for TransferDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Unnormalized pole/zero transfer function
/// `H(s) = ∏(s − zₖ) / ∏(s − pⱼ)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoleZero {
    /// Poles of the transfer function.
    pub poles: Vec<Complex64>,
    /// Zeros of the transfer function.
    pub zeros: Vec<Complex64>,
    /// Domain the roots are expressed in.
    pub domain: TransferDomain,
}

impl PoleZero {
    /// Create a pole/zero set.
    pub fn new(poles: Vec<Complex64>, zeros: Vec<Complex64>, domain: TransferDomain) -> Self {
        Self {
            poles,
            zeros,
            domain,
        }
    }

    /// Evaluate `H` at an arbitrary complex point.
    pub fn evaluate(&self, s: Complex64) -> Complex64 {
        let numerator: Complex64 = self.zeros.iter().map(|&z| s - z).product();
        let denominator: Complex64 = self.poles.iter().map(|&p| s - p).product();
        numerator / denominator
    }

    /// Unnormalized frequency response at `freq_hz`.
    pub fn response(&self, freq_hz: f64) -> Result<Complex64> {
        let s = self
            .domain
            .laplace_variable(freq_hz)
            .ok_or(ResponseError::UnsupportedDomain(self.domain))?;
        Ok(self.evaluate(s))
    }

    /// Express the same response with roots in radians per second.
    ///
    /// Hertz-domain roots are scaled by 2π. A radians-domain set is
    /// returned unchanged; z-transform roots cannot be converted.
    pub fn to_radians(&self) -> Result<PoleZero> {
        let scale = match self.domain {
            TransferDomain::LaplaceRadians => return Ok(self.clone()),
            TransferDomain::LaplaceHertz => 2.0 * PI,
            TransferDomain::DigitalZ => return Err(ResponseError::UnsupportedDomain(self.domain)),
        };
        Ok(PoleZero {
            poles: self.poles.iter().map(|&p| p * scale).collect(),
            zeros: self.zeros.iter().map(|&z| z * scale).collect(),
            domain: TransferDomain::LaplaceRadians,
        })
    }
}

/// Digital filter as numerator and denominator coefficients in powers of
/// `z⁻¹`. An empty denominator means a pure FIR filter.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Coefficients {
    /// Feedforward coefficients `b₀, b₁, ...`.
    pub numerator: Vec<f64>,
    /// Feedback coefficients `a₀, a₁, ...`.
    #[serde(default)]
    pub denominator: Vec<f64>,
}

impl Coefficients {
    /// FIR filter from its taps.
    pub fn fir(taps: Vec<f64>) -> Self {
        Self {
            numerator: taps,
            denominator: Vec::new(),
        }
    }

    /// Returns `true` when there is no feedback polynomial.
    pub fn is_fir(&self) -> bool {
        self.denominator.is_empty()
    }

    /// Complex response at `freq_hz` for a filter running at `sample_rate`.
    pub fn response(&self, freq_hz: f64, sample_rate: f64) -> Complex64 {
        let omega = 2.0 * PI * freq_hz / sample_rate;
        // z⁻¹ on the unit circle
        let z_inv = Complex64::from_polar(1.0, -omega);
        let numerator = horner(&self.numerator, z_inv);
        if self.is_fir() {
            numerator
        } else {
            numerator / horner(&self.denominator, z_inv)
        }
    }

    /// Response at zero frequency (sum of numerator over sum of denominator).
    pub fn dc_gain(&self) -> f64 {
        let numerator: f64 = self.numerator.iter().sum();
        if self.is_fir() {
            numerator
        } else {
            numerator / self.denominator.iter().sum::<f64>()
        }
    }
}

/// Evaluate `c₀ + c₁x + c₂x² + ...` at a complex point.
fn horner(coefficients: &[f64], x: Complex64) -> Complex64 {
    coefficients
        .iter()
        .rev()
        .fold(Complex64::new(0.0, 0.0), |acc, &c| acc * x + c)
}
