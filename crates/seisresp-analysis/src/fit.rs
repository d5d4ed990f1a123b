//! Least-squares line fit.
//!
//! Used to estimate a sensor's temperature coefficient, e.g. centering
//! force volts against internal temperature.

use serde::Serialize;

use crate::error::{AnalysisError, Result};

/// `y = slope·x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearFit {
    /// Change in `y` per unit `x`.
    pub slope: f64,
    /// Value of `y` at `x = 0`.
    pub intercept: f64,
}

impl LinearFit {
    /// Evaluate the line.
    pub fn evaluate(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Degree-1 least-squares fit of `y` against `x`.
pub fn linear_fit(x: &[f64], y: &[f64]) -> Result<LinearFit> {
    if x.len() != y.len() {
        return Err(AnalysisError::LengthMismatch {
            what: "y",
            expected: x.len(),
            found: y.len(),
        });
    }
    let n = x.len();
    if n < 2 {
        return Err(AnalysisError::InsufficientData(n));
    }

    let x_mean = x.iter().sum::<f64>() / n as f64;
    let y_mean = y.iter().sum::<f64>() / n as f64;
    let (sxy, sxx) = x.iter().zip(y).fold((0.0, 0.0), |(sxy, sxx), (&xi, &yi)| {
        let dx = xi - x_mean;
        (sxy + dx * (yi - y_mean), sxx + dx * dx)
    });
    if sxx == 0.0 {
        return Err(AnalysisError::InsufficientData(n));
    }

    let slope = sxy / sxx;
    Ok(LinearFit {
        slope,
        intercept: y_mean - slope * x_mean,
    })
}
