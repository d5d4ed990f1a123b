//! Instrument table validation.
//!
//! Checks the physical plausibility of every entry and collects all
//! problems instead of stopping at the first one.
//!
//! # Example
//!
//! ```rust
//! use seisresp_config::{InstrumentTable, validate_table};
//!
//! validate_table(&InstrumentTable::factory()).expect("factory table is valid");
//! ```

use num_complex::Complex64;
use thiserror::Error;

use crate::digitizer::DigitizerModel;
use crate::sensor::{PolynomialSensorModel, SensorModel};
use crate::table::InstrumentTable;

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// A numeric field is outside its valid range.
    #[error("{entry}: {field} = {value} is out of range ({reason})")]
    OutOfRange {
        /// Table key of the entry.
        entry: String,
        /// Field name.
        field: &'static str,
        /// Offending value.
        value: f64,
        /// What the field must satisfy.
        reason: &'static str,
    },

    /// A pole or zero is NaN or infinite.
    #[error("{entry}: {field}[{index}] is not finite")]
    NonFiniteRoot {
        /// Table key of the entry.
        entry: String,
        /// `"poles"` or `"zeros"`.
        field: &'static str,
        /// Index of the root.
        index: usize,
    },

    /// A pole in the right half plane makes the sensor unstable.
    #[error("{entry}: pole {index} ({re}, {im}) is in the right half plane")]
    UnstablePole {
        /// Table key of the entry.
        entry: String,
        /// Index of the pole.
        index: usize,
        /// Real part.
        re: f64,
        /// Imaginary part.
        im: f64,
    },

    /// A polynomial sensor has no coefficients.
    #[error("{0}: polynomial has no coefficients")]
    EmptyPolynomial(String),

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

fn require_positive(errors: &mut Vec<ValidationError>, entry: &str, field: &'static str, value: f64) {
    if !(value.is_finite() && value > 0.0) {
        errors.push(ValidationError::OutOfRange {
            entry: entry.to_string(),
            field,
            value,
            reason: "must be positive and finite",
        });
    }
}

fn check_roots(errors: &mut Vec<ValidationError>, entry: &str, field: &'static str, roots: &[Complex64]) {
    for (index, root) in roots.iter().enumerate() {
        if !root.is_finite() {
            errors.push(ValidationError::NonFiniteRoot {
                entry: entry.to_string(),
                field,
                index,
            });
        }
    }
}

/// Collect problems with one sensor.
pub fn check_sensor(serial: &str, sensor: &SensorModel) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    require_positive(&mut errors, serial, "generator_constant", sensor.generator_constant);
    require_positive(&mut errors, serial, "reference_frequency", sensor.reference_frequency);
    check_roots(&mut errors, serial, "poles", &sensor.poles);
    check_roots(&mut errors, serial, "zeros", &sensor.zeros);
    for (index, pole) in sensor.poles.iter().enumerate() {
        if pole.re > 0.0 {
            errors.push(ValidationError::UnstablePole {
                entry: serial.to_string(),
                index,
                re: pole.re,
                im: pole.im,
            });
        }
    }
    errors
}

/// Collect problems with one polynomial sensor.
pub fn check_polynomial_sensor(name: &str, sensor: &PolynomialSensorModel) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    if sensor.coefficients.is_empty() {
        errors.push(ValidationError::EmptyPolynomial(name.to_string()));
    }
    let (lower, upper) = sensor.approximation_domain;
    if !(lower.is_finite() && upper.is_finite() && lower < upper) {
        errors.push(ValidationError::OutOfRange {
            entry: name.to_string(),
            field: "approximation_domain",
            value: upper,
            reason: "upper bound must exceed lower bound",
        });
    }
    errors
}

/// Collect problems with one digitizer.
pub fn check_digitizer(model: &str, digitizer: &DigitizerModel) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    require_positive(&mut errors, model, "vref", digitizer.vref);
    require_positive(&mut errors, model, "divider", digitizer.divider);
    require_positive(&mut errors, model, "pga_gain", digitizer.pga_gain);
    require_positive(&mut errors, model, "modulator_rate", digitizer.modulator_rate);
    require_positive(&mut errors, model, "reference_frequency", digitizer.reference_frequency);
    if !(2..=32).contains(&digitizer.bits) {
        errors.push(ValidationError::OutOfRange {
            entry: model.to_string(),
            field: "bits",
            value: f64::from(digitizer.bits),
            reason: "must be between 2 and 32",
        });
    }
    if let Some(pole) = digitizer.anti_alias_pole
        && !(pole.is_finite() && pole < 0.0)
    {
        errors.push(ValidationError::OutOfRange {
            entry: model.to_string(),
            field: "anti_alias_pole",
            value: pole,
            reason: "must be negative and finite",
        });
    }
    for sinc in &digitizer.sinc_stages {
        if sinc.order == 0 {
            errors.push(ValidationError::OutOfRange {
                entry: model.to_string(),
                field: "sinc_stages.order",
                value: 0.0,
                reason: "must be at least 1",
            });
        }
        if sinc.length == 0 {
            errors.push(ValidationError::OutOfRange {
                entry: model.to_string(),
                field: "sinc_stages.length",
                value: 0.0,
                reason: "must be at least 1",
            });
        }
        if sinc.factor == 0 {
            errors.push(ValidationError::OutOfRange {
                entry: model.to_string(),
                field: "sinc_stages.factor",
                value: 0.0,
                reason: "must be at least 1",
            });
        }
        if let Some(rate) = sinc.input_rate {
            require_positive(&mut errors, model, "sinc_stages.input_rate", rate);
        }
    }
    errors
}

/// Validate every entry of a table.
///
/// A single problem is returned as itself; several are wrapped in
/// [`ValidationError::Multiple`].
pub fn validate_table(table: &InstrumentTable) -> ValidationResult<()> {
    let mut errors = Vec::new();
    for (serial, sensor) in &table.sensors {
        errors.extend(check_sensor(serial, sensor));
    }
    for (name, sensor) in &table.polynomial_sensors {
        errors.extend(check_polynomial_sensor(name, sensor));
    }
    for (model, digitizer) in &table.digitizers {
        errors.extend(check_digitizer(model, digitizer));
    }

    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(ValidationError::Multiple(errors)),
    }
}
