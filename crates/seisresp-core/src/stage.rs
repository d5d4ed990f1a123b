//! Response stages.
//!
//! A station channel is described as a cascade of stages, each converting
//! one physical unit into the next:
//!
//! - [`PoleZeroStage`] - analog transfer function (sensor, anti-alias filter)
//! - [`FlatGainStage`] - frequency-independent gain (PGA, divider)
//! - [`DigitalFirStage`] - digital coefficients with decimation (ADC, sinc)
//! - [`PolynomialStage`] - non-linear sensor (temperature, pressure)
//!
//! Stages are built once from instrument constants and never modified.
//! Sequence numbers belong to the chain, not to the stage.

use num_complex::Complex64;
use serde::Serialize;

use crate::error::{ResponseError, Result};
use crate::normalize::normalization_factor;
use crate::sinc::{sinc_coefficients, sinc_group_delay_samples};
use crate::transfer::{Coefficients, PoleZero, TransferDomain};
use crate::units::Unit;

/// Analog pole/zero stage normalized to unit magnitude at its gain frequency.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoleZeroStage {
    name: String,
    #[serde(flatten)]
    transfer: PoleZero,
    stage_gain: f64,
    gain_frequency: f64,
    normalization_factor: Option<f64>,
    #[serde(skip)]
    normalization_error: Option<ResponseError>,
    input_unit: Unit,
    output_unit: Unit,
}

impl PoleZeroStage {
    /// Build a stage and compute its normalization factor at `gain_frequency`.
    ///
    /// If normalization is undefined (zero frequency, z-transform roots) the
    /// stage is still built, with no normalization factor. A chain excludes
    /// such a stage from its overall sensitivity.
    pub fn new(
        name: impl Into<String>,
        transfer: PoleZero,
        stage_gain: f64,
        gain_frequency: f64,
        input_unit: Unit,
        output_unit: Unit,
    ) -> Self {
        let name = name.into();
        let (normalization_factor, normalization_error) = match normalization_factor(
            &transfer.poles,
            &transfer.zeros,
            gain_frequency,
            transfer.domain,
        ) {
            Ok(a0) => (Some(a0), None),
            Err(err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(stage = %name, error = %err, "pole-zero stage left unnormalized");
                (None, Some(err))
            }
        };

        Self {
            name,
            transfer,
            stage_gain,
            gain_frequency,
            normalization_factor,
            normalization_error,
            input_unit,
            output_unit,
        }
    }

    /// Stage name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Poles of the unnormalized transfer function.
    pub fn poles(&self) -> &[Complex64] {
        &self.transfer.poles
    }

    /// Zeros of the unnormalized transfer function.
    pub fn zeros(&self) -> &[Complex64] {
        &self.transfer.zeros
    }

    /// Domain of the poles and zeros.
    pub fn domain(&self) -> TransferDomain {
        self.transfer.domain
    }

    /// Pole/zero set.
    pub fn transfer(&self) -> &PoleZero {
        &self.transfer
    }

    /// Gain at the gain frequency.
    pub fn stage_gain(&self) -> f64 {
        self.stage_gain
    }

    /// Frequency at which the gain is defined and the stage is normalized.
    pub fn gain_frequency(&self) -> f64 {
        self.gain_frequency
    }

    /// A0, if normalization was defined.
    pub fn normalization_factor(&self) -> Option<f64> {
        self.normalization_factor
    }

    /// Input unit.
    pub fn input_unit(&self) -> &Unit {
        &self.input_unit
    }

    /// Output unit.
    pub fn output_unit(&self) -> &Unit {
        &self.output_unit
    }

    /// Normalized response `gain · A0 · H(s)` at `freq_hz`.
    pub fn response(&self, freq_hz: f64) -> Result<Complex64> {
        let a0 = match (self.normalization_factor, &self.normalization_error) {
            (Some(a0), _) => a0,
            (None, Some(err)) => return Err(err.clone()),
            (None, None) => {
                return Err(ResponseError::UndefinedReferenceFrequency(self.gain_frequency));
            }
        };
        Ok(self.transfer.response(freq_hz)? * (a0 * self.stage_gain))
    }
}

/// Frequency-independent gain.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlatGainStage {
    /// Stage name.
    pub name: String,
    /// Gain (output units per input unit).
    pub stage_gain: f64,
    /// Input unit.
    pub input_unit: Unit,
    /// Output unit.
    pub output_unit: Unit,
}

impl FlatGainStage {
    /// Create a flat gain stage.
    pub fn new(name: impl Into<String>, stage_gain: f64, input_unit: Unit, output_unit: Unit) -> Self {
        Self {
            name: name.into(),
            stage_gain,
            input_unit,
            output_unit,
        }
    }
}

/// Decimation attached to a digital stage.
///
/// Offset, delay and correction of the sinc stages are not characterized
/// for the digitizers modeled here and are carried as explicit zeros.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Decimation {
    /// Sample rate entering the stage (Hz).
    pub input_sample_rate: f64,
    /// Integer decimation factor.
    pub factor: u32,
    /// Sample offset chosen for decimation.
    pub offset: u32,
    /// Estimated group delay (s).
    pub delay: f64,
    /// Delay correction applied (s).
    pub correction: f64,
}

impl Decimation {
    /// Decimation with zero offset, delay and correction.
    pub fn new(input_sample_rate: f64, factor: u32) -> Self {
        Self {
            input_sample_rate,
            factor,
            offset: 0,
            delay: 0.0,
            correction: 0.0,
        }
    }

    /// Sample rate leaving the stage.
    pub fn output_sample_rate(&self) -> f64 {
        self.input_sample_rate / f64::from(self.factor.max(1))
    }
}

/// Digital coefficient stage with decimation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DigitalFirStage {
    /// Stage name.
    pub name: String,
    /// Numerator and denominator in powers of z⁻¹.
    pub coefficients: Coefficients,
    /// Gain at DC.
    pub stage_gain: f64,
    /// Decimation parameters.
    pub decimation: Decimation,
    /// Input unit.
    pub input_unit: Unit,
    /// Output unit.
    pub output_unit: Unit,
}

impl DigitalFirStage {
    /// Sinc decimation stage, `COUNTS → COUNTS`, unity gain.
    ///
    /// The filter's group delay in samples is `(taps − 1)/2`; it is not
    /// written into the decimation block, which keeps zero offset, delay
    /// and correction.
    pub fn sinc(
        name: impl Into<String>,
        order: usize,
        length: usize,
        input_sample_rate: f64,
        factor: u32,
    ) -> Result<Self> {
        let taps = sinc_coefficients(order, length)?;
        Ok(Self {
            name: name.into(),
            coefficients: Coefficients::fir(taps),
            stage_gain: 1.0,
            decimation: Decimation::new(input_sample_rate, factor),
            input_unit: Unit::Counts,
            output_unit: Unit::Counts,
        })
    }

    /// Sigma-delta modulator: a single unit tap converting volts to counts.
    pub fn modulator(name: impl Into<String>, stage_gain: f64, input_sample_rate: f64) -> Self {
        Self {
            name: name.into(),
            coefficients: Coefficients::fir(vec![1.0]),
            stage_gain,
            decimation: Decimation::new(input_sample_rate, 1),
            input_unit: Unit::Volts,
            output_unit: Unit::Counts,
        }
    }

    /// Group delay of the coefficients, in seconds at the input rate.
    ///
    /// Only meaningful for symmetric FIR filters such as sinc stages.
    pub fn filter_delay(&self) -> f64 {
        sinc_group_delay_samples(self.coefficients.numerator.len())
            / self.decimation.input_sample_rate
    }

    /// Sample rate leaving the stage.
    pub fn output_sample_rate(&self) -> f64 {
        self.decimation.output_sample_rate()
    }

    /// Response at `freq_hz`, scaled so that DC equals the stage gain.
    pub fn response(&self, freq_hz: f64) -> Complex64 {
        let h = self
            .coefficients
            .response(freq_hz, self.decimation.input_sample_rate);
        let dc = self.coefficients.dc_gain();
        if dc.is_finite() && dc != 0.0 {
            h * (self.stage_gain / dc.abs())
        } else {
            h * self.stage_gain
        }
    }
}

/// Non-linear stage described by a polynomial.
///
/// The polynomial maps a value in the stage's output unit back to the
/// measured quantity in its input unit: `input = Σ cᵢ · outputⁱ`. An LM35
/// temperature sensor (10 mV/°C) is `[0.0, 100.0]` from `DEGC` to `V`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolynomialStage {
    /// Stage name.
    pub name: String,
    /// Coefficients in ascending powers.
    pub coefficients: Vec<f64>,
    /// Range of the measured quantity over which the polynomial holds.
    pub approximation_domain: (f64, f64),
    /// Measured quantity.
    pub input_unit: Unit,
    /// Electrical output.
    pub output_unit: Unit,
}

impl PolynomialStage {
    /// Create a polynomial stage.
    pub fn new(
        name: impl Into<String>,
        coefficients: Vec<f64>,
        approximation_domain: (f64, f64),
        input_unit: Unit,
        output_unit: Unit,
    ) -> Self {
        Self {
            name: name.into(),
            coefficients,
            approximation_domain,
            input_unit,
            output_unit,
        }
    }

    /// Measured quantity for an output value.
    pub fn evaluate(&self, output_value: f64) -> f64 {
        evaluate_polynomial(&self.coefficients, output_value)
    }

    /// Coefficients re-expressed for an output scaled by `gain`
    /// (`cᵢ / gainⁱ`).
    pub fn rescaled(&self, gain: f64) -> Vec<f64> {
        let mut scale = 1.0;
        self.coefficients
            .iter()
            .map(|&c| {
                let v = c / scale;
                scale *= gain;
                v
            })
            .collect()
    }
}

/// Evaluate `c₀ + c₁x + c₂x² + ...`.
pub fn evaluate_polynomial(coefficients: &[f64], x: f64) -> f64 {
    coefficients.iter().rev().fold(0.0, |acc, &c| acc * x + c)
}

/// One stage of an instrument response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponseStage {
    /// Analog poles and zeros.
    PoleZero(PoleZeroStage),
    /// Flat gain.
    FlatGain(FlatGainStage),
    /// Digital coefficients and decimation.
    DigitalFir(DigitalFirStage),
    /// Non-linear polynomial.
    Polynomial(PolynomialStage),
}

impl ResponseStage {
    /// Stage name.
    pub fn name(&self) -> &str {
        match self {
            ResponseStage::PoleZero(s) => s.name(),
            ResponseStage::FlatGain(s) => &s.name,
            ResponseStage::DigitalFir(s) => &s.name,
            ResponseStage::Polynomial(s) => &s.name,
        }
    }

    /// Short label for the variant.
    pub fn kind(&self) -> &'static str {
        match self {
            ResponseStage::PoleZero(_) => "PolesZerosResponseStage",
            ResponseStage::FlatGain(_) => "ResponseStage",
            ResponseStage::DigitalFir(_) => "CoefficientsTypeResponseStage",
            ResponseStage::Polynomial(_) => "PolynomialResponseStage",
        }
    }

    /// Input unit.
    pub fn input_unit(&self) -> &Unit {
        match self {
            ResponseStage::PoleZero(s) => s.input_unit(),
            ResponseStage::FlatGain(s) => &s.input_unit,
            ResponseStage::DigitalFir(s) => &s.input_unit,
            ResponseStage::Polynomial(s) => &s.input_unit,
        }
    }

    /// Output unit.
    pub fn output_unit(&self) -> &Unit {
        match self {
            ResponseStage::PoleZero(s) => s.output_unit(),
            ResponseStage::FlatGain(s) => &s.output_unit,
            ResponseStage::DigitalFir(s) => &s.output_unit,
            ResponseStage::Polynomial(s) => &s.output_unit,
        }
    }

    /// Scalar gain, `None` for a polynomial stage.
    pub fn stage_gain(&self) -> Option<f64> {
        match self {
            ResponseStage::PoleZero(s) => Some(s.stage_gain()),
            ResponseStage::FlatGain(s) => Some(s.stage_gain),
            ResponseStage::DigitalFir(s) => Some(s.stage_gain),
            ResponseStage::Polynomial(_) => None,
        }
    }

    /// Frequency an analog stage is normalized at.
    pub fn gain_frequency(&self) -> Option<f64> {
        match self {
            ResponseStage::PoleZero(s) => Some(s.gain_frequency()),
            _ => None,
        }
    }

    /// Complex response at `freq_hz`.
    pub fn response(&self, freq_hz: f64) -> Result<Complex64> {
        match self {
            ResponseStage::PoleZero(s) => s.response(freq_hz),
            ResponseStage::FlatGain(s) => Ok(Complex64::new(s.stage_gain, 0.0)),
            ResponseStage::DigitalFir(s) => Ok(s.response(freq_hz)),
            ResponseStage::Polynomial(s) => Err(ResponseError::NonLinearStage(s.name.clone())),
        }
    }
}

impl From<PoleZeroStage> for ResponseStage {
    fn from(stage: PoleZeroStage) -> Self {
        ResponseStage::PoleZero(stage)
    }
}

impl From<FlatGainStage> for ResponseStage {
    fn from(stage: FlatGainStage) -> Self {
        ResponseStage::FlatGain(stage)
    }
}

impl From<DigitalFirStage> for ResponseStage {
    fn from(stage: DigitalFirStage) -> Self {
        ResponseStage::DigitalFir(stage)
    }
}

impl From<PolynomialStage> for ResponseStage {
    fn from(stage: PolynomialStage) -> Self {
        ResponseStage::Polynomial(stage)
    }
}
