//! Response chain assembly.
//!
//! A chain is built in two phases. [`ResponseChainBuilder`] collects stages
//! in order; [`ResponseChainBuilder::finalize`] validates the whole list,
//! numbers the stages `1..N` and derives the overall sensitivity, returning
//! an immutable [`ResponseChain`].
//!
//! ```rust
//! use seisresp_core::{FlatGainStage, ResponseChainBuilder, Unit};
//!
//! let chain = ResponseChainBuilder::new()
//!     .accumulate(FlatGainStage::new("preamp", 10.0, Unit::Volts, Unit::Volts))
//!     .accumulate(FlatGainStage::new("ADC", 1000.0, Unit::Volts, Unit::Counts))
//!     .finalize()
//!     .unwrap();
//!
//! assert_eq!(chain.len(), 2);
//! assert_eq!(chain.sensitivity().and_then(|s| s.scalar()), Some(10_000.0));
//! ```

use num_complex::Complex64;
use serde::Serialize;

use crate::error::{ResponseError, Result};
use crate::stage::{PolynomialStage, ResponseStage, evaluate_polynomial};
use crate::units::Unit;

/// Relative tolerance for treating two reference frequencies as equal.
const FREQUENCY_TOLERANCE: f64 = 1e-9;

/// Overall sensitivity of a finalized chain.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Sensitivity {
    /// Product of all linear stage gains.
    Scalar {
        /// Output units per input unit.
        value: f64,
        /// Frequency the value holds at, when the chain has analog stages.
        frequency: Option<f64>,
        /// Chain input unit.
        input_unit: Unit,
        /// Chain output unit.
        output_unit: Unit,
    },
    /// Non-linear sensor expressed directly in digitizer output units.
    Polynomial {
        /// Coefficients in ascending powers of the chain output value.
        coefficients: Vec<f64>,
        /// Range of the measured quantity over which the polynomial holds.
        approximation_domain: (f64, f64),
        /// Measured quantity.
        input_unit: Unit,
        /// Digitizer output unit.
        output_unit: Unit,
    },
}

impl Sensitivity {
    /// Scalar value, if this is a linear sensitivity.
    pub fn scalar(&self) -> Option<f64> {
        match self {
            Sensitivity::Scalar { value, .. } => Some(*value),
            Sensitivity::Polynomial { .. } => None,
        }
    }

    /// Chain input unit.
    pub fn input_unit(&self) -> &Unit {
        match self {
            Sensitivity::Scalar { input_unit, .. } | Sensitivity::Polynomial { input_unit, .. } => {
                input_unit
            }
        }
    }

    /// Chain output unit.
    pub fn output_unit(&self) -> &Unit {
        match self {
            Sensitivity::Scalar { output_unit, .. } | Sensitivity::Polynomial { output_unit, .. } => {
                output_unit
            }
        }
    }

    /// Convert a raw chain output value (counts) to the measured quantity.
    pub fn to_physical(&self, output_value: f64) -> f64 {
        match self {
            Sensitivity::Scalar { value, .. } => output_value / value,
            Sensitivity::Polynomial { coefficients, .. } => {
                evaluate_polynomial(coefficients, output_value)
            }
        }
    }
}

/// Something the chain recovered from during finalization.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChainWarning {
    /// A pole-zero stage had no normalization factor and its gain was left
    /// out of the scalar sensitivity.
    UnnormalizedStage {
        /// Sequence number of the stage.
        sequence: u32,
        /// Stage name.
        name: String,
    },
    /// Polynomial sensitivity could not be derived; the chain has none.
    DerivationFailed {
        /// Why derivation failed.
        reason: String,
    },
}

/// A stage together with its position in a chain.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumberedStage {
    /// 1-based position.
    pub sequence: u32,
    /// The stage.
    pub stage: ResponseStage,
}

/// Collects stages for a [`ResponseChain`].
#[derive(Debug, Clone, Default)]
pub struct ResponseChainBuilder {
    stages: Vec<ResponseStage>,
}

impl ResponseChainBuilder {
    /// Empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one stage.
    pub fn accumulate(mut self, stage: impl Into<ResponseStage>) -> Self {
        self.stages.push(stage.into());
        self
    }

    /// Append stages in order.
    pub fn accumulate_all<I>(mut self, stages: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<ResponseStage>,
    {
        self.stages.extend(stages.into_iter().map(Into::into));
        self
    }

    /// Append one stage in place.
    pub fn push(&mut self, stage: impl Into<ResponseStage>) {
        self.stages.push(stage.into());
    }

    /// Number of stages collected so far.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Returns `true` if no stage has been added.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Validate, number and seal the chain.
    ///
    /// Checks, in order: the chain is not empty, each stage's output unit is
    /// the next stage's input unit, a polynomial stage appears only first,
    /// and every pole-zero stage shares one gain frequency. Any failure
    /// aborts the whole chain.
    ///
    /// Sensitivity derivation follows: a polynomial first stage yields a
    /// polynomial sensitivity in digitizer output units, anything else the
    /// product of stage gains. Problems at this point are recovered and
    /// reported through [`ResponseChain::warnings`].
    pub fn finalize(self) -> Result<ResponseChain> {
        let stages = self.stages;
        if stages.is_empty() {
            return Err(ResponseError::EmptyChain);
        }

        for (i, pair) in stages.windows(2).enumerate() {
            if pair[0].output_unit() != pair[1].input_unit() {
                return Err(ResponseError::UnitMismatch {
                    sequence: sequence_number(i),
                    output: pair[0].output_unit().clone(),
                    input: pair[1].input_unit().clone(),
                });
            }
        }

        if let Some(i) = stages
            .iter()
            .skip(1)
            .position(|stage| matches!(stage, ResponseStage::Polynomial(_)))
        {
            return Err(ResponseError::MisplacedPolynomial(sequence_number(i + 1)));
        }

        let mut reference_frequency: Option<f64> = None;
        for (i, stage) in stages.iter().enumerate() {
            let Some(found) = stage.gain_frequency() else {
                continue;
            };
            match reference_frequency {
                None => reference_frequency = Some(found),
                Some(expected) if !same_frequency(expected, found) => {
                    return Err(ResponseError::ReferenceFrequencyMismatch {
                        sequence: sequence_number(i),
                        expected,
                        found,
                    });
                }
                Some(_) => {}
            }
        }

        let stages: Vec<NumberedStage> = stages
            .into_iter()
            .enumerate()
            .map(|(i, stage)| NumberedStage {
                sequence: sequence_number(i),
                stage,
            })
            .collect();

        let mut warnings = Vec::new();
        let sensitivity = match &stages[0].stage {
            ResponseStage::Polynomial(sensor) => {
                match polynomial_sensitivity(sensor, &stages[1..]) {
                    Ok(sensitivity) => Some(sensitivity),
                    Err(err) => {
                        #[cfg(feature = "tracing")]
                        tracing::warn!(sensor = %sensor.name, error = %err, "chain left without sensitivity");
                        warnings.push(ChainWarning::DerivationFailed {
                            reason: err.to_string(),
                        });
                        None
                    }
                }
            }
            _ => Some(scalar_sensitivity(&stages, reference_frequency, &mut warnings)),
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(
            stages = stages.len(),
            sensitivity = ?sensitivity.as_ref().and_then(Sensitivity::scalar),
            "response chain finalized"
        );

        Ok(ResponseChain {
            stages,
            sensitivity,
            reference_frequency,
            warnings,
        })
    }
}

/// Compose an optional sensor stage with a digitizer's stages.
///
/// Channels without a sensor (shorted-input noise tests, housekeeping
/// voltages) pass `None` and get a digitizer-only chain. Sequence numbers
/// always run `1..N` in composition order.
pub fn compose(sensor: Option<ResponseStage>, digitizer: &[ResponseStage]) -> Result<ResponseChain> {
    ResponseChainBuilder::new()
        .accumulate_all(sensor)
        .accumulate_all(digitizer.iter().cloned())
        .finalize()
}

/// Immutable, numbered cascade of response stages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseChain {
    stages: Vec<NumberedStage>,
    sensitivity: Option<Sensitivity>,
    reference_frequency: Option<f64>,
    warnings: Vec<ChainWarning>,
}

impl ResponseChain {
    /// Stages in sequence order.
    pub fn stages(&self) -> &[NumberedStage] {
        &self.stages
    }

    /// Stage with the given sequence number.
    pub fn stage(&self, sequence: u32) -> Option<&ResponseStage> {
        let index = usize::try_from(sequence).ok()?.checked_sub(1)?;
        self.stages.get(index).map(|numbered| &numbered.stage)
    }

    /// Number of stages.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Always `false`: an empty chain cannot be finalized.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Input unit of the first stage.
    pub fn input_unit(&self) -> &Unit {
        self.stages[0].stage.input_unit()
    }

    /// Output unit of the last stage.
    pub fn output_unit(&self) -> &Unit {
        self.stages[self.stages.len() - 1].stage.output_unit()
    }

    /// Overall sensitivity, `None` after a recovered derivation failure.
    pub fn sensitivity(&self) -> Option<&Sensitivity> {
        self.sensitivity.as_ref()
    }

    /// Gain frequency shared by the chain's pole-zero stages.
    pub fn reference_frequency(&self) -> Option<f64> {
        self.reference_frequency
    }

    /// Problems recovered from during finalization.
    pub fn warnings(&self) -> &[ChainWarning] {
        &self.warnings
    }

    /// Release the stages, without numbering, for recomposition.
    pub fn into_stages(self) -> Vec<ResponseStage> {
        self.stages.into_iter().map(|numbered| numbered.stage).collect()
    }

    /// Response of the whole chain at `freq_hz`.
    pub fn response(&self, freq_hz: f64) -> Result<Complex64> {
        self.response_between(freq_hz, 1, sequence_number(self.stages.len() - 1))
    }

    /// Response of stages `first..=last` (1-based) at `freq_hz`.
    ///
    /// `response_between(f, 1, 1)` is the sensor alone when the chain was
    /// composed with one.
    pub fn response_between(&self, freq_hz: f64, first: u32, last: u32) -> Result<Complex64> {
        let len = self.stages.len();
        let in_range = first >= 1 && first <= last && usize::try_from(last).is_ok_and(|l| l <= len);
        if !in_range {
            return Err(ResponseError::StageRange { first, last, len });
        }
        self.stages
            .iter()
            .filter(|numbered| (first..=last).contains(&numbered.sequence))
            .try_fold(Complex64::new(1.0, 0.0), |acc, numbered| {
                Ok(acc * numbered.stage.response(freq_hz)?)
            })
    }

    /// Whole-chain response at each frequency.
    pub fn frequency_response(&self, frequencies: &[f64]) -> Result<Vec<Complex64>> {
        frequencies.iter().map(|&f| self.response(f)).collect()
    }
}

fn sequence_number(index: usize) -> u32 {
    u32::try_from(index + 1).unwrap_or(u32::MAX)
}

fn same_frequency(a: f64, b: f64) -> bool {
    (a - b).abs() <= FREQUENCY_TOLERANCE * a.abs().max(b.abs())
}

fn scalar_sensitivity(
    stages: &[NumberedStage],
    frequency: Option<f64>,
    warnings: &mut Vec<ChainWarning>,
) -> Sensitivity {
    let mut value = 1.0;
    for numbered in stages {
        if let ResponseStage::PoleZero(pz) = &numbered.stage
            && pz.normalization_factor().is_none()
        {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                sequence = numbered.sequence,
                stage = pz.name(),
                "unnormalized stage excluded from sensitivity"
            );
            warnings.push(ChainWarning::UnnormalizedStage {
                sequence: numbered.sequence,
                name: pz.name().to_string(),
            });
            continue;
        }
        if let Some(gain) = numbered.stage.stage_gain() {
            value *= gain;
        }
    }

    Sensitivity::Scalar {
        value,
        frequency,
        input_unit: stages[0].stage.input_unit().clone(),
        output_unit: stages[stages.len() - 1].stage.output_unit().clone(),
    }
}

/// Re-express a polynomial sensor in the output units of the digitizer
/// stages that follow it.
///
/// The digitizer is treated as a DC gain `G` from volts to counts, so a
/// sensor polynomial `x = Σ cᵢ vⁱ` becomes `x = Σ (cᵢ / Gⁱ) countsⁱ`.
fn polynomial_sensitivity(sensor: &PolynomialStage, digitizer: &[NumberedStage]) -> Result<Sensitivity> {
    if digitizer.is_empty() {
        return Err(ResponseError::PolynomialDerivation(format!(
            "no digitizer stages follow sensor '{}'",
            sensor.name
        )));
    }

    let sub_chain = ResponseChainBuilder::new()
        .accumulate_all(digitizer.iter().map(|numbered| numbered.stage.clone()))
        .finalize()
        .map_err(|err| ResponseError::PolynomialDerivation(err.to_string()))?;

    if sub_chain.input_unit() != &Unit::Volts || sub_chain.output_unit() != &Unit::Counts {
        return Err(ResponseError::PolynomialDerivation(format!(
            "unsupported unit combination {} -> {} -> {}",
            sensor.input_unit,
            sub_chain.input_unit(),
            sub_chain.output_unit()
        )));
    }
    if let Some(warning) = sub_chain.warnings().first() {
        return Err(ResponseError::PolynomialDerivation(format!(
            "digitizer gain is incomplete: {warning:?}"
        )));
    }

    let gain = sub_chain
        .sensitivity()
        .and_then(Sensitivity::scalar)
        .filter(|g| g.is_finite() && *g != 0.0)
        .ok_or_else(|| {
            ResponseError::PolynomialDerivation("digitizer has no usable gain".to_string())
        })?;

    Ok(Sensitivity::Polynomial {
        coefficients: sensor.rescaled(gain),
        approximation_domain: sensor.approximation_domain,
        input_unit: sensor.input_unit.clone(),
        output_unit: sub_chain.output_unit().clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::{DigitalFirStage, FlatGainStage, PoleZeroStage};
    use crate::transfer::{PoleZero, TransferDomain};

    fn flat(name: &str, gain: f64, input: Unit, output: Unit) -> ResponseStage {
        FlatGainStage::new(name, gain, input, output).into()
    }

    fn lowpass(gain_frequency: f64) -> ResponseStage {
        PoleZeroStage::new(
            "anti-alias",
            PoleZero::new(vec![Complex64::new(-586.0, 0.0)], vec![], TransferDomain::LaplaceRadians),
            0.5,
            gain_frequency,
            Unit::Volts,
            Unit::Volts,
        )
        .into()
    }

    fn digitizer() -> Vec<ResponseStage> {
        vec![
            flat("divider", 0.5, Unit::Volts, Unit::Volts),
            DigitalFirStage::modulator("ADC", 1000.0, 8e6).into(),
            DigitalFirStage::sinc("sinc5", 5, 4, 8e6, 4).unwrap().into(),
        ]
    }

    #[test]
    fn empty_chain_is_rejected() {
        assert_eq!(ResponseChainBuilder::new().finalize(), Err(ResponseError::EmptyChain));
    }

    #[test]
    fn unit_break_is_reported_at_upstream_stage() {
        let err = ResponseChainBuilder::new()
            .accumulate(flat("a", 1.0, Unit::MetersPerSecond, Unit::Volts))
            .accumulate(flat("b", 1.0, Unit::Volts, Unit::Volts))
            .accumulate(flat("c", 1.0, Unit::Counts, Unit::Counts))
            .finalize()
            .unwrap_err();
        assert_eq!(
            err,
            ResponseError::UnitMismatch {
                sequence: 2,
                output: Unit::Volts,
                input: Unit::Counts,
            }
        );
    }

    #[test]
    fn polynomial_after_first_stage_is_rejected() {
        let poly = PolynomialStage::new("LM35", vec![0.0, 100.0], (2.0, 150.0), Unit::Volts, Unit::Volts);
        let err = ResponseChainBuilder::new()
            .accumulate(flat("a", 1.0, Unit::Volts, Unit::Volts))
            .accumulate(poly)
            .finalize()
            .unwrap_err();
        assert_eq!(err, ResponseError::MisplacedPolynomial(2));
    }

    #[test]
    fn mixed_reference_frequencies_are_rejected() {
        let err = ResponseChainBuilder::new()
            .accumulate(lowpass(1.0))
            .accumulate(lowpass(5.0))
            .finalize()
            .unwrap_err();
        assert_eq!(
            err,
            ResponseError::ReferenceFrequencyMismatch {
                sequence: 2,
                expected: 1.0,
                found: 5.0,
            }
        );
    }

    #[test]
    fn sensitivity_is_product_of_gains() {
        let chain = compose(Some(lowpass(1.0)), &digitizer()).unwrap();
        let sensitivity = chain.sensitivity().unwrap();
        assert!((sensitivity.scalar().unwrap() - 250.0).abs() < 1e-9);
        assert_eq!(sensitivity.input_unit(), &Unit::Volts);
        assert_eq!(sensitivity.output_unit(), &Unit::Counts);
        assert_eq!(chain.reference_frequency(), Some(1.0));
        assert!(chain.warnings().is_empty());
    }

    #[test]
    fn sensitivity_matches_response_magnitude_at_reference() {
        let chain = compose(Some(lowpass(1.0)), &digitizer()).unwrap();
        let magnitude = chain.response(1.0).unwrap().norm();
        let expected = chain.sensitivity().unwrap().scalar().unwrap();
        // sinc droop at 1 Hz against an 8 MHz rate is far below tolerance
        assert!((magnitude / expected - 1.0).abs() < 1e-9);
    }

    #[test]
    fn sequence_numbers_run_one_to_n() {
        let with_sensor = compose(Some(lowpass(1.0)), &digitizer()).unwrap();
        let without = compose(None, &digitizer()).unwrap();
        let numbers = |c: &ResponseChain| c.stages().iter().map(|s| s.sequence).collect::<Vec<_>>();
        assert_eq!(numbers(&with_sensor), vec![1, 2, 3, 4]);
        assert_eq!(numbers(&without), vec![1, 2, 3]);
        assert_eq!(with_sensor.stage(1).map(ResponseStage::name), Some("anti-alias"));
        assert!(with_sensor.stage(0).is_none());
        assert!(with_sensor.stage(5).is_none());
    }

    #[test]
    fn unnormalized_stage_is_excluded_with_warning() {
        let chain = ResponseChainBuilder::new()
            .accumulate(lowpass(0.0))
            .accumulate(flat("ADC", 100.0, Unit::Volts, Unit::Counts))
            .finalize()
            .unwrap();
        assert_eq!(chain.sensitivity().and_then(Sensitivity::scalar), Some(100.0));
        assert_eq!(
            chain.warnings(),
            &[ChainWarning::UnnormalizedStage {
                sequence: 1,
                name: "anti-alias".to_string(),
            }]
        );
    }

    #[test]
    fn polynomial_sensor_yields_polynomial_sensitivity() {
        let lm35 = PolynomialStage::new("LM35", vec![0.0, 100.0], (2.0, 150.0), Unit::DegreesCelsius, Unit::Volts);
        let chain = compose(Some(lm35.into()), &digitizer()).unwrap();
        match chain.sensitivity() {
            Some(Sensitivity::Polynomial {
                coefficients,
                input_unit,
                output_unit,
                ..
            }) => {
                assert_eq!(coefficients[0], 0.0);
                assert!((coefficients[1] - 100.0 / 500.0).abs() < 1e-12);
                assert_eq!(input_unit, &Unit::DegreesCelsius);
                assert_eq!(output_unit, &Unit::Counts);
            }
            other => panic!("expected polynomial sensitivity, got {other:?}"),
        }
        // 25 °C -> 0.25 V -> 125 counts
        let temperature = chain.sensitivity().unwrap().to_physical(125.0);
        assert!((temperature - 25.0).abs() < 1e-9);
    }

    #[test]
    fn polynomial_derivation_failure_is_recovered() {
        let sensor = PolynomialStage::new("barometer", vec![0.0, 1.0], (0.0, 1.0), Unit::Pascals, Unit::Volts);
        let chain = ResponseChainBuilder::new()
            .accumulate(sensor)
            .accumulate(flat("buffer", 2.0, Unit::Volts, Unit::Volts))
            .finalize()
            .unwrap();
        assert!(chain.sensitivity().is_none());
        assert!(matches!(chain.warnings(), [ChainWarning::DerivationFailed { .. }]));
    }

    #[test]
    fn polynomial_chain_has_no_frequency_response() {
        let lm35 = PolynomialStage::new("LM35", vec![0.0, 100.0], (2.0, 150.0), Unit::DegreesCelsius, Unit::Volts);
        let chain = compose(Some(lm35.into()), &digitizer()).unwrap();
        assert!(matches!(chain.response(1.0), Err(ResponseError::NonLinearStage(_))));
        assert!(chain.response_between(1.0, 2, 4).is_ok());
    }

    #[test]
    fn response_between_validates_range() {
        let chain = compose(Some(lowpass(1.0)), &digitizer()).unwrap();
        let sensor = chain.response_between(1.0, 1, 1).unwrap();
        assert!((sensor.norm() - 0.5).abs() < 1e-12);
        assert_eq!(
            chain.response_between(1.0, 0, 2),
            Err(ResponseError::StageRange { first: 0, last: 2, len: 4 })
        );
        assert!(chain.response_between(1.0, 3, 2).is_err());
        assert!(chain.response_between(1.0, 1, 5).is_err());
    }

    #[test]
    fn recomposing_released_stages_renumbers() {
        let chain = compose(Some(lowpass(1.0)), &digitizer()).unwrap();
        let digitizer_only: Vec<ResponseStage> = chain.into_stages().into_iter().skip(1).collect();
        let rebuilt = compose(None, &digitizer_only).unwrap();
        let numbers: Vec<u32> = rebuilt.stages().iter().map(|s| s.sequence).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(rebuilt.stage(1).map(ResponseStage::name), Some("divider"));
    }

    #[test]
    fn frequency_response_maps_each_frequency() {
        let chain = compose(Some(lowpass(1.0)), &digitizer()).unwrap();
        let response = chain.frequency_response(&[0.1, 1.0, 10.0]).unwrap();
        assert_eq!(response.len(), 3);
        assert!(response[2].norm() < response[0].norm() * 1.01);
    }
}
