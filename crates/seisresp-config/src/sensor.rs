//! Sensor models: the first stage of a channel.

use num_complex::Complex64;
use seisresp_core::{PoleZero, PoleZeroStage, PolynomialStage, ResponseStage, TransferDomain, Unit};
use serde::{Deserialize, Serialize};

fn default_domain() -> TransferDomain {
    TransferDomain::LaplaceRadians
}

fn default_reference_frequency() -> f64 {
    1.0
}

fn default_sensor_input() -> Unit {
    Unit::MetersPerSecond
}

fn default_sensor_output() -> Unit {
    Unit::Volts
}

/// A linear sensor described by poles, zeros and a generator constant.
///
/// In a table, sensors are keyed by serial number:
///
/// ```toml
/// [sensors.T0001]
/// name = "Yuma2 mechanical rev 4.3, electrical rev 4.0"
/// generator_constant = 844.49
/// poles = [[-0.085842, 0.0008651], [-0.085842, -0.0008651], [-209.7, 0.0]]
/// zeros = [[0.0, 0.0]]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorModel {
    /// Stage name written into the response.
    pub name: String,
    /// Sensitivity at the reference frequency, output per input unit
    /// (e.g. V/(m/s)).
    pub generator_constant: f64,
    /// Frequency at which the generator constant applies (Hz).
    #[serde(default = "default_reference_frequency")]
    pub reference_frequency: f64,
    /// Domain of the roots.
    #[serde(default = "default_domain")]
    pub domain: TransferDomain,
    /// Measured quantity.
    #[serde(default = "default_sensor_input")]
    pub input_unit: Unit,
    /// Electrical output.
    #[serde(default = "default_sensor_output")]
    pub output_unit: Unit,
    /// Poles as `[re, im]` pairs.
    #[serde(default)]
    pub poles: Vec<Complex64>,
    /// Zeros as `[re, im]` pairs.
    #[serde(default)]
    pub zeros: Vec<Complex64>,
}

impl SensorModel {
    /// Pole-zero stage for this sensor, normalized at the reference frequency.
    pub fn stage(&self) -> ResponseStage {
        PoleZeroStage::new(
            self.name.clone(),
            PoleZero::new(self.poles.clone(), self.zeros.clone(), self.domain),
            self.generator_constant,
            self.reference_frequency,
            self.input_unit.clone(),
            self.output_unit.clone(),
        )
        .into()
    }
}

/// A non-linear sensor described by a polynomial, such as an LM35
/// temperature sensor.
///
/// Coefficients map the sensor output back to the measured quantity in
/// ascending powers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolynomialSensorModel {
    /// Stage name written into the response.
    pub name: String,
    /// Measured quantity.
    pub input_unit: Unit,
    /// Electrical output.
    #[serde(default = "default_sensor_output")]
    pub output_unit: Unit,
    /// Coefficients in ascending powers of the output value.
    pub coefficients: Vec<f64>,
    /// Range of the measured quantity over which the polynomial holds.
    pub approximation_domain: (f64, f64),
}

impl PolynomialSensorModel {
    /// Polynomial stage for this sensor.
    pub fn stage(&self) -> ResponseStage {
        PolynomialStage::new(
            self.name.clone(),
            self.coefficients.clone(),
            self.approximation_domain,
            self.input_unit.clone(),
            self.output_unit.clone(),
        )
        .into()
    }
}
