//! Digitizer models.
//!
//! A sigma-delta digitizer contributes a fixed sequence of stages after the
//! sensor:
//!
//! 1. input voltage divider with its anti-aliasing RC pole (`V → V`)
//! 2. programmable gain amplifier (`V → V`)
//! 3. modulator, `±vref` to `±2^(bits−1)` counts (`V → COUNTS`)
//! 4. one sinc decimation filter per configured stage (`COUNTS → COUNTS`)
//!
//! All physical constants live in the model, so two boards with different
//! dividers are two table entries rather than two code paths.

use num_complex::Complex64;
use seisresp_core::{
    DigitalFirStage, FlatGainStage, PoleZero, PoleZeroStage, ResponseStage, Result, TransferDomain,
    Unit,
};
use serde::{Deserialize, Serialize};

fn default_pga_gain() -> f64 {
    1.0
}

fn default_bits() -> u32 {
    24
}

fn default_reference_frequency() -> f64 {
    1.0
}

/// One sinc decimation filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SincStageConfig {
    /// Number of cascaded boxcars.
    pub order: usize,
    /// Length of each boxcar.
    pub length: usize,
    /// Decimation factor.
    pub factor: u32,
    /// Input sample rate (Hz). Defaults to the previous stage's output rate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_rate: Option<f64>,
}

/// A sigma-delta digitizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DigitizerModel {
    /// Model name.
    pub name: String,
    /// ADC reference voltage (V). Full scale is `±vref` at the modulator.
    pub vref: f64,
    /// Input divider ratio; the divider stage gain is `1/divider`.
    pub divider: f64,
    /// Anti-aliasing RC pole (rad/s, negative real), if the front end has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anti_alias_pole: Option<f64>,
    /// Programmable gain amplifier setting.
    #[serde(default = "default_pga_gain")]
    pub pga_gain: f64,
    /// ADC resolution in bits, sign included.
    #[serde(default = "default_bits")]
    pub bits: u32,
    /// Modulator sample rate (Hz).
    pub modulator_rate: f64,
    /// Frequency at which the divider gain is stated (Hz).
    #[serde(default = "default_reference_frequency")]
    pub reference_frequency: f64,
    /// Sinc decimation filters, in signal order.
    #[serde(default)]
    pub sinc_stages: Vec<SincStageConfig>,
}

impl DigitizerModel {
    /// Modulator gain in counts per volt.
    pub fn modulator_gain(&self) -> f64 {
        2f64.powi(self.bits as i32 - 1) / self.vref
    }

    /// Overall gain from digitizer input volts to output counts.
    pub fn counts_per_volt(&self) -> f64 {
        self.pga_gain * self.modulator_gain() / self.divider
    }

    /// Stages contributed by this digitizer, in signal order.
    pub fn stages(&self) -> Result<Vec<ResponseStage>> {
        let poles = self
            .anti_alias_pole
            .map(|p| vec![Complex64::new(p, 0.0)])
            .unwrap_or_default();

        let mut stages: Vec<ResponseStage> = vec![
            PoleZeroStage::new(
                "Digitizer input voltage divider and antialiasing filter",
                PoleZero::new(poles, Vec::new(), TransferDomain::LaplaceRadians),
                1.0 / self.divider,
                self.reference_frequency,
                Unit::Volts,
                Unit::Volts,
            )
            .into(),
            FlatGainStage::new("ADC PGA gain", self.pga_gain, Unit::Volts, Unit::Volts).into(),
            DigitalFirStage::modulator("ADC sigma delta modulator", self.modulator_gain(), self.modulator_rate)
                .into(),
        ];

        let mut rate = self.modulator_rate;
        for sinc in &self.sinc_stages {
            let input_rate = sinc.input_rate.unwrap_or(rate);
            let stage = DigitalFirStage::sinc(
                format!("ADC sinc{} digital filter", sinc.order),
                sinc.order,
                sinc.length,
                input_rate,
                sinc.factor,
            )?;
            rate = stage.output_sample_rate();
            stages.push(stage.into());
        }
        Ok(stages)
    }

    /// Sample rate of the recorded data (Hz).
    pub fn output_sample_rate(&self) -> f64 {
        self.sinc_stages.iter().fold(self.modulator_rate, |rate, sinc| {
            sinc.input_rate.unwrap_or(rate) / f64::from(sinc.factor.max(1))
        })
    }

    /// Convert raw counts to volts at the digitizer input.
    pub fn counts_to_volts(&self, counts: f64) -> f64 {
        counts / self.counts_per_volt()
    }

    /// Convert raw counts from a linear temperature sensor to degrees.
    ///
    /// `volts_per_degree` is the sensor scale, 0.01 for an LM35.
    pub fn counts_to_temperature(&self, counts: f64, volts_per_degree: f64) -> f64 {
        self.counts_to_volts(counts) / volts_per_degree
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seiscape2() -> DigitizerModel {
        DigitizerModel {
            name: "seiscape2".into(),
            vref: 2.5,
            divider: 8.0,
            anti_alias_pole: Some(-586.0),
            pga_gain: 1.0,
            bits: 24,
            modulator_rate: 8e6,
            reference_frequency: 1.0,
            sinc_stages: vec![
                SincStageConfig {
                    order: 5,
                    length: 12,
                    factor: 32,
                    input_rate: None,
                },
                SincStageConfig {
                    order: 1,
                    length: 2000,
                    factor: 2000,
                    input_rate: Some(250e3),
                },
            ],
        }
    }

    #[test]
    fn stages_follow_signal_order() {
        let stages = seiscape2().stages().unwrap();
        let names: Vec<&str> = stages.iter().map(|s| s.name()).collect();
        assert_eq!(
            names,
            [
                "Digitizer input voltage divider and antialiasing filter",
                "ADC PGA gain",
                "ADC sigma delta modulator",
                "ADC sinc5 digital filter",
                "ADC sinc1 digital filter",
            ]
        );
        assert_eq!(stages[0].stage_gain(), Some(0.125));
        assert_eq!(stages[2].stage_gain(), Some(8_388_608.0 / 2.5));
        assert_eq!(stages[2].output_unit(), &Unit::Counts);
    }

    #[test]
    fn sinc_input_rate_defaults_to_previous_output() {
        let stages = seiscape2().stages().unwrap();
        let ResponseStage::DigitalFir(sinc5) = &stages[3] else {
            panic!("expected a digital stage");
        };
        assert_eq!(sinc5.decimation.input_sample_rate, 8e6);
        assert_eq!(sinc5.output_sample_rate(), 250e3);
        assert_eq!(sinc5.coefficients.numerator.len(), 4 * 11 + 12);
    }

    #[test]
    fn output_rate_is_modulator_over_decimation() {
        assert!((seiscape2().output_sample_rate() - 125.0).abs() < 1e-9);
    }

    #[test]
    fn counts_convert_through_vref_and_divider() {
        let adc = seiscape2();
        // Full scale counts at the modulator are vref, times the divider at the input.
        let full_scale = 2f64.powi(23);
        assert!((adc.counts_to_volts(full_scale) - 20.0).abs() < 1e-9);
        assert!((adc.counts_to_temperature(full_scale / 800.0, 0.01) - 2.5).abs() < 1e-9);
    }

    #[test]
    fn missing_pole_gives_flat_divider() {
        let mut adc = seiscape2();
        adc.anti_alias_pole = None;
        adc.divider = 17.0;
        let stages = adc.stages().unwrap();
        let h = stages[0].response(40.0).unwrap();
        assert!((h.norm() - 1.0 / 17.0).abs() < 1e-12);
    }

    #[test]
    fn bad_sinc_parameters_are_errors() {
        let mut adc = seiscape2();
        adc.sinc_stages[0].order = 0;
        assert!(adc.stages().is_err());
    }
}
