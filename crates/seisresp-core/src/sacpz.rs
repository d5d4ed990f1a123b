//! SAC pole-zero export.
//!
//! SAC expects a displacement response in radians per second. Velocity and
//! acceleration chains get one or two extra zeros at the origin, and all
//! normalized pole-zero stages are merged into a single set whose
//! `CONSTANT` is `A0 · sensitivity`.

use num_complex::Complex64;

use crate::chain::ResponseChain;
use crate::error::{ResponseError, Result};
use crate::normalize::normalization_factor;
use crate::stage::ResponseStage;
use crate::transfer::TransferDomain;
use crate::units::Unit;

impl ResponseChain {
    /// Render the chain as SAC pole-zero text.
    ///
    /// Fails with [`ResponseError::NoPoleZeroStage`] when no normalized
    /// pole-zero stage exists and with
    /// [`ResponseError::NoScalarSensitivity`] for polynomial chains.
    pub fn to_sacpz(&self) -> Result<String> {
        let sensitivity = self
            .sensitivity()
            .and_then(|s| s.scalar())
            .ok_or(ResponseError::NoScalarSensitivity)?;

        let mut poles: Vec<Complex64> = Vec::new();
        let mut zeros: Vec<Complex64> = Vec::new();
        let mut merged = 0usize;
        for numbered in self.stages() {
            let ResponseStage::PoleZero(pz) = &numbered.stage else {
                continue;
            };
            if pz.normalization_factor().is_none() {
                continue;
            }
            let radians = pz.transfer().to_radians()?;
            poles.extend(radians.poles);
            zeros.extend(radians.zeros);
            merged += 1;
        }
        if merged == 0 {
            return Err(ResponseError::NoPoleZeroStage);
        }

        let reference = self
            .reference_frequency()
            .ok_or(ResponseError::NoPoleZeroStage)?;
        let a0 = normalization_factor(&poles, &zeros, reference, TransferDomain::LaplaceRadians)?;

        let extra_zeros = match self.input_unit() {
            Unit::MetersPerSecond => 1,
            Unit::MetersPerSecondSquared => 2,
            _ => 0,
        };
        zeros.extend(std::iter::repeat_n(Complex64::new(0.0, 0.0), extra_zeros));

        let mut out = String::new();
        out.push_str(&format!("* INPUT UNIT       : {}\n", self.input_unit()));
        out.push_str(&format!("* OUTPUT UNIT      : {}\n", self.output_unit()));
        out.push_str(&format!("* REFERENCE FREQ   : {reference}\n"));
        out.push_str(&format!("* A0               : {a0:+.6e}\n"));
        out.push_str(&format!("* SENSITIVITY      : {sensitivity:+.6e}\n"));
        out.push_str(&format!("ZEROS\t{}\n", zeros.len()));
        for z in &zeros {
            out.push_str(&format!("\t{:+.6e}\t{:+.6e}\n", z.re, z.im));
        }
        out.push_str(&format!("POLES\t{}\n", poles.len()));
        for p in &poles {
            out.push_str(&format!("\t{:+.6e}\t{:+.6e}\n", p.re, p.im));
        }
        out.push_str(&format!("CONSTANT\t{:+.6e}\n", a0 * sensitivity));
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use crate::chain::{ResponseChainBuilder, compose};
    use crate::error::ResponseError;
    use crate::stage::{FlatGainStage, PoleZeroStage, PolynomialStage};
    use crate::transfer::{PoleZero, TransferDomain};
    use crate::units::Unit;
    use num_complex::Complex64;

    fn geophone() -> PoleZeroStage {
        PoleZeroStage::new(
            "geophone",
            PoleZero::new(
                vec![Complex64::new(-4.44, 4.44), Complex64::new(-4.44, -4.44)],
                vec![Complex64::new(0.0, 0.0), Complex64::new(0.0, 0.0)],
                TransferDomain::LaplaceRadians,
            ),
            28.8,
            10.0,
            Unit::MetersPerSecond,
            Unit::Volts,
        )
    }

    fn count_lines(text: &str, header: &str) -> usize {
        text.lines()
            .find_map(|line| line.strip_prefix(header))
            .and_then(|n| n.trim().parse().ok())
            .unwrap_or(0)
    }

    #[test]
    fn velocity_chain_gains_one_zero() {
        let chain = ResponseChainBuilder::new()
            .accumulate(geophone())
            .accumulate(FlatGainStage::new("ADC", 1000.0, Unit::Volts, Unit::Counts))
            .finalize()
            .unwrap();
        let text = chain.to_sacpz().unwrap();
        assert_eq!(count_lines(&text, "ZEROS"), 3);
        assert_eq!(count_lines(&text, "POLES"), 2);
        assert!(text.contains("* INPUT UNIT       : M/S"));
        assert!(text.lines().last().unwrap().starts_with("CONSTANT"));
    }

    #[test]
    fn hertz_roots_are_written_in_radians() {
        let stage = PoleZeroStage::new(
            "lowpass",
            PoleZero::new(vec![Complex64::new(-1.0, 0.0)], vec![], TransferDomain::LaplaceHertz),
            1.0,
            0.1,
            Unit::Volts,
            Unit::Volts,
        );
        let chain = compose(Some(stage.into()), &[]).unwrap();
        let text = chain.to_sacpz().unwrap();
        let pole = format!("{:+.6e}", -2.0 * core::f64::consts::PI);
        assert!(text.contains(&pole), "missing {pole} in\n{text}");
    }

    #[test]
    fn chain_without_pole_zero_stage_is_rejected() {
        let chain = compose(Some(FlatGainStage::new("ADC", 1.0, Unit::Volts, Unit::Counts).into()), &[]).unwrap();
        assert_eq!(chain.to_sacpz(), Err(ResponseError::NoPoleZeroStage));
    }

    #[test]
    fn polynomial_chain_is_rejected() {
        let lm35 = PolynomialStage::new("LM35", vec![0.0, 100.0], (2.0, 150.0), Unit::DegreesCelsius, Unit::Volts);
        let chain = compose(
            Some(lm35.into()),
            &[FlatGainStage::new("ADC", 1000.0, Unit::Volts, Unit::Counts).into()],
        )
        .unwrap();
        assert_eq!(chain.to_sacpz(), Err(ResponseError::NoScalarSensitivity));
    }
}
