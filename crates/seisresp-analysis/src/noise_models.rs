//! Reference background-noise models.
//!
//! Peterson's New Low and New High Noise Models (NLNM/NHNM) bound the
//! seismic background in velocity or acceleration, in dB relative to
//! `(1 m/s)²/Hz` or `(1 m/s²)²/Hz`. The IDC2010 low and high infrasound
//! models bound atmospheric pressure noise in dB relative to `(1 Pa)²/Hz`.
//!
//! Tables are stored by frequency in ascending order. Interpolation is
//! linear in `log10(f)`.

use serde::Serialize;

// (period s, dB)
const NLNM_VELOCITY: &[(f64, f64)] = &[
    (0.1, -203.9),
    (0.17, -198.1),
    (0.4, -190.6),
    (0.8, -187.1),
    (1.24, -177.8),
    (2.40, -157.0),
    (4.3, -144.4),
    (5.0, -143.1),
    (6.0, -149.4),
    (10.0, -159.7),
    (12.0, -160.6),
    (15.6, -154.2),
    (21.9, -166.7),
    (31.6, -171.0),
    (45.0, -170.4),
    (70.0, -166.6),
    (101.0, -160.9),
    (154.0, -157.2),
    (328.0, -153.1),
    (600.0, -144.8),
    (10000.0, -87.9),
    (100000.0, -19.1),
];

const NHNM_VELOCITY: &[(f64, f64)] = &[
    (0.1, -127.5),
    (0.22, -126.5),
    (0.32, -136.4),
    (0.80, -137.9),
    (3.80, -102.4),
    (4.60, -99.2),
    (6.3, -101.0),
    (7.9, -111.5),
    (15.4, -112.2),
    (20.0, -128.4),
    (354.8, -91.0),
    (10000.0, -16.1),
    (100000.0, 35.5),
];

const NLNM_ACCELERATION: &[(f64, f64)] = &[
    (0.1, -168.0),
    (0.17, -166.7),
    (0.4, -166.7),
    (0.8, -169.2),
    (1.24, -163.7),
    (2.40, -148.6),
    (4.3, -141.1),
    (5.0, -141.1),
    (6.0, -149.0),
    (10.0, -163.8),
    (12.0, -166.2),
    (15.6, -162.1),
    (21.9, -177.5),
    (31.6, -185.0),
    (45.0, -187.5),
    (70.0, -187.5),
    (101.0, -185.0),
    (154.0, -185.0),
    (328.0, -187.5),
    (600.0, -184.4),
    (10000.0, -151.9),
    (100000.0, -103.1),
];

const NHNM_ACCELERATION: &[(f64, f64)] = &[
    (0.1, -91.5),
    (0.22, -97.4),
    (0.32, -110.5),
    (0.80, -120.0),
    (3.80, -98.0),
    (4.60, -96.5),
    (6.3, -101.0),
    (7.9, -113.5),
    (15.4, -120.0),
    (20.0, -138.5),
    (354.8, -126.0),
    (10000.0, -80.1),
    (100000.0, -48.5),
];

// (frequency Hz, log10 Pa²/Hz)
const IDC2010_LOW: &[(f64, f64)] = &[
    (0.012, -2.1),
    (0.02, -2.7),
    (0.03, -3.2),
    (0.04, -3.55),
    (0.05, -3.75),
    (0.06, -3.95),
    (0.07, -4.05),
    (0.08, -4.15),
    (0.09, -4.25),
    (0.1, -4.45),
    (0.13, -4.25),
    (0.2, -4.2),
    (0.3, -5.0),
    (0.4, -5.4),
    (0.5, -5.6),
    (0.6, -5.7),
    (0.7, -5.8),
    (0.8, -6.05),
    (0.9, -6.3),
    (1.0, -6.5),
    (2.0, -7.75),
    (3.0, -8.5),
    (3.8, -8.85),
    (4.0, -8.9),
    (5.0, -9.1),
    (6.0, -9.25),
    (7.0, -9.4),
    (7.3, -9.45),
    (8.0, -9.75),
    (9.0, -9.90),
];

const IDC2010_HIGH: &[(f64, f64)] = &[
    (0.012, 3.6),
    (0.022, 3.45),
    (0.04, 3.05),
    (0.05, 2.9),
    (0.06, 2.5),
    (0.07, 2.25),
    (0.08, 2.1),
    (0.09, 2.06),
    (0.1, 2.0),
    (0.2, 1.5),
    (0.3, 1.2),
    (0.4, 0.8),
    (0.5, 0.45),
    (0.6, 0.05),
    (0.7, -0.05),
    (0.8, -0.3),
    (0.9, -0.55),
    (1.0, -0.8),
    (2.0, -1.3),
    (3.0, -1.6),
    (4.0, -1.85),
    (5.0, -1.95),
    (6.0, -2.05),
    (7.0, -2.2),
    (8.0, -2.3),
    (9.0, -2.5),
];

/// A reference noise curve.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NoiseModel {
    name: &'static str,
    frequencies: Vec<f64>,
    levels_db: Vec<f64>,
}

impl NoiseModel {
    fn from_periods(name: &'static str, table: &[(f64, f64)]) -> Self {
        let (frequencies, levels_db) = table.iter().rev().map(|&(period, db)| (1.0 / period, db)).unzip();
        Self {
            name,
            frequencies,
            levels_db,
        }
    }

    fn from_log_power(name: &'static str, table: &[(f64, f64)]) -> Self {
        let (frequencies, levels_db) = table.iter().map(|&(f, log_power)| (f, 10.0 * log_power)).unzip();
        Self {
            name,
            frequencies,
            levels_db,
        }
    }

    /// Peterson low noise model, velocity.
    pub fn nlnm_velocity() -> Self {
        Self::from_periods("NLNM", NLNM_VELOCITY)
    }

    /// Peterson high noise model, velocity.
    pub fn nhnm_velocity() -> Self {
        Self::from_periods("NHNM", NHNM_VELOCITY)
    }

    /// Peterson low noise model, acceleration.
    pub fn nlnm_acceleration() -> Self {
        Self::from_periods("NLNM", NLNM_ACCELERATION)
    }

    /// Peterson high noise model, acceleration.
    pub fn nhnm_acceleration() -> Self {
        Self::from_periods("NHNM", NHNM_ACCELERATION)
    }

    /// IDC2010 infrasound low noise model.
    pub fn idc2010_low() -> Self {
        Self::from_log_power("IDC2010-LI", IDC2010_LOW)
    }

    /// IDC2010 infrasound high noise model.
    pub fn idc2010_high() -> Self {
        Self::from_log_power("IDC2010-HI", IDC2010_HIGH)
    }

    /// Low and high Peterson models for velocity or acceleration.
    pub fn peterson_pair(acceleration: bool) -> (Self, Self) {
        if acceleration {
            (Self::nlnm_acceleration(), Self::nhnm_acceleration())
        } else {
            (Self::nlnm_velocity(), Self::nhnm_velocity())
        }
    }

    /// Short model name.
    pub fn name(&self) -> &str {
        self.name
    }

    /// Table frequencies (Hz), ascending.
    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    /// Table levels (dB), one per frequency.
    pub fn levels_db(&self) -> &[f64] {
        &self.levels_db
    }

    /// Level at `freq_hz`, interpolated in log frequency.
    ///
    /// Returns `None` outside the table's frequency range.
    pub fn interpolate_db(&self, freq_hz: f64) -> Option<f64> {
        let first = *self.frequencies.first()?;
        let last = *self.frequencies.last()?;
        if !freq_hz.is_finite() || freq_hz < first || freq_hz > last {
            return None;
        }

        let upper = self
            .frequencies
            .iter()
            .position(|&f| f >= freq_hz)?;
        if upper == 0 {
            return Some(self.levels_db[0]);
        }
        let lower = upper - 1;
        let (f0, f1) = (self.frequencies[lower].log10(), self.frequencies[upper].log10());
        let (d0, d1) = (self.levels_db[lower], self.levels_db[upper]);
        let t = (freq_hz.log10() - f0) / (f1 - f0);
        Some(d0 + t * (d1 - d0))
    }
}
