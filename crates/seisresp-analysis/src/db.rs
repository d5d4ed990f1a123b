//! Decibel conversions for presentation.
//!
//! Power quantities (PSD, self-noise) use `10·log10`; amplitude quantities
//! (voltage noise density) use `20·log10`. Zero maps to negative infinity
//! and negative values to NaN.

/// `10·log10(p)`.
pub fn power_to_db(power: f64) -> f64 {
    10.0 * power.log10()
}

/// `20·log10(a)`.
pub fn amplitude_to_db(amplitude: f64) -> f64 {
    20.0 * amplitude.log10()
}

/// `10^(db/10)`.
pub fn db_to_power(db: f64) -> f64 {
    10f64.powf(db / 10.0)
}

/// Power spectrum in dB.
pub fn power_db(values: &[f64]) -> Vec<f64> {
    values.iter().map(|&p| power_to_db(p)).collect()
}

/// Amplitude spectrum in dB.
pub fn amplitude_db(values: &[f64]) -> Vec<f64> {
    values.iter().map(|&a| amplitude_to_db(a)).collect()
}
