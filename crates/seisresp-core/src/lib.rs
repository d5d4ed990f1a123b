//! Seisresp Core - Instrument response modeling for seismic stations
//!
//! This crate describes how a station turns ground motion (or temperature,
//! or pressure) into digitizer counts:
//!
//! - [`units`] - Physical units carried between stages
//! - [`transfer`] - Pole/zero and digital coefficient transfer functions
//! - [`normalize`] - Normalization factor (A0) for analog stages
//! - [`sinc`] - Sinc decimation filter synthesis
//! - [`stage`] - Pole-zero, flat gain, digital FIR and polynomial stages
//! - [`chain`] - Two-phase chain assembly and overall sensitivity
//! - [`sacpz`] - SAC pole-zero text export
//!
//! ## Example
//!
//! ```rust
//! use num_complex::Complex64;
//! use seisresp_core::{
//!     DigitalFirStage, FlatGainStage, PoleZero, PoleZeroStage, TransferDomain, Unit, compose,
//! };
//!
//! let sensor = PoleZeroStage::new(
//!     "geophone",
//!     PoleZero::new(
//!         vec![Complex64::new(-4.44, 4.44), Complex64::new(-4.44, -4.44)],
//!         vec![Complex64::new(0.0, 0.0), Complex64::new(0.0, 0.0)],
//!         TransferDomain::LaplaceRadians,
//!     ),
//!     28.8,
//!     10.0,
//!     Unit::MetersPerSecond,
//!     Unit::Volts,
//! );
//! let digitizer = [
//!     FlatGainStage::new("PGA", 1.0, Unit::Volts, Unit::Volts).into(),
//!     DigitalFirStage::modulator("ADC", 8_388_608.0 / 2.5, 1.0e6).into(),
//!     DigitalFirStage::sinc("sinc5", 5, 12, 1.0e6, 12).unwrap().into(),
//! ];
//!
//! let chain = compose(Some(sensor.into()), &digitizer).unwrap();
//! assert_eq!(chain.len(), 4);
//! let sensitivity = chain.sensitivity().and_then(|s| s.scalar()).unwrap();
//! assert!((sensitivity - 28.8 * 8_388_608.0 / 2.5).abs() < 1e-3);
//! ```
//!
//! ## Logging
//!
//! With the `tracing` feature, recovered problems (unnormalized stages,
//! failed polynomial derivation) are reported as `warn!` events.

pub mod chain;
pub mod error;
pub mod normalize;
pub mod sacpz;
pub mod sinc;
pub mod stage;
pub mod transfer;
pub mod units;

pub use chain::{ChainWarning, NumberedStage, ResponseChain, ResponseChainBuilder, Sensitivity, compose};
pub use error::{ResponseError, Result};
pub use normalize::normalization_factor;
pub use sinc::{convolve_full, sinc_coefficients, sinc_group_delay_samples};
pub use stage::{
    Decimation, DigitalFirStage, FlatGainStage, PoleZeroStage, PolynomialStage, ResponseStage,
    evaluate_polynomial,
};
pub use transfer::{Coefficients, PoleZero, TransferDomain};
pub use units::Unit;
