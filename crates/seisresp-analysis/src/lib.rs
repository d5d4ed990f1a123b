//! Seisresp Analysis - Spectral tools for seismic station evaluation
//!
//! This crate turns raw recordings into the curves used to judge an
//! instrument:
//!
//! - [`fft`] - FFT wrapper with windowing functions
//! - [`spectrum`] - Welch PSD and CSD estimation
//! - [`coherence`] - Two-sensor coherence and self-noise (Holcomb)
//! - [`convert`] - Velocity / acceleration conversion
//! - [`db`] - Decibel presentation helpers
//! - [`noise_models`] - NLNM/NHNM and IDC2010 reference curves
//! - [`fit`] - Least-squares line fit
//! - [`export`] - CSV export
//!
//! ## Self-noise Workflow
//!
//! ```rust,ignore
//! use seisresp_analysis::{SpectralEstimator, coherence};
//!
//! // Two co-located seismometers, scaled from counts to m/s
//! let estimator = SpectralEstimator::new(200.0, 256 * 1024);
//! let result = coherence::estimate_from_samples(&unit1, &unit2, &estimator)?;
//!
//! for (f, noise) in result.frequencies.iter().zip(&result.self_noise_1) {
//!     println!("{f:.4} Hz: {:.1} dB", 10.0 * noise.log10());
//! }
//! ```

pub mod coherence;
pub mod convert;
pub mod db;
pub mod error;
pub mod export;
pub mod fft;
pub mod fit;
pub mod noise_models;
pub mod spectrum;

pub use coherence::{CoherenceResult, estimate, estimate_from_samples};
pub use error::{AnalysisError, Result};
pub use fft::{Fft, Window};
pub use fit::{LinearFit, linear_fit};
pub use noise_models::NoiseModel;
pub use spectrum::{Csd, Detrend, Psd, SpectralEstimator};
