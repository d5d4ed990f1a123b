//! Welch power and cross spectral density estimation.
//!
//! Signals are split into `nfft`-sample segments, each detrended, windowed
//! and transformed; segment spectra are averaged and scaled to a one-sided
//! density (`1/(fs·Σw²)`, doubled everywhere except DC and Nyquist). Cross
//! spectra use the `conj(X)·Y` convention. A signal shorter than `nfft` is
//! zero padded to a single segment.

use num_complex::Complex64;
use serde::Serialize;

use crate::error::{AnalysisError, Result};
use crate::fft::{Fft, Window};

/// Trend removed from each segment before windowing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Detrend {
    /// Leave segments untouched.
    #[default]
    None,
    /// Subtract the segment mean.
    Mean,
    /// Subtract the least-squares line.
    Linear,
}

impl Detrend {
    /// Remove the trend in place.
    pub fn apply(self, segment: &mut [f64]) {
        let n = segment.len();
        if n == 0 {
            return;
        }
        match self {
            Detrend::None => {}
            Detrend::Mean => {
                let mean = segment.iter().sum::<f64>() / n as f64;
                for x in segment.iter_mut() {
                    *x -= mean;
                }
            }
            Detrend::Linear => {
                let t_mean = (n as f64 - 1.0) / 2.0;
                let y_mean = segment.iter().sum::<f64>() / n as f64;
                let mut sxy = 0.0;
                let mut sxx = 0.0;
                for (i, &y) in segment.iter().enumerate() {
                    let dt = i as f64 - t_mean;
                    sxy += dt * (y - y_mean);
                    sxx += dt * dt;
                }
                let slope = if sxx > 0.0 { sxy / sxx } else { 0.0 };
                for (i, x) in segment.iter_mut().enumerate() {
                    *x -= y_mean + slope * (i as f64 - t_mean);
                }
            }
        }
    }
}

/// One-sided power spectral density.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Psd {
    /// Bin frequencies (Hz), DC to Nyquist.
    pub frequencies: Vec<f64>,
    /// Power per Hz at each bin.
    pub values: Vec<f64>,
    /// Number of averaged segments.
    pub segments: usize,
}

/// One-sided cross spectral density.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Csd {
    /// Bin frequencies (Hz), DC to Nyquist.
    pub frequencies: Vec<f64>,
    /// Complex cross power per Hz at each bin.
    pub values: Vec<Complex64>,
    /// Number of averaged segments.
    pub segments: usize,
}

/// Welch estimator settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectralEstimator {
    /// Sample rate (Hz).
    pub sample_rate: f64,
    /// Segment and FFT length.
    pub nfft: usize,
    /// Fractional overlap between segments, `0 <= overlap < 1`.
    pub overlap: f64,
    /// Window applied to each segment.
    pub window: Window,
    /// Trend removed from each segment.
    pub detrend: Detrend,
}

impl SpectralEstimator {
    /// Hann window, no overlap, no detrending.
    pub fn new(sample_rate: f64, nfft: usize) -> Self {
        Self {
            sample_rate,
            nfft,
            overlap: 0.0,
            window: Window::Hann,
            detrend: Detrend::None,
        }
    }

    /// Set the segment window.
    pub fn with_window(mut self, window: Window) -> Self {
        self.window = window;
        self
    }

    /// Set the fractional segment overlap.
    pub fn with_overlap(mut self, overlap: f64) -> Self {
        self.overlap = overlap;
        self
    }

    /// Set the per-segment detrending.
    pub fn with_detrend(mut self, detrend: Detrend) -> Self {
        self.detrend = detrend;
        self
    }

    /// Bin frequencies, `k·fs/nfft` for `k = 0..=nfft/2`.
    pub fn frequencies(&self) -> Vec<f64> {
        let resolution = self.sample_rate / self.nfft as f64;
        (0..=self.nfft / 2).map(|k| k as f64 * resolution).collect()
    }

    /// Power spectral density of `x`.
    pub fn psd(&self, x: &[f64]) -> Result<Psd> {
        self.validate(x.len())?;
        let fft = Fft::new(self.nfft);
        let window = self.window.coefficients(self.nfft);
        let starts = self.segment_starts(x.len());

        let mut acc = vec![0.0; self.nfft / 2 + 1];
        for &start in &starts {
            let spectrum = self.segment_spectrum(&fft, &window, x, start);
            for (a, c) in acc.iter_mut().zip(&spectrum) {
                *a += c.norm_sqr();
            }
        }

        let scale = self.density_scale(&window, starts.len());
        let values = acc
            .iter()
            .enumerate()
            .map(|(k, &p)| p * scale * self.one_sided_factor(k))
            .collect();

        Ok(Psd {
            frequencies: self.frequencies(),
            values,
            segments: starts.len(),
        })
    }

    /// Cross spectral density `conj(X)·Y` of two equal-length signals.
    pub fn csd(&self, x: &[f64], y: &[f64]) -> Result<Csd> {
        if x.len() != y.len() {
            return Err(AnalysisError::LengthMismatch {
                what: "second signal",
                expected: x.len(),
                found: y.len(),
            });
        }
        self.validate(x.len())?;
        let fft = Fft::new(self.nfft);
        let window = self.window.coefficients(self.nfft);
        let starts = self.segment_starts(x.len());

        let mut acc = vec![Complex64::new(0.0, 0.0); self.nfft / 2 + 1];
        for &start in &starts {
            let sx = self.segment_spectrum(&fft, &window, x, start);
            let sy = self.segment_spectrum(&fft, &window, y, start);
            for ((a, cx), cy) in acc.iter_mut().zip(&sx).zip(&sy) {
                *a += cx.conj() * cy;
            }
        }

        let scale = self.density_scale(&window, starts.len());
        let values = acc
            .iter()
            .enumerate()
            .map(|(k, &p)| p * (scale * self.one_sided_factor(k)))
            .collect();

        Ok(Csd {
            frequencies: self.frequencies(),
            values,
            segments: starts.len(),
        })
    }

    fn validate(&self, len: usize) -> Result<()> {
        if !self.sample_rate.is_finite() || self.sample_rate <= 0.0 {
            return Err(AnalysisError::InvalidSampleRate(self.sample_rate));
        }
        if self.nfft < 2 {
            return Err(AnalysisError::InvalidFftLength(self.nfft));
        }
        if !(0.0..1.0).contains(&self.overlap) {
            return Err(AnalysisError::InvalidOverlap(self.overlap));
        }
        if len == 0 {
            return Err(AnalysisError::EmptySignal);
        }
        Ok(())
    }

    fn segment_starts(&self, len: usize) -> Vec<usize> {
        if len <= self.nfft {
            return vec![0];
        }
        let overlap_samples = (self.overlap * self.nfft as f64).round() as usize;
        let hop = self.nfft.saturating_sub(overlap_samples).max(1);
        (0..=len - self.nfft).step_by(hop).collect()
    }

    fn segment_spectrum(&self, fft: &Fft, window: &[f64], x: &[f64], start: usize) -> Vec<Complex64> {
        let end = (start + self.nfft).min(x.len());
        let mut segment = x[start..end].to_vec();
        segment.resize(self.nfft, 0.0);
        self.detrend.apply(&mut segment);
        for (s, w) in segment.iter_mut().zip(window) {
            *s *= w;
        }
        fft.forward(&segment)
    }

    fn density_scale(&self, window: &[f64], segments: usize) -> f64 {
        let power: f64 = window.iter().map(|w| w * w).sum();
        1.0 / (self.sample_rate * power * segments as f64)
    }

    fn one_sided_factor(&self, bin: usize) -> f64 {
        let nyquist = self.nfft % 2 == 0 && bin == self.nfft / 2;
        if bin == 0 || nyquist { 1.0 } else { 2.0 }
    }
}
