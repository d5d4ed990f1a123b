//! Integration tests for seisresp-analysis.
//!
//! End-to-end self-noise scenarios: synthetic co-located sensors sharing a
//! ground signal with independent electronic noise.

use num_complex::Complex64;
use seisresp_analysis::convert::{
    acceleration_to_velocity_power, velocity_to_acceleration_cross, velocity_to_acceleration_power,
};
use seisresp_analysis::export::export_coherence_csv;
use seisresp_analysis::{NoiseModel, SpectralEstimator, estimate, estimate_from_samples};

fn noise(len: usize, seed: u64) -> Vec<f64> {
    let mut state = seed;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state >> 11) as f64 / (1u64 << 53) as f64 * 2.0 - 1.0
        })
        .collect()
}

#[test]
fn white_noise_with_half_coherent_csd() {
    let p = 2.5e-15;
    let bins = 64;
    let freqs: Vec<f64> = (0..bins).map(|k| k as f64 * 0.1).collect();
    let result = estimate(&vec![p; bins], &vec![p; bins], &vec![Complex64::new(0.5 * p, 0.0); bins], &freqs).unwrap();

    assert_eq!(result.len(), bins);
    for k in 0..bins {
        assert!((result.gamma_squared[k] - 0.25).abs() < 1e-12);
        assert!((result.self_noise_1[k] / (0.5 * p) - 1.0).abs() < 1e-12);
        assert!((result.self_noise_2[k] / (0.5 * p) - 1.0).abs() < 1e-12);
    }
}

#[test]
fn identical_recordings_are_fully_coherent() {
    let x = noise(16 * 512, 1);
    let est = SpectralEstimator::new(100.0, 512);
    let result = estimate_from_samples(&x, &x, &est).unwrap();
    let psd = est.psd(&x).unwrap();
    for k in 1..result.len() - 1 {
        assert!((result.gamma_squared[k] - 1.0).abs() < 1e-9);
        assert!(result.self_noise_1[k].abs() < 1e-9 * psd.values[k]);
    }
}

#[test]
fn independent_noise_has_low_coherence() {
    let x = noise(64 * 256, 2);
    let y = noise(64 * 256, 99);
    let result = estimate_from_samples(&x, &y, &SpectralEstimator::new(100.0, 256)).unwrap();
    let mean_gamma2: f64 = result.gamma_squared[1..128].iter().sum::<f64>() / 127.0;
    // Bias of the estimator is about 1/segments
    assert!(mean_gamma2 < 0.05, "mean gamma^2 = {mean_gamma2}");
}

#[test]
fn shared_signal_with_private_noise_recovers_noise_floor() {
    // Each sensor sees the same ground signal plus its own noise at 1/10 the
    // amplitude; the self-noise estimate lands near the private noise power.
    let ground = noise(128 * 512, 5);
    let private_a = noise(128 * 512, 6);
    let private_b = noise(128 * 512, 7);
    let a: Vec<f64> = ground.iter().zip(&private_a).map(|(g, n)| g + 0.1 * n).collect();
    let b: Vec<f64> = ground.iter().zip(&private_b).map(|(g, n)| g + 0.1 * n).collect();

    let est = SpectralEstimator::new(100.0, 512);
    let result = estimate_from_samples(&a, &b, &est).unwrap();
    let private_psd = est.psd(&private_a).unwrap();

    let bins = 10..200;
    let estimated: f64 = result.self_noise_1[bins.clone()].iter().sum();
    let actual: f64 = private_psd.values[bins].iter().map(|p| p * 0.01).sum();
    let ratio = estimated / actual;
    assert!(ratio > 0.5 && ratio < 2.0, "self-noise / private noise = {ratio}");
}

#[test]
fn acceleration_view_is_consistent() {
    let x = noise(8 * 256, 3);
    let y = noise(8 * 256, 4);
    let est = SpectralEstimator::new(50.0, 256);
    let psd1 = est.psd(&x).unwrap();
    let psd2 = est.psd(&y).unwrap();
    let csd = est.csd(&x, &y).unwrap();
    let f = &psd1.frequencies;

    let velocity = estimate(&psd1.values, &psd2.values, &csd.values, f).unwrap();
    let acceleration = estimate(
        &velocity_to_acceleration_power(f, &psd1.values).unwrap(),
        &velocity_to_acceleration_power(f, &psd2.values).unwrap(),
        &velocity_to_acceleration_cross(f, &csd.values).unwrap(),
        f,
    )
    .unwrap();

    // Coherence is scale free; self-noise scales like the PSD
    for k in 1..f.len() {
        assert!((velocity.gamma_squared[k] - acceleration.gamma_squared[k]).abs() < 1e-9);
    }
    let back = acceleration_to_velocity_power(&f[1..], &acceleration.self_noise_1[1..]).unwrap();
    for (a, b) in back.iter().zip(&velocity.self_noise_1[1..]) {
        assert!((a - b).abs() <= 1e-9 * b.abs());
    }
}

#[test]
fn noise_models_cover_the_seismic_band() {
    let (low, high) = NoiseModel::peterson_pair(true);
    assert!(low.interpolate_db(1e-3).is_some());
    assert!(high.interpolate_db(5.0).is_some());
    assert!(low.interpolate_db(100.0).is_none());
}

#[test]
fn coherence_csv_has_one_line_per_bin() {
    let x = noise(2048, 8);
    let result = estimate_from_samples(&x, &x, &SpectralEstimator::new(10.0, 128)).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("coherence.csv");
    export_coherence_csv(&result, &path).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text.lines().count(), result.len() + 1);
    assert!(text.starts_with("frequency_hz,gamma_squared,phase_deg,self_noise_1,self_noise_2"));
}
