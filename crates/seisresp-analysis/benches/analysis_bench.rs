//! Criterion benchmarks for seisresp-analysis components
//!
//! Run with: cargo bench -p seisresp-analysis

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use seisresp_analysis::{SpectralEstimator, estimate_from_samples};

const SAMPLE_RATE: f64 = 200.0;

/// Generate white noise
fn generate_noise(size: usize, seed: u32) -> Vec<f64> {
    let mut state = seed;
    (0..size)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state as i32 as f64) / (i32::MAX as f64)
        })
        .collect()
}

fn bench_psd(c: &mut Criterion) {
    let mut group = c.benchmark_group("Welch_PSD");
    let signal = generate_noise(1 << 18, 0x12345678);

    for nfft in [1024, 8192, 65536] {
        let est = SpectralEstimator::new(SAMPLE_RATE, nfft);
        group.bench_with_input(BenchmarkId::from_parameter(nfft), &nfft, |b, _| {
            b.iter(|| est.psd(black_box(&signal)))
        });
    }

    group.finish();
}

fn bench_coherence(c: &mut Criterion) {
    let mut group = c.benchmark_group("Coherence");
    let x = generate_noise(1 << 18, 0x12345678);
    let y = generate_noise(1 << 18, 0x87654321);

    for nfft in [4096, 32768] {
        let est = SpectralEstimator::new(SAMPLE_RATE, nfft);
        group.bench_with_input(BenchmarkId::from_parameter(nfft), &nfft, |b, _| {
            b.iter(|| estimate_from_samples(black_box(&x), black_box(&y), &est))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_psd, bench_coherence);
criterion_main!(benches);
