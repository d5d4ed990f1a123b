//! Two-sensor coherence and self-noise.

use clap::Args;
use seisresp_analysis::coherence::{self, CoherenceResult};
use seisresp_analysis::convert::{velocity_to_acceleration_cross, velocity_to_acceleration_power};
use seisresp_analysis::db::power_to_db;
use seisresp_analysis::export::export_coherence_csv;
use std::path::PathBuf;

use super::common::{estimator, load_scaled_channel};

#[derive(Args)]
pub struct CoherenceArgs {
    /// First recording (raw counts)
    #[arg(value_name = "INPUT_A")]
    input_a: PathBuf,

    /// Second recording; defaults to another channel of INPUT_A
    #[arg(value_name = "INPUT_B")]
    input_b: Option<PathBuf>,

    /// Channel of INPUT_A (zero-based)
    #[arg(long, default_value = "0")]
    channel_a: usize,

    /// Channel of the second recording (zero-based); defaults to 0 of
    /// INPUT_B, or to the channel after --channel-a without INPUT_B
    #[arg(long)]
    channel_b: Option<usize>,

    /// Physical units per count for the first sensor
    #[arg(long, default_value = "1.0")]
    scale_a: f64,

    /// Physical units per count for the second sensor
    #[arg(long, default_value = "1.0")]
    scale_b: f64,

    /// Segment / FFT length
    #[arg(long, default_value = "4096")]
    nfft: usize,

    /// Fractional segment overlap
    #[arg(long, default_value = "0.0")]
    overlap: f64,

    /// Window function
    #[arg(long, default_value = "hann")]
    window: String,

    /// Report self-noise as acceleration instead of velocity
    #[arg(long)]
    acceleration: bool,

    /// Output CSV file
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub fn run(args: CoherenceArgs) -> anyhow::Result<()> {
    let input_b = args.input_b.as_ref().unwrap_or(&args.input_a);
    let channel_b = match (&args.input_b, args.channel_b) {
        (_, Some(channel)) => channel,
        (Some(_), None) => 0,
        (None, None) => args.channel_a + 1,
    };
    if args.input_b.is_none() && channel_b == args.channel_a {
        anyhow::bail!("Both sensors read channel {} of the same file", args.channel_a);
    }

    let (a, rate_a) = load_scaled_channel(&args.input_a, args.channel_a, args.scale_a)?;
    let (b, rate_b) = load_scaled_channel(input_b, channel_b, args.scale_b)?;
    if rate_a != rate_b {
        anyhow::bail!("Sample rates differ: {rate_a} Hz and {rate_b} Hz");
    }
    // Recordings of different length are compared over their common span.
    let len = a.len().min(b.len());
    if len != a.len() || len != b.len() {
        tracing::warn!(a = a.len(), b = b.len(), "truncating recordings to common length");
    }

    println!(
        "Coherence of {} ch{} and {} ch{}: {} samples at {} Hz",
        args.input_a.display(),
        args.channel_a,
        input_b.display(),
        channel_b,
        len,
        rate_a
    );

    let est = estimator(rate_a, args.nfft, args.overlap, &args.window);
    let (a, b) = (&a[..len], &b[..len]);
    let result = if args.acceleration {
        let psd1 = est.psd(a)?;
        let psd2 = est.psd(b)?;
        let csd = est.csd(a, b)?;
        let f = &psd1.frequencies;
        coherence::estimate(
            &velocity_to_acceleration_power(f, &psd1.values)?,
            &velocity_to_acceleration_power(f, &psd2.values)?,
            &velocity_to_acceleration_cross(f, &csd.values)?,
            f,
        )?
    } else {
        coherence::estimate_from_samples(a, b, &est)?
    };

    print_summary(&result);

    if let Some(path) = args.output {
        export_coherence_csv(&result, &path)?;
        println!("\nWrote coherence to {}", path.display());
    }

    Ok(())
}

fn print_summary(result: &CoherenceResult) {
    let finite: Vec<f64> = result
        .gamma_squared
        .iter()
        .copied()
        .filter(|g| g.is_finite())
        .collect();
    if !finite.is_empty() {
        let mean = finite.iter().sum::<f64>() / finite.len() as f64;
        println!("  Mean γ²: {mean:.4} over {} bins", finite.len());
    }

    println!();
    println!(
        "  {:>12}  {:>8}  {:>9}  {:>14}  {:>14}",
        "Freq (Hz)", "γ²", "Phase (°)", "Noise A (dB)", "Noise B (dB)"
    );
    let step = (result.len() / 20).max(1);
    for i in (1..result.len()).step_by(step) {
        println!(
            "  {:>12.4}  {:>8.4}  {:>9.1}  {:>14.1}  {:>14.1}",
            result.frequencies[i],
            result.gamma_squared[i],
            result.phase_deg[i],
            power_to_db(result.self_noise_1[i]),
            power_to_db(result.self_noise_2[i])
        );
    }
}
