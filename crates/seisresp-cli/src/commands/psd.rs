//! Power spectral density against the Peterson noise models.

use clap::Args;
use seisresp_analysis::convert::velocity_to_acceleration_power;
use seisresp_analysis::db::power_db;
use seisresp_analysis::export::export_columns_csv;
use seisresp_analysis::NoiseModel;
use std::path::PathBuf;

use super::common::{estimator, load_scaled_channel};

#[derive(Args)]
pub struct PsdArgs {
    /// Input WAV file (raw counts)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Channel to analyze (zero-based)
    #[arg(long, default_value = "0")]
    channel: usize,

    /// Physical units per count (e.g. m/s per count)
    #[arg(long, default_value = "1.0")]
    scale: f64,

    /// Segment / FFT length
    #[arg(long, default_value = "4096")]
    nfft: usize,

    /// Fractional segment overlap
    #[arg(long, default_value = "0.0")]
    overlap: f64,

    /// Window function
    #[arg(long, default_value = "hann")]
    window: String,

    /// Report acceleration instead of velocity
    #[arg(long)]
    acceleration: bool,

    /// Output CSV file
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub fn run(args: PsdArgs) -> anyhow::Result<()> {
    let (samples, sample_rate) = load_scaled_channel(&args.input, args.channel, args.scale)?;
    println!(
        "PSD of {} channel {}: {} samples at {} Hz",
        args.input.display(),
        args.channel,
        samples.len(),
        sample_rate
    );

    let est = estimator(sample_rate, args.nfft, args.overlap, &args.window);
    let psd = est.psd(&samples)?;
    let values = if args.acceleration {
        velocity_to_acceleration_power(&psd.frequencies, &psd.values)?
    } else {
        psd.values.clone()
    };
    let db = power_db(&values);

    let (low, high) = NoiseModel::peterson_pair(args.acceleration);
    let model_db = |model: &NoiseModel| -> Vec<f64> {
        psd.frequencies
            .iter()
            .map(|&f| model.interpolate_db(f).unwrap_or(f64::NAN))
            .collect()
    };
    let low_db = model_db(&low);
    let high_db = model_db(&high);

    println!(
        "  {} segments, {:.6} Hz resolution",
        psd.segments,
        sample_rate / args.nfft as f64
    );

    // Bins where the recording lies under the low noise model are
    // instrument-limited or mis-scaled.
    let below = db
        .iter()
        .zip(&low_db)
        .skip(1)
        .filter(|&(d, l)| l.is_finite() && d < l)
        .count();
    let above = db
        .iter()
        .zip(&high_db)
        .skip(1)
        .filter(|&(d, h)| h.is_finite() && d > h)
        .count();
    println!("  Bins below {}: {}", low.name(), below);
    println!("  Bins above {}: {}", high.name(), above);

    match args.output {
        Some(path) => {
            export_columns_csv(
                &path,
                &psd.frequencies,
                &[
                    ("psd", values.as_slice()),
                    ("psd_db", db.as_slice()),
                    ("nlnm_db", low_db.as_slice()),
                    ("nhnm_db", high_db.as_slice()),
                ],
            )?;
            println!("\nWrote PSD to {}", path.display());
        }
        None => {
            println!();
            println!("  {:>12}  {:>10}  {:>10}  {:>10}", "Freq (Hz)", "PSD (dB)", "NLNM", "NHNM");
            let step = (psd.frequencies.len() / 20).max(1);
            for i in (1..psd.frequencies.len()).step_by(step) {
                println!(
                    "  {:>12.4}  {:>10.1}  {:>10.1}  {:>10.1}",
                    psd.frequencies[i], db[i], low_db[i], high_db[i]
                );
            }
        }
    }

    Ok(())
}
