//! Sinc filter coefficients.

use clap::Args;
use seisresp_core::{sinc_coefficients, sinc_group_delay_samples};
use std::io::Write;
use std::path::PathBuf;

#[derive(Args)]
pub struct SincArgs {
    /// Number of cascaded boxcars
    #[arg(long)]
    order: usize,

    /// Boxcar length
    #[arg(long)]
    length: usize,

    /// Input sample rate (Hz), to report the group delay in seconds
    #[arg(long)]
    sample_rate: Option<f64>,

    /// Output CSV file (index,coefficient)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub fn run(args: SincArgs) -> anyhow::Result<()> {
    let taps = sinc_coefficients(args.order, args.length)?;
    let delay = sinc_group_delay_samples(taps.len());

    println!("sinc{} with boxcar length {}", args.order, args.length);
    println!("  Taps: {}", taps.len());
    println!("  DC gain: {:.12}", taps.iter().sum::<f64>());
    match args.sample_rate {
        Some(rate) => println!("  Group delay: {delay} samples ({:.6e} s)", delay / rate),
        None => println!("  Group delay: {delay} samples"),
    }

    match args.output {
        Some(path) => {
            let mut file = std::io::BufWriter::new(std::fs::File::create(&path)?);
            writeln!(file, "index,coefficient")?;
            for (i, c) in taps.iter().enumerate() {
                writeln!(file, "{i},{c:.17e}")?;
            }
            file.flush()?;
            println!("\nWrote {} coefficients to {}", taps.len(), path.display());
        }
        None if taps.len() <= 64 => {
            println!();
            for (i, c) in taps.iter().enumerate() {
                println!("  {i:>4}  {c:.12e}");
            }
        }
        None => {}
    }

    Ok(())
}
