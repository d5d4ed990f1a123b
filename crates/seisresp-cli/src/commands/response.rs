//! Channel response assembly and export.

use clap::Args;
use seisresp_core::{ChainWarning, ResponseChain, Sensitivity, compose};
use std::path::PathBuf;

use super::common::load_table;

#[derive(Args)]
pub struct ResponseArgs {
    /// Instrument table merged over the factory table
    #[arg(long)]
    table: Option<PathBuf>,

    /// Sensor serial number
    #[arg(long, conflicts_with = "polynomial_sensor")]
    sensor: Option<String>,

    /// Polynomial sensor name (e.g. lm35)
    #[arg(long)]
    polynomial_sensor: Option<String>,

    /// Digitizer model
    #[arg(long)]
    digitizer: String,

    /// Write the chain as JSON
    #[arg(long)]
    json: Option<PathBuf>,

    /// Write the pole-zero response in SAC format
    #[arg(long)]
    sacpz: Option<PathBuf>,

    /// Frequencies (Hz) at which to evaluate the response
    #[arg(long = "freq", value_name = "HZ")]
    frequencies: Vec<f64>,
}

pub fn run(args: ResponseArgs) -> anyhow::Result<()> {
    let table = load_table(args.table.as_deref())?;

    let sensor = match (&args.sensor, &args.polynomial_sensor) {
        (Some(serial), _) => Some(table.require_sensor(serial)?.stage()),
        (None, Some(name)) => Some(table.require_polynomial_sensor(name)?.stage()),
        (None, None) => None,
    };
    let digitizer = table.require_digitizer(&args.digitizer)?;
    let chain = compose(sensor, &digitizer.stages()?)?;

    print_chain(&chain);
    println!("  Output sample rate: {} Hz", digitizer.output_sample_rate());

    let frequencies = if args.frequencies.is_empty() {
        chain.reference_frequency().into_iter().collect()
    } else {
        args.frequencies
    };
    if !frequencies.is_empty() {
        println!();
        println!("  {:>12}  {:>14}  {:>10}", "Freq (Hz)", "Amplitude", "Phase (°)");
        for f in frequencies {
            match chain.response(f) {
                Ok(h) => println!("  {:>12.4}  {:>14.6e}  {:>10.2}", f, h.norm(), h.arg().to_degrees()),
                Err(e) => println!("  {:>12.4}  {}", f, e),
            }
        }
    }

    if let Some(path) = args.json {
        std::fs::write(&path, serde_json::to_string_pretty(&chain)?)?;
        println!("\nWrote JSON response to {}", path.display());
    }

    if let Some(path) = args.sacpz {
        std::fs::write(&path, chain.to_sacpz()?)?;
        println!("Wrote SAC pole-zero file to {}", path.display());
    }

    Ok(())
}

fn print_chain(chain: &ResponseChain) {
    println!("Response: {} -> {}", chain.input_unit(), chain.output_unit());
    println!();
    println!("  {:>3}  {:<8}  {:<58}  {:>14}", "Seq", "Units", "Stage", "Gain");
    for numbered in chain.stages() {
        let stage = &numbered.stage;
        let gain = stage
            .stage_gain()
            .map_or_else(|| "polynomial".to_string(), |g| format!("{g:.6e}"));
        println!(
            "  {:>3}  {:<8}  {:<58}  {:>14}",
            numbered.sequence,
            format!("{}>{}", stage.input_unit(), stage.output_unit()),
            stage.name(),
            gain
        );
    }
    println!();

    match chain.sensitivity() {
        Some(Sensitivity::Scalar { value, frequency, .. }) => {
            let at = frequency.map_or_else(String::new, |f| format!(" at {f} Hz"));
            println!("  Sensitivity: {value:.6e} {}/{}{at}", chain.output_unit(), chain.input_unit());
        }
        Some(Sensitivity::Polynomial {
            coefficients,
            approximation_domain,
            ..
        }) => {
            println!("  Polynomial sensitivity (ascending powers of {}):", chain.output_unit());
            for (i, c) in coefficients.iter().enumerate() {
                println!("    c{i} = {c:.6e}");
            }
            println!(
                "  Valid for {} to {} {}",
                approximation_domain.0,
                approximation_domain.1,
                chain.input_unit()
            );
        }
        None => println!("  Sensitivity: unavailable"),
    }

    for warning in chain.warnings() {
        match warning {
            ChainWarning::UnnormalizedStage { sequence, name } => {
                println!("  Warning: stage {sequence} ({name}) is unnormalized and excluded from the sensitivity");
            }
            ChainWarning::DerivationFailed { reason } => {
                println!("  Warning: sensitivity derivation failed: {reason}");
            }
        }
    }
}
