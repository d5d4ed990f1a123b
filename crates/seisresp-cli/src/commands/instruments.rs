//! Instrument table listing.

use clap::Args;
use seisresp_config::{ValidationError, is_factory_sensor, validate_table};
use std::path::PathBuf;

use super::common::load_table;

#[derive(Args)]
pub struct InstrumentsArgs {
    /// Instrument table merged over the factory table
    #[arg(long)]
    table: Option<PathBuf>,
}

pub fn run(args: InstrumentsArgs) -> anyhow::Result<()> {
    let table = load_table(args.table.as_deref())?;

    println!("Sensors:");
    for (serial, sensor) in &table.sensors {
        let origin = if is_factory_sensor(serial) { " [factory]" } else { "" };
        println!("  {serial}{origin}");
        println!(
            "    {} | {:.4} {}/{} at {} Hz | {} poles, {} zeros",
            sensor.name,
            sensor.generator_constant,
            sensor.output_unit,
            sensor.input_unit,
            sensor.reference_frequency,
            sensor.poles.len(),
            sensor.zeros.len()
        );
    }

    println!("\nPolynomial sensors:");
    for (name, sensor) in &table.polynomial_sensors {
        println!("  {name}");
        println!(
            "    {} | {} from {} | {} coefficients, valid {} to {}",
            sensor.name,
            sensor.input_unit,
            sensor.output_unit,
            sensor.coefficients.len(),
            sensor.approximation_domain.0,
            sensor.approximation_domain.1
        );
    }

    println!("\nDigitizers:");
    for (model, digitizer) in &table.digitizers {
        println!("  {model}");
        println!(
            "    vref {} V, divider {}, PGA {}, {} bits, {:.6e} counts/V, {} Hz output",
            digitizer.vref,
            digitizer.divider,
            digitizer.pga_gain,
            digitizer.bits,
            digitizer.counts_per_volt(),
            digitizer.output_sample_rate()
        );
        for sinc in &digitizer.sinc_stages {
            println!("      sinc{} length {} decimate by {}", sinc.order, sinc.length, sinc.factor);
        }
    }

    match validate_table(&table) {
        Ok(()) => {}
        Err(ValidationError::Multiple(errors)) => {
            println!("\nProblems:");
            for e in errors {
                println!("  {e}");
            }
        }
        Err(e) => println!("\nProblem: {e}"),
    }

    Ok(())
}
