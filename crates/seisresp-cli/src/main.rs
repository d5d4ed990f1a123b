//! Seisresp CLI - instrument responses and station noise analysis.

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "seisresp")]
#[command(author, version, about = "Seismic instrument response and noise analysis", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a channel response from the instrument table
    Response(commands::response::ResponseArgs),

    /// List the sensors and digitizers in the instrument table
    Instruments(commands::instruments::InstrumentsArgs),

    /// Print or export sinc filter coefficients
    Sinc(commands::sinc::SincArgs),

    /// Power spectral density of a recording against the noise models
    Psd(commands::psd::PsdArgs),

    /// Coherence and self-noise of two co-located sensors
    Coherence(commands::coherence::CoherenceArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Response(args) => commands::response::run(args),
        Commands::Instruments(args) => commands::instruments::run(args),
        Commands::Sinc(args) => commands::sinc::run(args),
        Commands::Psd(args) => commands::psd::run(args),
        Commands::Coherence(args) => commands::coherence::run(args),
    }
}
