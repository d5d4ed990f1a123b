//! Shared CLI helpers used across multiple commands.

use seisresp_analysis::{SpectralEstimator, Window};
use seisresp_config::{InstrumentTable, load_user_or_factory, paths::load_merged};
use std::path::{Path, PathBuf};

/// Load the instrument table.
///
/// With `--table`, the file is merged over the factory table and must
/// exist. Without it, the user table from the config directory is merged
/// if present.
pub fn load_table(table: Option<&Path>) -> anyhow::Result<InstrumentTable> {
    match table {
        Some(path) => {
            if !path.is_file() {
                anyhow::bail!("Instrument table '{}' not found", path.display());
            }
            Ok(load_merged(path)?)
        }
        None => Ok(load_user_or_factory()?),
    }
}

/// Parse a window name, falling back to Hann.
pub fn parse_window(name: &str) -> Window {
    Window::from_name(name).unwrap_or_else(|| {
        eprintln!("Unknown window '{}', using Hann", name);
        Window::Hann
    })
}

/// Read one channel of a recording and scale counts to physical units.
pub fn load_scaled_channel(path: &PathBuf, channel: usize, scale: f64) -> anyhow::Result<(Vec<f64>, f64)> {
    let (counts, spec) = seisresp_io::read_wav_channel(path, channel)?;
    if counts.is_empty() {
        anyhow::bail!("'{}' channel {} has no samples", path.display(), channel);
    }
    let samples = seisresp_analysis::convert::scale_samples(&counts, scale);
    Ok((samples, f64::from(spec.sample_rate)))
}

/// Welch estimator for the CLI options.
pub fn estimator(sample_rate: f64, nfft: usize, overlap: f64, window: &str) -> SpectralEstimator {
    SpectralEstimator::new(sample_rate, nfft)
        .with_overlap(overlap)
        .with_window(parse_window(window))
}
