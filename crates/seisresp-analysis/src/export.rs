//! CSV export for analysis results.
//!
//! Plotting happens outside this crate; results leave as plain CSV with a
//! header row and one line per frequency bin.

use crate::coherence::CoherenceResult;
use crate::db::power_to_db;
use crate::spectrum::Psd;
use std::io::Write;
use std::path::Path;

/// Write named columns against a frequency column.
///
/// Columns shorter than `frequencies` leave their trailing cells empty.
///
/// # Example
///
/// ```rust,ignore
/// use seisresp_analysis::export::export_columns_csv;
///
/// export_columns_csv("psd.csv", &freqs, &[("psd_db", &psd_db[..]), ("nlnm_db", &nlnm[..])])?;
/// ```
pub fn export_columns_csv(
    path: impl AsRef<Path>,
    frequencies: &[f64],
    columns: &[(&str, &[f64])],
) -> std::io::Result<()> {
    let mut file = std::io::BufWriter::new(std::fs::File::create(path)?);
    write_columns(&mut file, frequencies, columns)?;
    file.flush()
}

/// Write named columns to any writer.
pub fn write_columns<W: Write>(out: &mut W, frequencies: &[f64], columns: &[(&str, &[f64])]) -> std::io::Result<()> {
    write!(out, "frequency_hz")?;
    for (name, _) in columns {
        write!(out, ",{name}")?;
    }
    writeln!(out)?;

    for (i, f) in frequencies.iter().enumerate() {
        write!(out, "{f:.6e}")?;
        for (_, values) in columns {
            match values.get(i) {
                Some(v) => write!(out, ",{v:.6e}")?,
                None => write!(out, ",")?,
            }
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Export a PSD as linear and dB columns.
pub fn export_psd_csv(psd: &Psd, path: impl AsRef<Path>) -> std::io::Result<()> {
    let db: Vec<f64> = psd.values.iter().map(|&p| power_to_db(p)).collect();
    export_columns_csv(path, &psd.frequencies, &[("psd", psd.values.as_slice()), ("psd_db", db.as_slice())])
}

/// Export coherence, phase and both self-noise curves.
pub fn export_coherence_csv(result: &CoherenceResult, path: impl AsRef<Path>) -> std::io::Result<()> {
    export_columns_csv(
        path,
        &result.frequencies,
        &[
            ("gamma_squared", result.gamma_squared.as_slice()),
            ("phase_deg", result.phase_deg.as_slice()),
            ("self_noise_1", result.self_noise_1.as_slice()),
            ("self_noise_2", result.self_noise_2.as_slice()),
        ],
    )
}
