//! Integration tests for seisresp-cli.
//!
//! Tests run the `seisresp` binary against the factory instrument table and
//! small generated recordings.

use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

/// Helper to get the path to the `seisresp` binary built by cargo.
fn seisresp_bin() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_seisresp"));
    // Keep any user instrument table out of the picture.
    cmd.env("XDG_CONFIG_HOME", std::env::temp_dir().join("seisresp-cli-tests"));
    cmd.env("RUST_LOG", "error");
    cmd
}

/// Write raw counts as a 24-bit recording.
fn write_wav(path: &Path, channels: &[Vec<f64>], sample_rate: u32) {
    seisresp_io::write_wav_counts(path, channels, sample_rate, 24).unwrap();
}

fn noise(len: usize, seed: u64) -> Vec<f64> {
    let mut state = seed;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            f64::from(((state >> 40) as i32 & 0xffff) - 0x8000)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// seisresp instruments / response / sinc
// ---------------------------------------------------------------------------

#[test]
fn instruments_lists_factory_table() {
    let output = seisresp_bin().arg("instruments").output().expect("failed to run seisresp");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    for entry in ["yuma2-u2", "lm35", "seiscape2", "psn-adc24"] {
        assert!(stdout.contains(entry), "listing should contain '{entry}'");
    }
    assert!(!stdout.contains("Problem"), "factory table should validate");
}

#[test]
fn response_writes_json_and_sacpz() {
    let dir = TempDir::new().unwrap();
    let json = dir.path().join("chain.json");
    let sacpz = dir.path().join("chain.pz");

    let output = seisresp_bin()
        .args(["response", "--sensor", "yuma2-u2", "--digitizer", "seiscape2"])
        .arg("--json")
        .arg(&json)
        .arg("--sacpz")
        .arg(&sacpz)
        .args(["--freq", "1.0", "--freq", "10.0"])
        .output()
        .expect("failed to run seisresp response");
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("M/S -> COUNTS"));
    assert!(stdout.contains("ADC sinc1 digital filter"));
    assert!(stdout.contains("Output sample rate: 125 Hz"));

    let chain: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&json).unwrap()).unwrap();
    assert_eq!(chain["stages"].as_array().unwrap().len(), 6);

    let pz = std::fs::read_to_string(&sacpz).unwrap();
    assert!(pz.contains("ZEROS 3"));
    assert!(pz.contains("POLES 6"));
    assert!(pz.contains("CONSTANT"));
}

#[test]
fn response_reports_polynomial_sensitivity() {
    let output = seisresp_bin()
        .args(["response", "--polynomial-sensor", "lm35", "--digitizer", "seiscape2"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Polynomial sensitivity"));
    assert!(stdout.contains("DEGC -> COUNTS"));
}

#[test]
fn response_unknown_sensor_fails() {
    let output = seisresp_bin()
        .args(["response", "--sensor", "T9999", "--digitizer", "seiscape2"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown sensor: T9999"));
}

#[test]
fn response_uses_table_file() {
    let dir = TempDir::new().unwrap();
    let table = dir.path().join("instruments.toml");
    std::fs::write(
        &table,
        r#"
[sensors.T0042]
name = "Field geophone"
generator_constant = 28.8
poles = [[-20.0, 20.0], [-20.0, -20.0]]
zeros = [[0.0, 0.0], [0.0, 0.0]]
"#,
    )
    .unwrap();

    let output = seisresp_bin()
        .arg("response")
        .arg("--table")
        .arg(&table)
        .args(["--sensor", "T0042", "--digitizer", "seiscape2"])
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(String::from_utf8_lossy(&output.stdout).contains("Field geophone"));
}

#[test]
fn sinc_exports_coefficients() {
    let dir = TempDir::new().unwrap();
    let csv = dir.path().join("sinc.csv");
    let output = seisresp_bin()
        .args(["sinc", "--order", "3", "--length", "4", "--output"])
        .arg(&csv)
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Taps: 10"));

    let text = std::fs::read_to_string(&csv).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "index,coefficient");
    assert_eq!(lines.len(), 11);
    let sum: f64 = lines[1..]
        .iter()
        .map(|l| l.split(',').nth(1).unwrap().parse::<f64>().unwrap())
        .sum();
    assert!((sum - 1.0).abs() < 1e-12);
}

#[test]
fn sinc_rejects_zero_order() {
    let output = seisresp_bin()
        .args(["sinc", "--order", "0", "--length", "4"])
        .output()
        .unwrap();
    assert!(!output.status.success());
}

// ---------------------------------------------------------------------------
// seisresp psd / coherence
// ---------------------------------------------------------------------------

#[test]
fn psd_writes_csv_with_noise_models() {
    let dir = TempDir::new().unwrap();
    let wav = dir.path().join("station.wav");
    let csv = dir.path().join("psd.csv");
    write_wav(&wav, &[noise(2048, 1)], 100);

    let output = seisresp_bin()
        .arg("psd")
        .arg(&wav)
        .args(["--nfft", "256", "--scale", "1e-9", "--output"])
        .arg(&csv)
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(String::from_utf8_lossy(&output.stdout).contains("8 segments"));

    let text = std::fs::read_to_string(&csv).unwrap();
    assert!(text.starts_with("frequency_hz,psd,psd_db,nlnm_db,nhnm_db\n"));
    assert_eq!(text.lines().count(), 1 + 129);
}

#[test]
fn coherence_of_two_channels() {
    let dir = TempDir::new().unwrap();
    let wav = dir.path().join("pair.wav");
    let csv = dir.path().join("coherence.csv");
    let shared = noise(4096, 7);
    write_wav(&wav, &[shared.clone(), shared], 100);

    let output = seisresp_bin()
        .arg("coherence")
        .arg(&wav)
        .args(["--nfft", "512", "--output"])
        .arg(&csv)
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let text = std::fs::read_to_string(&csv).unwrap();
    assert!(text.starts_with("frequency_hz,gamma_squared,phase_deg,self_noise_1,self_noise_2\n"));
    for line in text.lines().skip(2) {
        let gamma2: f64 = line.split(',').nth(1).unwrap().parse().unwrap();
        assert!((gamma2 - 1.0).abs() < 1e-9, "line: {line}");
    }
}

#[test]
fn coherence_of_two_files() {
    let dir = TempDir::new().unwrap();
    let wav_a = dir.path().join("a.wav");
    let wav_b = dir.path().join("b.wav");
    let csv = dir.path().join("coherence.csv");
    let shared = noise(4096, 11);
    write_wav(&wav_a, &[shared.clone()], 100);
    write_wav(&wav_b, &[shared], 100);

    let output = seisresp_bin()
        .arg("coherence")
        .arg(&wav_a)
        .arg(&wav_b)
        .args(["--nfft", "512", "--output"])
        .arg(&csv)
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(String::from_utf8_lossy(&output.stdout).contains("b.wav ch0"));

    let text = std::fs::read_to_string(&csv).unwrap();
    assert_eq!(text.lines().count(), 1 + 257);
    for line in text.lines().skip(2) {
        let gamma2: f64 = line.split(',').nth(1).unwrap().parse().unwrap();
        assert!((gamma2 - 1.0).abs() < 1e-9, "line: {line}");
    }
}

#[test]
fn coherence_second_file_channel_can_be_chosen() {
    let dir = TempDir::new().unwrap();
    let wav_a = dir.path().join("a.wav");
    let wav_b = dir.path().join("b.wav");
    write_wav(&wav_a, &[noise(1024, 5)], 100);
    write_wav(&wav_b, &[noise(1024, 6), noise(1024, 5)], 100);

    let output = seisresp_bin()
        .arg("coherence")
        .arg(&wav_a)
        .arg(&wav_b)
        .args(["--channel-b", "1", "--nfft", "256"])
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(String::from_utf8_lossy(&output.stdout).contains("b.wav ch1"));
}

#[test]
fn coherence_same_channel_is_rejected() {
    let dir = TempDir::new().unwrap();
    let wav = dir.path().join("mono.wav");
    write_wav(&wav, &[noise(512, 3)], 100);

    let output = seisresp_bin()
        .arg("coherence")
        .arg(&wav)
        .args(["--channel-b", "0"])
        .output()
        .unwrap();
    assert!(!output.status.success());
}
