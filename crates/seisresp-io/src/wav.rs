//! WAV file reading and writing.
//!
//! Integer samples are returned exactly as stored: a 24-bit digitizer
//! recording yields counts in `±2^23`, ready for the channel's sensitivity.
//! Float files are returned unscaled.

use crate::{Error, Result};
use hound::{SampleFormat, WavReader, WavWriter};
use std::path::Path;

/// WAV sample encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WavFormat {
    /// Linear PCM (integer samples).
    Pcm,
    /// IEEE 754 floating-point samples.
    IeeeFloat,
}

impl From<SampleFormat> for WavFormat {
    fn from(format: SampleFormat) -> Self {
        match format {
            SampleFormat::Float => WavFormat::IeeeFloat,
            SampleFormat::Int => WavFormat::Pcm,
        }
    }
}

/// WAV file metadata extracted without loading sample data.
#[derive(Debug, Clone)]
pub struct WavInfo {
    /// Number of channels.
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bit depth per sample.
    pub bits_per_sample: u16,
    /// Total number of sample frames (samples per channel).
    pub num_frames: u64,
    /// Duration in seconds.
    pub duration_secs: f64,
    /// Sample encoding.
    pub format: WavFormat,
}

/// Read WAV metadata without loading sample data.
pub fn read_wav_info<P: AsRef<Path>>(path: P) -> Result<WavInfo> {
    let reader = WavReader::open(path)?;
    let spec = reader.spec();
    let total_samples = u64::from(reader.len());
    let num_frames = total_samples / u64::from(spec.channels.max(1));
    let duration_secs = num_frames as f64 / f64::from(spec.sample_rate);

    Ok(WavInfo {
        channels: spec.channels,
        sample_rate: spec.sample_rate,
        bits_per_sample: spec.bits_per_sample,
        num_frames,
        duration_secs,
        format: spec.sample_format.into(),
    })
}

/// WAV file specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavSpec {
    /// Number of channels.
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bit depth per sample.
    pub bits_per_sample: u16,
    /// Sample encoding.
    pub format: WavFormat,
}

impl From<hound::WavSpec> for WavSpec {
    fn from(spec: hound::WavSpec) -> Self {
        Self {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
            format: spec.sample_format.into(),
        }
    }
}

impl From<WavSpec> for hound::WavSpec {
    fn from(spec: WavSpec) -> Self {
        hound::WavSpec {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
            sample_format: match spec.format {
                WavFormat::IeeeFloat => SampleFormat::Float,
                WavFormat::Pcm => SampleFormat::Int,
            },
        }
    }
}

/// Read every channel of a WAV file.
///
/// Returns one vector per channel, de-interleaved, in raw counts.
///
/// # Example
/// ```ignore
/// let (channels, spec) = read_wav_channels("station.wav")?;
/// println!("{} channels of {} samples at {} Hz", channels.len(), channels[0].len(), spec.sample_rate);
/// ```
pub fn read_wav_channels<P: AsRef<Path>>(path: P) -> Result<(Vec<Vec<f64>>, WavSpec)> {
    let reader = WavReader::open(path)?;
    let spec = WavSpec::from(reader.spec());
    let channels = usize::from(spec.channels.max(1));

    let interleaved: Vec<f64> = match spec.format {
        WavFormat::IeeeFloat => reader
            .into_samples::<f32>()
            .map(|s| s.map(f64::from))
            .collect::<std::result::Result<Vec<_>, _>>()?,
        WavFormat::Pcm => reader
            .into_samples::<i32>()
            .map(|s| s.map(f64::from))
            .collect::<std::result::Result<Vec<_>, _>>()?,
    };

    let frames = interleaved.len() / channels;
    let mut out = vec![Vec::with_capacity(frames); channels];
    for frame in interleaved.chunks_exact(channels) {
        for (channel, &sample) in out.iter_mut().zip(frame) {
            channel.push(sample);
        }
    }

    tracing::debug!(channels, frames, sample_rate = spec.sample_rate, "read WAV recording");
    Ok((out, spec))
}

/// Read one channel (zero-based) of a WAV file.
pub fn read_wav_channel<P: AsRef<Path>>(path: P, channel: usize) -> Result<(Vec<f64>, WavSpec)> {
    let (mut channels, spec) = read_wav_channels(path)?;
    if channel >= channels.len() {
        return Err(Error::ChannelOutOfRange {
            channel,
            channels: spec.channels,
        });
    }
    Ok((channels.swap_remove(channel), spec))
}

/// Read a WAV file mixed down to one channel by averaging.
pub fn read_wav<P: AsRef<Path>>(path: P) -> Result<(Vec<f64>, WavSpec)> {
    let (channels, spec) = read_wav_channels(path)?;
    if channels.len() == 1 {
        let mono = channels.into_iter().next().unwrap_or_default();
        return Ok((mono, spec));
    }

    let frames = channels.first().map_or(0, Vec::len);
    let scale = 1.0 / channels.len() as f64;
    let mono = (0..frames)
        .map(|i| channels.iter().map(|c| c[i]).sum::<f64>() * scale)
        .collect();
    Ok((mono, spec))
}

/// Write raw counts as integer PCM.
///
/// Values are rounded and clamped to the range of `bits_per_sample`, which
/// must be 8 to 32.
pub fn write_wav_counts<P: AsRef<Path>>(
    path: P,
    channels: &[Vec<f64>],
    sample_rate: u32,
    bits_per_sample: u16,
) -> Result<()> {
    if !(8..=32).contains(&bits_per_sample) {
        return Err(Error::UnsupportedBitDepth(bits_per_sample));
    }
    let frames = channels.first().map_or(0, Vec::len);
    for (i, channel) in channels.iter().enumerate() {
        if channel.len() != frames {
            return Err(Error::RaggedChannels {
                channel: i,
                expected: frames,
                found: channel.len(),
            });
        }
    }

    let spec = WavSpec {
        channels: channels.len() as u16,
        sample_rate,
        bits_per_sample,
        format: WavFormat::Pcm,
    };
    let mut writer = WavWriter::create(path, spec.into())?;
    let max_val = f64::from(1u32 << (bits_per_sample - 1));
    for i in 0..frames {
        for channel in channels {
            let count = channel[i].round().clamp(-max_val, max_val - 1.0) as i32;
            writer.write_sample(count)?;
        }
    }
    writer.finalize()?;
    Ok(())
}

/// Write a mono 16-bit file scaled so the largest excursion reaches `peak`
/// of full scale.
///
/// The mean is removed first, so a digitizer offset does not eat the
/// headroom. Playing the file at a higher `sample_rate` than recorded
/// shifts long-period ground motion into the audible band.
pub fn write_wav_normalized<P: AsRef<Path>>(path: P, samples: &[f64], sample_rate: u32, peak: f64) -> Result<()> {
    if !(peak > 0.0 && peak <= 1.0) {
        return Err(Error::InvalidPeak(peak));
    }

    let mean = if samples.is_empty() {
        0.0
    } else {
        samples.iter().sum::<f64>() / samples.len() as f64
    };
    let max_abs = samples.iter().map(|&s| (s - mean).abs()).fold(0.0, f64::max);
    let gain = if max_abs > 0.0 {
        peak * f64::from(i16::MAX) / max_abs
    } else {
        0.0
    };

    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        format: WavFormat::Pcm,
    };
    let mut writer = WavWriter::create(path, spec.into())?;
    for &s in samples {
        let value = ((s - mean) * gain).round().clamp(f64::from(i16::MIN), f64::from(i16::MAX));
        writer.write_sample(value as i16)?;
    }
    writer.finalize()?;

    tracing::debug!(samples = samples.len(), sample_rate, gain, "wrote normalized WAV");
    Ok(())
}
