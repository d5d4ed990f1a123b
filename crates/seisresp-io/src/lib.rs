//! Recording I/O for seisresp.
//!
//! Digitizer output arrives as multi-channel WAV files holding raw counts.
//! This crate provides:
//!
//! - **Reading**: [`read_wav_channels`] keeps every channel as raw counts,
//!   [`read_wav`] mixes down to one channel, [`read_wav_info`] reads only the header
//! - **Writing**: [`write_wav_counts`] stores raw counts, [`write_wav_normalized`]
//!   produces a peak-normalized 16-bit file for listening to an event
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use seisresp_io::{read_wav_channels, write_wav_normalized};
//!
//! let (channels, spec) = read_wav_channels("station.wav")?;
//! let vertical = &channels[0];
//!
//! // Speed up 100x to bring 1 Hz ground motion into the audible range
//! write_wav_normalized("event.wav", vertical, spec.sample_rate * 100, 0.9)?;
//! ```

mod wav;

pub use wav::{
    WavFormat, WavInfo, WavSpec, read_wav, read_wav_channel, read_wav_channels, read_wav_info,
    write_wav_counts, write_wav_normalized,
};

/// Error types for recording I/O.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// A channel index beyond the file's channel count.
    #[error("channel {channel} requested but file has {channels} channel(s)")]
    ChannelOutOfRange {
        /// Requested zero-based channel.
        channel: usize,
        /// Channels in the file.
        channels: u16,
    },

    /// Channels passed for writing differ in length.
    #[error("channel {channel} has {found} samples, expected {expected}")]
    RaggedChannels {
        /// Offending channel.
        channel: usize,
        /// Samples in the first channel.
        expected: usize,
        /// Samples in the offending channel.
        found: usize,
    },

    /// Integer sample width outside `8..=32` bits.
    #[error("unsupported bit depth {0}; expected 8 to 32 bits")]
    UnsupportedBitDepth(u16),

    /// Normalization peak outside `(0, 1]`.
    #[error("normalization peak {0} is outside (0, 1]")]
    InvalidPeak(f64),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for recording I/O.
pub type Result<T> = std::result::Result<T, Error>;
