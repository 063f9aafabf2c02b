//! PCM WAV encoding
//!
//! Converts normalized `f32` samples into canonical 44-byte-header RIFF/WAVE
//! files (16-bit linear PCM, interleaved). Two write strategies are offered:
//!
//! - [`encode`]: writes a zeroed header placeholder, streams the samples, then
//!   seeks back and fills in the header. Needs a `Write + Seek` sink.
//! - [`write_wav`]: forward-only. Sizes are computed from the buffer before
//!   anything is written. Output is byte-identical to [`encode`].

mod encoder;
mod header;

pub use encoder::{encode, encode_to_vec, quantize, save_wav, write_wav};
pub use header::{WavHeader, HEADER_LEN};

use thiserror::Error;

/// Bits per sample written into every file.
pub const BITS_PER_SAMPLE: u16 = 16;

/// Bytes per quantized sample.
pub const BYTES_PER_SAMPLE: usize = 2;

/// Errors produced while encoding or inspecting WAV data.
#[derive(Debug, Error)]
pub enum WavError {
    #[error("wav io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid audio format: {0}")]
    InvalidFormat(String),

    #[error("malformed wav header: {0}")]
    MalformedHeader(String),
}

/// Sample rate and channel layout of a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioFormat {
    /// Samples per second per channel
    pub sample_rate: u32,
    /// Number of interleaved channels
    pub channels: u16,
}

impl AudioFormat {
    pub fn new(sample_rate: u32, channels: u16) -> Self {
        Self {
            sample_rate,
            channels,
        }
    }

    pub fn mono(sample_rate: u32) -> Self {
        Self::new(sample_rate, 1)
    }

    pub fn stereo(sample_rate: u32) -> Self {
        Self::new(sample_rate, 2)
    }

    /// Bytes per interleaved frame.
    ///
    /// Wraps for formats that [`validate`](Self::validate) would reject.
    pub fn block_align(&self) -> u16 {
        self.channels.wrapping_mul(BYTES_PER_SAMPLE as u16)
    }

    /// Bytes per second of audio.
    ///
    /// Wraps for formats that [`validate`](Self::validate) would reject.
    pub fn byte_rate(&self) -> u32 {
        self.sample_rate.wrapping_mul(self.block_align() as u32)
    }

    /// Check that the format can be described by a 16-bit PCM header.
    pub fn validate(&self) -> Result<(), WavError> {
        if self.sample_rate == 0 {
            return Err(WavError::InvalidFormat("sample rate must be > 0".into()));
        }
        if self.channels == 0 {
            return Err(WavError::InvalidFormat("channel count must be > 0".into()));
        }
        let block_align = (self.channels as u32) * BYTES_PER_SAMPLE as u32;
        if block_align > u16::MAX as u32 {
            return Err(WavError::InvalidFormat(format!(
                "{} channels overflow block align",
                self.channels
            )));
        }
        if self.sample_rate.checked_mul(block_align).is_none() {
            return Err(WavError::InvalidFormat(format!(
                "byte rate overflows for {} Hz x {} channels",
                self.sample_rate, self.channels
            )));
        }
        Ok(())
    }

    /// Number of frames in an interleaved buffer of `sample_count` samples.
    ///
    /// Fails when the format is invalid, the buffer ends mid-frame, or the
    /// data would not fit the 32-bit RIFF size fields.
    pub fn frame_count(&self, sample_count: usize) -> Result<u32, WavError> {
        self.validate()?;

        let channels = self.channels as usize;
        if sample_count % channels != 0 {
            return Err(WavError::InvalidFormat(format!(
                "{} samples is not a whole number of {}-channel frames",
                sample_count, channels
            )));
        }

        let max_data = (u32::MAX as u64) - (HEADER_LEN as u64 - 8);
        let data_bytes = sample_count as u64 * BYTES_PER_SAMPLE as u64;
        if data_bytes > max_data {
            return Err(WavError::InvalidFormat(format!(
                "{} samples exceed the 4 GiB RIFF limit",
                sample_count
            )));
        }

        Ok((sample_count / channels) as u32)
    }

    /// Duration of `frames` frames in seconds.
    pub fn duration_secs(&self, frames: usize) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        frames as f32 / self.sample_rate as f32
    }
}
