//! Relayed audio segments

use std::time::Instant;

use crate::wav::{write_wav, AudioFormat, WavError, HEADER_LEN};

/// A slice of captured audio handed from the relay to its receiver
#[derive(Debug, Clone)]
pub struct AudioSegment {
    /// Sequence number for ordering (monotonically increasing from 0)
    pub sequence: u64,
    /// Interleaved normalized samples
    pub samples: Vec<f32>,
    pub format: AudioFormat,
    /// Monotonic timestamp when the segment was cut
    pub captured_at: Instant,
}

impl AudioSegment {
    pub fn new(sequence: u64, samples: Vec<f32>, format: AudioFormat) -> Self {
        Self {
            sequence,
            samples,
            format,
            captured_at: Instant::now(),
        }
    }

    /// Frames in this segment
    pub fn frames(&self) -> usize {
        match self.format.channels {
            0 => 0,
            ch => self.samples.len() / ch as usize,
        }
    }

    /// Duration of this segment in milliseconds
    pub fn duration_ms(&self) -> u64 {
        if self.format.sample_rate == 0 {
            return 0;
        }
        (self.frames() as u64 * 1000) / self.format.sample_rate as u64
    }

    /// Encode the segment as a standalone WAV file.
    pub fn to_wav_bytes(&self) -> Result<Vec<u8>, WavError> {
        let mut out = Vec::with_capacity(HEADER_LEN + self.samples.len() * 2);
        write_wav(&mut out, self.format, &self.samples)?;
        Ok(out)
    }
}

/// Copy `len` samples starting at `start`, clamped to the end of `samples`.
pub fn slice_segment(samples: &[f32], start: usize, len: usize) -> Vec<f32> {
    let end = start.saturating_add(len).min(samples.len());
    if start >= end {
        return Vec::new();
    }
    samples[start..end].to_vec()
}
