//! Canonical 44-byte RIFF/WAVE header
//!
//! Layout (little-endian):
//!
//! ```text
//! 0  "RIFF"   4  chunk size (file length - 8)   8  "WAVE"
//! 12 "fmt "   16 16   20 1 (PCM)   22 channels   24 sample rate
//! 28 byte rate   32 block align   34 bits per sample
//! 36 "data"   40 data size   44 PCM data
//! ```

use super::{AudioFormat, WavError, BITS_PER_SAMPLE};

/// Size of the header that precedes the PCM data.
pub const HEADER_LEN: usize = 44;

const FMT_CHUNK_LEN: u32 = 16;
const PCM_FORMAT_TAG: u16 = 1;

/// Header fields of a 16-bit PCM WAV file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavHeader {
    pub chunk_size: u32,
    pub channels: u16,
    pub sample_rate: u32,
    pub byte_rate: u32,
    pub block_align: u16,
    pub bits_per_sample: u16,
    pub data_size: u32,
}

impl WavHeader {
    /// Header for `frames` frames of `format` with no trailing chunks.
    ///
    /// The format must already be validated (see [`AudioFormat::frame_count`]).
    pub fn new(format: AudioFormat, frames: u32) -> Self {
        let data_size = frames * format.block_align() as u32;
        Self {
            chunk_size: (HEADER_LEN as u32 - 8) + data_size,
            channels: format.channels,
            sample_rate: format.sample_rate,
            byte_rate: format.byte_rate(),
            block_align: format.block_align(),
            bits_per_sample: BITS_PER_SAMPLE,
            data_size,
        }
    }

    pub fn format(&self) -> AudioFormat {
        AudioFormat::new(self.sample_rate, self.channels)
    }

    /// Frames described by the data chunk.
    pub fn frames(&self) -> u32 {
        if self.block_align == 0 {
            return 0;
        }
        self.data_size / self.block_align as u32
    }

    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut out = [0u8; HEADER_LEN];
        out[0..4].copy_from_slice(b"RIFF");
        out[4..8].copy_from_slice(&self.chunk_size.to_le_bytes());
        out[8..12].copy_from_slice(b"WAVE");
        out[12..16].copy_from_slice(b"fmt ");
        out[16..20].copy_from_slice(&FMT_CHUNK_LEN.to_le_bytes());
        out[20..22].copy_from_slice(&PCM_FORMAT_TAG.to_le_bytes());
        out[22..24].copy_from_slice(&self.channels.to_le_bytes());
        out[24..28].copy_from_slice(&self.sample_rate.to_le_bytes());
        out[28..32].copy_from_slice(&self.byte_rate.to_le_bytes());
        out[32..34].copy_from_slice(&self.block_align.to_le_bytes());
        out[34..36].copy_from_slice(&self.bits_per_sample.to_le_bytes());
        out[36..40].copy_from_slice(b"data");
        out[40..44].copy_from_slice(&self.data_size.to_le_bytes());
        out
    }

    /// Read back a canonical header from the start of `bytes`.
    pub fn parse(bytes: &[u8]) -> Result<Self, WavError> {
        if bytes.len() < HEADER_LEN {
            return Err(WavError::MalformedHeader(format!(
                "need {} bytes, got {}",
                HEADER_LEN,
                bytes.len()
            )));
        }

        for (offset, tag) in [(0, b"RIFF"), (8, b"WAVE"), (12, b"fmt "), (36, b"data")] {
            if &bytes[offset..offset + 4] != tag {
                return Err(WavError::MalformedHeader(format!(
                    "expected {:?} at offset {}",
                    String::from_utf8_lossy(tag),
                    offset
                )));
            }
        }

        let fmt_len = read_u32(bytes, 16);
        if fmt_len != FMT_CHUNK_LEN {
            return Err(WavError::MalformedHeader(format!(
                "fmt chunk length {} (expected {})",
                fmt_len, FMT_CHUNK_LEN
            )));
        }
        let format_tag = read_u16(bytes, 20);
        if format_tag != PCM_FORMAT_TAG {
            return Err(WavError::MalformedHeader(format!(
                "format tag {} is not PCM",
                format_tag
            )));
        }

        Ok(Self {
            chunk_size: read_u32(bytes, 4),
            channels: read_u16(bytes, 22),
            sample_rate: read_u32(bytes, 24),
            byte_rate: read_u32(bytes, 28),
            block_align: read_u16(bytes, 32),
            bits_per_sample: read_u16(bytes, 34),
            data_size: read_u32(bytes, 40),
        })
    }
}

fn read_u16(bytes: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}
