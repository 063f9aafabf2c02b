//! Sample quantization and WAV writers

use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Cursor, Seek, SeekFrom, Write};
use std::path::Path;

use super::header::{WavHeader, HEADER_LEN};
use super::{AudioFormat, WavError, BYTES_PER_SAMPLE};

/// Scale factor from normalized float to 16-bit PCM.
const RESCALE_FACTOR: f32 = 32767.0;

/// Quantize a normalized sample to 16-bit PCM.
///
/// The product is truncated toward zero into 32 bits and then narrowed to 16
/// bits, so samples outside [-1.0, 1.0] wrap around rather than clip
/// (`2.0` becomes `-2`). NaN becomes 0.
pub fn quantize(sample: f32) -> i16 {
    (sample * RESCALE_FACTOR) as i32 as i16
}

fn pcm16_bytes(samples: &[f32]) -> Vec<u8> {
    let mut pcm = Vec::with_capacity(samples.len() * BYTES_PER_SAMPLE);
    for &sample in samples {
        pcm.extend_from_slice(&quantize(sample).to_le_bytes());
    }
    pcm
}

/// Encode `samples` into `sink` as a complete WAV file.
///
/// A zeroed header is written first, then the PCM data, then the sink is
/// rewound and the header filled in. The RIFF chunk size is taken from the
/// stream length after the data is written. The sink is flushed and dropped
/// before returning, on success and on error alike; after an error its
/// contents are undefined.
pub fn encode<S: Write + Seek>(
    mut sink: S,
    format: AudioFormat,
    samples: &[f32],
) -> Result<(), WavError> {
    let frames = format.frame_count(samples.len())?;

    sink.write_all(&[0u8; HEADER_LEN])?;
    sink.write_all(&pcm16_bytes(samples))?;

    let stream_len = sink.seek(SeekFrom::End(0))?;
    sink.seek(SeekFrom::Start(0))?;

    let mut header = WavHeader::new(format, frames);
    header.chunk_size = u32::try_from(stream_len.saturating_sub(8)).map_err(|_| {
        WavError::InvalidFormat(format!("stream length {} exceeds RIFF limit", stream_len))
    })?;

    sink.write_all(&header.to_bytes())?;
    sink.flush()?;
    Ok(())
}

/// Write a complete WAV file to a forward-only writer.
///
/// Sizes are derived from the buffer length up front, so no seeking is
/// needed. Produces the same bytes as [`encode`] into an empty sink.
pub fn write_wav<W: Write>(
    mut writer: W,
    format: AudioFormat,
    samples: &[f32],
) -> Result<(), WavError> {
    let frames = format.frame_count(samples.len())?;

    writer.write_all(&WavHeader::new(format, frames).to_bytes())?;
    writer.write_all(&pcm16_bytes(samples))?;
    writer.flush()?;
    Ok(())
}

/// Encode into an in-memory buffer.
pub fn encode_to_vec(format: AudioFormat, samples: &[f32]) -> Result<Vec<u8>, WavError> {
    let mut cursor = Cursor::new(Vec::with_capacity(
        HEADER_LEN + samples.len() * BYTES_PER_SAMPLE,
    ));
    encode(&mut cursor, format, samples)?;
    Ok(cursor.into_inner())
}

/// Encode into a new file at `path`.
///
/// The parent directory is created if missing. The file must not already
/// exist; an existing file is left untouched and the call fails with an
/// `AlreadyExists` I/O error. If encoding fails after the file was created,
/// the partial file is removed.
pub fn save_wav(path: &Path, format: AudioFormat, samples: &[f32]) -> Result<(), WavError> {
    // Reject bad formats before touching the filesystem
    format.frame_count(samples.len())?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let file = OpenOptions::new().write(true).create_new(true).open(path)?;

    encode_or_remove(BufWriter::new(file), path, format, samples)?;

    log::info!(
        "Saved WAV {:?} ({} samples, {} Hz, {} ch)",
        path,
        samples.len(),
        format.sample_rate,
        format.channels
    );
    Ok(())
}

/// Encode into the sink opened for `path`, deleting `path` if encoding fails.
fn encode_or_remove<S: Write + Seek>(
    sink: S,
    path: &Path,
    format: AudioFormat,
    samples: &[f32],
) -> Result<(), WavError> {
    // The sink is dropped by `encode` before the file is removed
    if let Err(e) = encode(sink, format, samples) {
        log::error!("Failed to write WAV {:?}: {}", path, e);
        if let Err(remove_err) = fs::remove_file(path) {
            log::warn!("Could not remove partial WAV {:?}: {}", path, remove_err);
        }
        return Err(e);
    }
    Ok(())
}
