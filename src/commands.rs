//! Entry points for the `micclip` binary
//!
//! Capture is simulated with a sine tone fed in 100ms batches, the way a
//! device callback would deliver it.

use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;
use uuid::Uuid;

use crate::audio::{cleanup_old_recordings, sine_wave, AudioRecorder, RecorderError};
use crate::relay::{spawn_relay, RelayConfig, RelayError};
use crate::settings::{load_settings, settings_path, Settings, SettingsError};
use crate::wav::{save_wav, AudioFormat, WavError};

/// Capture callback batch length
const BATCH_MS: u64 = 100;

const TONE_AMPLITUDE: f32 = 0.8;

const SYNTHETIC_DEVICE: &str = "synthetic tone";

#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Wav(#[from] WavError),
    #[error(transparent)]
    Recorder(#[from] RecorderError),
    #[error(transparent)]
    Relay(#[from] RelayError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Load settings from `config`, or from the default location.
pub fn load(config: Option<&Path>) -> Result<Settings, CommandError> {
    let path = match config {
        Some(path) => path.to_path_buf(),
        None => settings_path()?,
    };
    log::debug!("Loading settings from {:?}", path);
    Ok(load_settings(&path))
}

/// Write a mono sine tone to `out`.
pub fn tone(out: &Path, freq: f32, secs: f32, rate: u32) -> Result<(), CommandError> {
    let samples = sine_wave(freq, secs, rate, TONE_AMPLITUDE);
    save_wav(out, AudioFormat::mono(rate), &samples)?;
    Ok(())
}

/// Duplicate a mono signal across `channels` interleaved channels.
pub fn to_channels(mono: &[f32], channels: u16) -> Vec<f32> {
    mono.iter()
        .flat_map(|&s| std::iter::repeat(s).take(channels as usize))
        .collect()
}

fn batch_len(format: AudioFormat) -> usize {
    let frames = format.sample_rate as u64 * BATCH_MS / 1000;
    (frames as usize * format.channels as usize).max(1)
}

/// Record up to `secs` seconds of tone and print the saved path.
pub fn record(settings: &Settings, secs: f32, freq: f32) -> Result<(), CommandError> {
    let config = settings.recorder_config();
    let format = config.format();
    let save_dir = config.save_dir.clone();

    let mut recorder = AudioRecorder::new(config, &[SYNTHETIC_DEVICE.to_string()])?;
    let path = record_samples(
        &mut recorder,
        &to_channels(&sine_wave(freq, secs, format.sample_rate, TONE_AMPLITUDE), format.channels),
    )?;
    println!("{}", path.display());

    let removed = cleanup_old_recordings(&save_dir, settings.keep_recordings)?;
    if removed > 0 {
        log::info!("Removed {} old recordings", removed);
    }
    Ok(())
}

/// Run one recording over `source`, stopping early if the clip fills up.
pub fn record_samples(
    recorder: &mut AudioRecorder,
    source: &[f32],
) -> Result<PathBuf, CommandError> {
    let batch = batch_len(recorder.config().format());
    recorder.start()?;

    for chunk in source.chunks(batch) {
        if let Some(path) = recorder.push_samples(chunk)? {
            return Ok(path);
        }
    }

    Ok(recorder.stop()?)
}

/// Relay `secs` seconds of tone and save every received segment.
pub fn chat(settings: &Settings, secs: f32, out_dir: Option<PathBuf>) -> Result<(), CommandError> {
    let out_dir = out_dir.unwrap_or_else(|| settings.save_dir().join("chat"));
    let config = settings.relay_config();
    let source = sine_wave(440.0, secs, config.sample_rate, TONE_AMPLITUDE);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let saved = runtime.block_on(relay_to_dir(
        config,
        source,
        &out_dir,
        Some(Duration::from_millis(BATCH_MS)),
    ))?;

    for path in &saved {
        println!("{}", path.display());
    }
    Ok(())
}

/// Push `source` through a segment relay and write each segment to `out_dir`.
///
/// With `pace` set, batches are released at that interval to mimic a live
/// capture device.
pub async fn relay_to_dir(
    config: RelayConfig,
    source: Vec<f32>,
    out_dir: &Path,
    pace: Option<Duration>,
) -> Result<Vec<PathBuf>, CommandError> {
    let session_id = Uuid::new_v4();
    let batch = batch_len(config.format());
    let (tx, mut rx, handle) = spawn_relay(config, 16)?;

    let producer = tokio::spawn(async move {
        for chunk in source.chunks(batch) {
            if tx.send(chunk.to_vec()).await.is_err() {
                log::warn!("Relay stopped accepting audio");
                break;
            }
            if let Some(interval) = pace {
                tokio::time::sleep(interval).await;
            }
        }
    });

    let mut saved = Vec::new();
    while let Some(segment) = rx.recv().await {
        let path = out_dir.join(format!("{}_{:04}.wav", session_id, segment.sequence));
        save_wav(&path, segment.format, &segment.samples)?;
        log::info!(
            "Received segment {} ({} ms)",
            segment.sequence,
            segment.duration_ms()
        );
        saved.push(path);
    }

    producer.await?;
    let sent = handle.await??;
    log::info!("Chat finished: {} segments relayed", sent);

    Ok(saved)
}
