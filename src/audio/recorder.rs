//! Fixed-length clip recorder
//!
//! The AudioRecorder collects samples handed to it by a capture callback into
//! an [`AudioClip`] and writes the clip to a WAV file when recording stops.
//! Recording stops on request or automatically once the clip reaches its
//! maximum length.

use std::path::PathBuf;
use std::time::Instant;

use thiserror::Error;
use uuid::Uuid;

use super::clip::{select_device, AudioClip};
use super::paths::{default_audio_dir, generate_wav_path};
use crate::wav::{save_wav, AudioFormat, WavError};

/// Errors that can occur during audio recording.
#[derive(Debug, Error)]
pub enum RecorderError {
    #[error("No audio input device found")]
    NoInputDevice,
    #[error("A recording is already in progress")]
    AlreadyRecording,
    #[error("No recording in progress")]
    NotRecording,
    #[error("Unsupported capture format: {0}")]
    UnsupportedFormat(WavError),
    #[error("Failed to save WAV file: {0}")]
    SaveFailed(#[from] WavError),
}

/// Recorder configuration.
#[derive(Debug, Clone)]
pub struct RecorderConfig {
    /// Directory that finished recordings are written to
    pub save_dir: PathBuf,
    /// Recording stops automatically after this many seconds
    pub max_length_secs: u32,
    pub sample_rate: u32,
    pub channels: u16,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            save_dir: default_audio_dir(),
            max_length_secs: 5,
            sample_rate: 44100,
            channels: 1,
        }
    }
}

impl RecorderConfig {
    pub fn format(&self) -> AudioFormat {
        AudioFormat::new(self.sample_rate, self.channels)
    }
}

/// Outcome of [`AudioRecorder::toggle`].
#[derive(Debug)]
pub enum Toggled {
    Started(Uuid),
    Saved(PathBuf),
}

struct ActiveRecording {
    id: Uuid,
    clip: AudioClip,
    started_at: Instant,
}

/// Recorder bound to one capture device.
///
/// Thread-safety: not internally synchronized. Wrap in `Arc<Mutex<>>` if the
/// capture callback runs on another thread.
pub struct AudioRecorder {
    device: String,
    config: RecorderConfig,
    active: Option<ActiveRecording>,
}

impl AudioRecorder {
    /// Create a recorder using the first of the reported input devices.
    pub fn new(config: RecorderConfig, devices: &[String]) -> Result<Self, RecorderError> {
        let device = select_device(devices)
            .ok_or(RecorderError::NoInputDevice)?
            .to_string();

        config
            .format()
            .validate()
            .map_err(RecorderError::UnsupportedFormat)?;

        log::info!("Using audio input device: {:?}", device);
        log::info!(
            "Audio config: {} Hz, {} channels, max {}s",
            config.sample_rate,
            config.channels,
            config.max_length_secs
        );

        Ok(Self {
            device,
            config,
            active: None,
        })
    }

    pub fn device_name(&self) -> &str {
        &self.device
    }

    pub fn config(&self) -> &RecorderConfig {
        &self.config
    }

    pub fn is_recording(&self) -> bool {
        self.active.is_some()
    }

    /// Seconds of audio captured by the current recording.
    pub fn elapsed_secs(&self) -> f32 {
        self.active
            .as_ref()
            .map(|a| a.clip.duration_secs())
            .unwrap_or(0.0)
    }

    /// Start a new recording.
    pub fn start(&mut self) -> Result<Uuid, RecorderError> {
        if self.active.is_some() {
            return Err(RecorderError::AlreadyRecording);
        }

        let id = Uuid::new_v4();
        self.active = Some(ActiveRecording {
            id,
            clip: AudioClip::new(self.config.format(), self.config.max_length_secs),
            started_at: Instant::now(),
        });

        log::info!("Recording started: {}", id);
        Ok(id)
    }

    /// Feed captured samples into the current recording.
    ///
    /// Once the clip reaches the maximum length the recording is stopped and
    /// saved, and the saved path is returned. Samples arriving while idle are
    /// ignored.
    pub fn push_samples(&mut self, samples: &[f32]) -> Result<Option<PathBuf>, RecorderError> {
        let Some(active) = self.active.as_mut() else {
            return Ok(None);
        };

        active.clip.push(samples);
        log::trace!("Recording length: {:.2}s", active.clip.duration_secs());

        if active.clip.is_full() {
            log::info!(
                "Recording reached max length ({}s), stopping",
                self.config.max_length_secs
            );
            return self.stop().map(Some);
        }

        Ok(None)
    }

    /// Stop recording and write the WAV file.
    ///
    /// The recorder is idle again when this returns, whether or not the file
    /// could be written.
    pub fn stop(&mut self) -> Result<PathBuf, RecorderError> {
        let active = self.active.take().ok_or(RecorderError::NotRecording)?;

        let wav_path = generate_wav_path(&self.config.save_dir, active.id);
        log::info!(
            "Recording stopped after {:?} ({:.2}s captured)",
            active.started_at.elapsed(),
            active.clip.duration_secs()
        );

        let samples = active.clip.whole_frames();
        if samples.len() < active.clip.len() {
            log::warn!(
                "Dropping {} samples of an incomplete trailing frame",
                active.clip.len() - samples.len()
            );
        }

        if let Err(e) = save_wav(&wav_path, active.clip.format(), samples) {
            log::error!("Recording {} could not be saved: {}", active.id, e);
            return Err(e.into());
        }

        Ok(wav_path)
    }

    /// Start when idle, stop and save when recording.
    pub fn toggle(&mut self) -> Result<Toggled, RecorderError> {
        if self.is_recording() {
            self.stop().map(Toggled::Saved)
        } else {
            self.start().map(Toggled::Started)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wav::{WavHeader, HEADER_LEN};

    fn test_recorder(dir: &std::path::Path, max_length_secs: u32) -> AudioRecorder {
        let config = RecorderConfig {
            save_dir: dir.to_path_buf(),
            max_length_secs,
            sample_rate: 100,
            channels: 1,
        };
        AudioRecorder::new(config, &["Mic".to_string()]).unwrap()
    }

    #[test]
    fn test_requires_device() {
        let result = AudioRecorder::new(RecorderConfig::default(), &[]);
        assert!(matches!(result, Err(RecorderError::NoInputDevice)));
    }

    #[test]
    fn test_rejects_invalid_format() {
        let config = RecorderConfig {
            sample_rate: 0,
            ..Default::default()
        };
        let result = AudioRecorder::new(config, &["Mic".to_string()]);
        assert!(matches!(result, Err(RecorderError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_start_stop_writes_wav() {
        let dir = tempfile::tempdir().unwrap();
        let mut recorder = test_recorder(dir.path(), 5);
        assert_eq!(recorder.device_name(), "Mic");

        recorder.start().unwrap();
        assert!(recorder.is_recording());
        assert!(matches!(
            recorder.start(),
            Err(RecorderError::AlreadyRecording)
        ));

        assert!(recorder.push_samples(&[0.5; 50]).unwrap().is_none());
        assert_eq!(recorder.elapsed_secs(), 0.5);

        let path = recorder.stop().unwrap();
        assert!(!recorder.is_recording());

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(bytes.len(), HEADER_LEN + 100);
        let header = WavHeader::parse(&bytes).unwrap();
        assert_eq!(header.sample_rate, 100);
        assert_eq!(header.data_size, 100);
    }

    #[test]
    fn test_auto_stop_at_max_length() {
        let dir = tempfile::tempdir().unwrap();
        let mut recorder = test_recorder(dir.path(), 1);
        recorder.start().unwrap();

        assert!(recorder.push_samples(&[0.1; 60]).unwrap().is_none());
        let saved = recorder.push_samples(&[0.1; 60]).unwrap();
        let path = saved.expect("recording should stop at max length");

        assert!(!recorder.is_recording());
        // Capped at one second of audio
        assert_eq!(std::fs::metadata(path).unwrap().len(), (HEADER_LEN + 200) as u64);
    }

    #[test]
    fn test_idle_ignores_samples_and_stop() {
        let dir = tempfile::tempdir().unwrap();
        let mut recorder = test_recorder(dir.path(), 1);

        assert!(recorder.push_samples(&[0.1; 10]).unwrap().is_none());
        assert!(matches!(recorder.stop(), Err(RecorderError::NotRecording)));
    }

    #[test]
    fn test_toggle() {
        let dir = tempfile::tempdir().unwrap();
        let mut recorder = test_recorder(dir.path(), 1);

        assert!(matches!(recorder.toggle().unwrap(), Toggled::Started(_)));
        recorder.push_samples(&[0.0; 10]).unwrap();
        match recorder.toggle().unwrap() {
            Toggled::Saved(path) => assert!(path.exists()),
            other => panic!("expected Saved, got {:?}", other),
        }
    }

    #[test]
    fn test_stereo_odd_batch_saves_whole_frames() {
        let dir = tempfile::tempdir().unwrap();
        let config = RecorderConfig {
            save_dir: dir.path().to_path_buf(),
            max_length_secs: 1,
            sample_rate: 100,
            channels: 2,
        };
        let mut recorder = AudioRecorder::new(config, &["Mic".to_string()]).unwrap();
        recorder.start().unwrap();

        // 41 samples = 20 stereo frames plus one stray sample
        recorder.push_samples(&[0.1; 41]).unwrap();
        let path = recorder.stop().unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(bytes.len(), HEADER_LEN + 80);
        let header = WavHeader::parse(&bytes).unwrap();
        assert_eq!(header.channels, 2);
        assert_eq!(header.frames(), 20);
    }

    #[test]
    fn test_failed_save_still_resets_state() {
        let dir = tempfile::tempdir().unwrap();
        // A plain file where the save directory should be
        let blocker = dir.path().join("blocked");
        std::fs::write(&blocker, b"x").unwrap();

        let mut recorder = test_recorder(&blocker, 1);
        recorder.start().unwrap();
        recorder.push_samples(&[0.0; 10]).unwrap();

        assert!(matches!(recorder.stop(), Err(RecorderError::SaveFailed(_))));
        assert!(!recorder.is_recording());
    }
}
