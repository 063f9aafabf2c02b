use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::audio::{default_audio_dir, RecorderConfig};
use crate::relay::RelayConfig;

const SETTINGS_FILE_NAME: &str = "settings.json";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Could not determine config directory")]
    NoConfigDir,
    #[error("Settings io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialize settings: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Where recordings are written. Defaults to the XDG data dir.
    pub save_dir: Option<PathBuf>,

    /// Recordings stop automatically after this many seconds.
    pub record_max_secs: u32,
    pub record_sample_rate: u32,
    pub record_channels: u16,

    /// Only the newest N recordings are kept in `save_dir`.
    pub keep_recordings: usize,

    /// Capture rate for the chat relay.
    pub chat_sample_rate: u32,
    /// Duration of each relayed chat segment.
    pub chat_segment_secs: f32,
    pub chat_max_secs: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            save_dir: None,
            record_max_secs: 5,
            record_sample_rate: 44100,
            record_channels: 1,
            keep_recordings: 20,
            chat_sample_rate: 8000,
            chat_segment_secs: 2.0,
            chat_max_secs: 3600,
        }
    }
}

impl Settings {
    pub fn save_dir(&self) -> PathBuf {
        self.save_dir.clone().unwrap_or_else(default_audio_dir)
    }

    pub fn recorder_config(&self) -> RecorderConfig {
        RecorderConfig {
            save_dir: self.save_dir(),
            max_length_secs: self.record_max_secs,
            sample_rate: self.record_sample_rate,
            channels: self.record_channels,
        }
    }

    pub fn relay_config(&self) -> RelayConfig {
        RelayConfig {
            sample_rate: self.chat_sample_rate,
            channels: 1,
            segment_secs: self.chat_segment_secs,
            max_length_secs: self.chat_max_secs,
        }
    }
}

/// Default settings location: ~/.config/micclip/settings.json
pub fn settings_path() -> Result<PathBuf, SettingsError> {
    let dir = dirs::config_dir().ok_or(SettingsError::NoConfigDir)?;
    Ok(dir.join("micclip").join(SETTINGS_FILE_NAME))
}

pub fn load_settings(path: &Path) -> Settings {
    match std::fs::read_to_string(path) {
        Ok(contents) => match serde_json::from_str::<Settings>(&contents) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Settings: failed to parse {:?}: {}", path, e);
                Settings::default()
            }
        },
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Settings::default(),
        Err(e) => {
            log::warn!("Settings: failed to read {:?}: {}", path, e);
            Settings::default()
        }
    }
}

pub fn save_settings(path: &Path, settings: &Settings) -> Result<(), SettingsError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let contents = serde_json::to_string_pretty(settings)?;

    // Write to a sibling temp file, then rename over the target
    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, &contents)?;

    // Windows rename fails if the destination exists
    if cfg!(windows) && path.exists() {
        if let Err(e) = std::fs::remove_file(path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                return Err(e.into());
            }
        }
    }

    std::fs::rename(&tmp_path, path)?;
    Ok(())
}
