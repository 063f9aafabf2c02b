//! Path helpers for saved recordings
//!
//! Recordings are stored in: ~/.local/share/micclip/audio/ unless the
//! caller configures another directory.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use uuid::Uuid;

/// Default recordings directory.
/// Returns: ~/.local/share/micclip/audio/
pub fn default_audio_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("micclip")
        .join("audio")
}

/// Generate a unique WAV file path for a recording.
/// Format: <YYYYmmdd_HHMMSS>_<uuid>.wav
pub fn generate_wav_path(dir: &Path, recording_id: Uuid) -> PathBuf {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    dir.join(format!("{}_{}.wav", timestamp, recording_id))
}

/// Clean up old recordings, keeping only the most recent `keep` files.
pub fn cleanup_old_recordings(dir: &Path, keep: usize) -> std::io::Result<usize> {
    if !dir.exists() {
        return Ok(0);
    }

    let mut entries: Vec<_> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.path()
                .extension()
                .map(|ext| ext == "wav")
                .unwrap_or(false)
        })
        .collect();

    if entries.len() <= keep {
        return Ok(0);
    }

    // Oldest first; file names start with a timestamp so they break ties
    entries.sort_by(|a, b| {
        let time_a = a.metadata().and_then(|m| m.modified()).ok();
        let time_b = b.metadata().and_then(|m| m.modified()).ok();
        time_a.cmp(&time_b).then_with(|| a.file_name().cmp(&b.file_name()))
    });

    let to_delete = entries.len() - keep;
    let mut deleted = 0;

    for entry in entries.into_iter().take(to_delete) {
        if fs::remove_file(entry.path()).is_ok() {
            log::debug!("Cleaned up old recording: {:?}", entry.path());
            deleted += 1;
        }
    }

    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_wav_path() {
        let dir = PathBuf::from("/tmp/micclip-test");
        let id = Uuid::new_v4();
        let path = generate_wav_path(&dir, id);
        assert!(path.starts_with(&dir));
        assert!(path.to_string_lossy().contains(&id.to_string()));
        assert!(path.extension().map(|e| e == "wav").unwrap_or(false));
    }

    #[test]
    fn test_default_audio_dir_contains_expected_path() {
        let dir = default_audio_dir();
        let path_str = dir.to_string_lossy();
        assert!(path_str.contains("micclip"));
        assert!(path_str.ends_with("audio"));
    }

    #[test]
    fn test_cleanup_keeps_newest() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a.wav", "b.wav", "c.wav", "notes.txt"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }

        let deleted = cleanup_old_recordings(dir.path(), 2).unwrap();
        assert_eq!(deleted, 1);

        let wavs = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().map(|x| x == "wav").unwrap_or(false))
            .count();
        assert_eq!(wavs, 2);
        assert!(dir.path().join("notes.txt").exists());
    }

    #[test]
    fn test_cleanup_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert_eq!(cleanup_old_recordings(&missing, 1).unwrap(), 0);
    }
}
