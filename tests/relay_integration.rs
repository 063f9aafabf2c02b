//! Integration tests for the recorder and segment relay
//!
//! ```bash
//! cargo test --test relay_integration
//! ```

use std::fs;

use micclip::audio::{sine_wave, AudioRecorder, RecorderConfig};
use micclip::commands::{record_samples, relay_to_dir};
use micclip::relay::RelayConfig;
use micclip::wav::WavHeader;
use tempfile::tempdir;

#[tokio::test]
async fn relay_writes_one_file_per_segment() {
    let dir = tempdir().unwrap();
    let config = RelayConfig {
        sample_rate: 1000,
        channels: 1,
        segment_secs: 0.5,
        max_length_secs: 60,
    };

    // 1.2s of audio: two full 0.5s segments plus a 0.2s remainder
    let source = sine_wave(220.0, 1.2, 1000, 0.5);
    let saved = relay_to_dir(config, source, dir.path(), None).await.unwrap();

    assert_eq!(saved.len(), 3);
    let sizes: Vec<u32> = saved
        .iter()
        .map(|p| WavHeader::parse(&fs::read(p).unwrap()).unwrap().data_size)
        .collect();
    assert_eq!(sizes, vec![1000, 1000, 400]);

    for path in &saved {
        let reader = hound::WavReader::open(path).unwrap();
        assert_eq!(reader.spec().sample_rate, 1000);
        assert_eq!(reader.spec().channels, 1);
    }
}

#[tokio::test]
async fn relay_with_no_audio_writes_nothing() {
    let dir = tempdir().unwrap();
    let saved = relay_to_dir(RelayConfig::default(), Vec::new(), dir.path(), None)
        .await
        .unwrap();
    assert!(saved.is_empty());
}

#[test]
fn recorder_saves_clip_readable_by_hound() {
    let dir = tempdir().unwrap();
    let config = RecorderConfig {
        save_dir: dir.path().to_path_buf(),
        max_length_secs: 5,
        sample_rate: 8000,
        channels: 1,
    };
    let mut recorder = AudioRecorder::new(config, &["Mic".to_string()]).unwrap();

    // Shorter than the max length, so the recording is stopped explicitly
    let path = record_samples(&mut recorder, &sine_wave(440.0, 0.25, 8000, 0.5)).unwrap();

    let reader = hound::WavReader::open(&path).unwrap();
    assert_eq!(reader.spec().sample_rate, 8000);
    assert_eq!(reader.duration(), 2000);
}
