//! Audio capture module for micclip
//!
//! This module handles buffering of captured microphone samples and writing
//! finished recordings to WAV files. Capture itself happens in the caller,
//! which pushes normalized samples into an [`AudioRecorder`].

mod clip;
mod paths;
pub mod recorder;
mod tone;

pub use clip::{select_device, AudioClip};
pub use paths::{cleanup_old_recordings, default_audio_dir, generate_wav_path};
pub use recorder::{AudioRecorder, RecorderConfig, RecorderError, Toggled};
pub use tone::sine_wave;
