//! Captured audio clip
//!
//! A fixed-capacity buffer of interleaved normalized samples that capture
//! callbacks append to. Mirrors a microphone clip opened for a maximum
//! length: once full, further samples are refused.

use crate::relay::slice_segment;
use crate::wav::AudioFormat;

/// Pick the capture device to use: the first one reported, if any.
pub fn select_device(devices: &[String]) -> Option<&str> {
    devices.first().map(|d| d.as_str())
}

/// Growing sample buffer bounded by a maximum duration.
#[derive(Debug, Clone)]
pub struct AudioClip {
    format: AudioFormat,
    samples: Vec<f32>,
    capacity: usize,
}

impl AudioClip {
    /// Create an empty clip able to hold `max_secs` seconds of `format`.
    pub fn new(format: AudioFormat, max_secs: u32) -> Self {
        let capacity =
            max_secs as usize * format.sample_rate as usize * format.channels as usize;
        Self {
            format,
            samples: Vec::with_capacity(capacity.min(1 << 20)),
            capacity,
        }
    }

    /// Append captured samples, returning how many fit.
    pub fn push(&mut self, samples: &[f32]) -> usize {
        let room = self.capacity - self.samples.len();
        let accepted = samples.len().min(room);
        self.samples.extend_from_slice(&samples[..accepted]);
        accepted
    }

    pub fn format(&self) -> AudioFormat {
        self.format
    }

    /// Frames captured so far.
    pub fn position(&self) -> usize {
        match self.format.channels {
            0 => 0,
            ch => self.samples.len() / ch as usize,
        }
    }

    /// Interleaved samples captured so far.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.samples.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn duration_secs(&self) -> f32 {
        self.format.duration_secs(self.position())
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Captured samples up to the last complete frame.
    pub fn whole_frames(&self) -> &[f32] {
        let end = self.position() * self.format.channels as usize;
        &self.samples[..end]
    }

    /// Copy up to `len` samples starting at `start`, clamped to what was captured.
    pub fn get_data(&self, start: usize, len: usize) -> Vec<f32> {
        slice_segment(&self.samples, start, len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_device() {
        let devices = vec!["Built-in Mic".to_string(), "USB Mic".to_string()];
        assert_eq!(select_device(&devices), Some("Built-in Mic"));
        assert_eq!(select_device(&[]), None);
    }

    #[test]
    fn test_push_until_full() {
        let mut clip = AudioClip::new(AudioFormat::mono(4), 2);
        assert_eq!(clip.capacity(), 8);

        assert_eq!(clip.push(&[0.1; 5]), 5);
        assert!(!clip.is_full());
        assert_eq!(clip.push(&[0.2; 5]), 3);
        assert!(clip.is_full());
        assert_eq!(clip.push(&[0.3; 2]), 0);
        assert_eq!(clip.len(), 8);
        assert_eq!(clip.duration_secs(), 2.0);
    }

    #[test]
    fn test_position_counts_frames() {
        let mut clip = AudioClip::new(AudioFormat::stereo(10), 1);
        clip.push(&[0.0; 6]);
        assert_eq!(clip.position(), 3);
        assert_eq!(clip.len(), 6);
    }

    #[test]
    fn test_whole_frames_drops_partial_frame() {
        let mut clip = AudioClip::new(AudioFormat::stereo(10), 1);
        clip.push(&[0.1, 0.2, 0.3]);
        assert_eq!(clip.len(), 3);
        assert_eq!(clip.whole_frames(), &[0.1, 0.2]);
    }

    #[test]
    fn test_get_data_clamps() {
        let mut clip = AudioClip::new(AudioFormat::mono(10), 1);
        clip.push(&[0.0, 0.1, 0.2, 0.3]);

        assert_eq!(clip.get_data(1, 2), vec![0.1, 0.2]);
        assert_eq!(clip.get_data(2, 100), vec![0.2, 0.3]);
        assert!(clip.get_data(4, 10).is_empty());
        assert!(clip.get_data(9, 10).is_empty());
    }
}
