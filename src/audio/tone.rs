//! Synthetic test signal used in place of a live microphone.

use std::f32::consts::TAU;

/// Generate `secs` seconds of a mono sine wave at `freq_hz`.
pub fn sine_wave(freq_hz: f32, secs: f32, sample_rate: u32, amplitude: f32) -> Vec<f32> {
    let count = (secs * sample_rate as f32).max(0.0) as usize;
    (0..count)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            amplitude * (TAU * freq_hz * t).sin()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sine_wave_length_and_range() {
        let wave = sine_wave(440.0, 0.5, 8000, 0.8);
        assert_eq!(wave.len(), 4000);
        assert_eq!(wave[0], 0.0);
        assert!(wave.iter().all(|s| s.abs() <= 0.8 + f32::EPSILON));
    }

    #[test]
    fn test_sine_wave_zero_duration() {
        assert!(sine_wave(440.0, 0.0, 8000, 1.0).is_empty());
    }
}
