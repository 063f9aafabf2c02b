//! Relay loop: captured batches in, fixed-duration segments out

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::segment::AudioSegment;
use super::RelayError;
use crate::wav::AudioFormat;

/// Configuration for the segment relay
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Capture sample rate (8kHz for voice chat)
    pub sample_rate: u32,
    pub channels: u16,
    /// Length of each relayed segment in seconds
    pub segment_secs: f32,
    /// Audio captured beyond this many seconds is dropped
    pub max_length_secs: u32,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            sample_rate: 8000,
            channels: 1,
            segment_secs: 2.0,
            max_length_secs: 3600,
        }
    }
}

impl RelayConfig {
    pub fn format(&self) -> AudioFormat {
        AudioFormat::new(self.sample_rate, self.channels)
    }

    /// Interleaved samples per full segment
    pub fn samples_per_segment(&self) -> usize {
        let frames = (self.segment_secs * self.sample_rate as f32) as usize;
        frames * self.channels as usize
    }

    /// Interleaved samples accepted over the whole session
    pub fn max_samples(&self) -> usize {
        self.max_length_secs as usize * self.sample_rate as usize * self.channels as usize
    }

    pub fn validate(&self) -> Result<(), RelayError> {
        self.format()
            .validate()
            .map_err(|e| RelayError::InvalidConfig(e.to_string()))?;
        if self.samples_per_segment() == 0 {
            return Err(RelayError::InvalidConfig(format!(
                "segment of {}s holds no samples at {} Hz",
                self.segment_secs, self.sample_rate
            )));
        }
        Ok(())
    }
}

/// Cuts a stream of captured sample batches into segments
pub struct SegmentRelay {
    config: RelayConfig,
    rx: mpsc::Receiver<Vec<f32>>,
    tx: mpsc::Sender<AudioSegment>,
    /// Accumulator for the segment being filled
    buffer: Vec<f32>,
    samples_per_segment: usize,
    /// Samples accepted so far (bounded by max length)
    captured: usize,
    max_samples: usize,
    segments_sent: u64,
}

impl SegmentRelay {
    pub fn new(
        rx: mpsc::Receiver<Vec<f32>>,
        tx: mpsc::Sender<AudioSegment>,
        config: RelayConfig,
    ) -> Result<Self, RelayError> {
        config.validate()?;

        let samples_per_segment = config.samples_per_segment();
        let max_samples = config.max_samples();
        log::info!(
            "SegmentRelay: initialized ({}Hz, {}ch, {}s segments = {} samples)",
            config.sample_rate,
            config.channels,
            config.segment_secs,
            samples_per_segment
        );

        Ok(Self {
            config,
            rx,
            tx,
            buffer: Vec::with_capacity(samples_per_segment),
            samples_per_segment,
            captured: 0,
            max_samples,
            segments_sent: 0,
        })
    }

    /// Run until the capture channel closes or the receiver goes away
    ///
    /// Returns the number of segments sent, including the final partial one.
    pub async fn run(mut self) -> Result<u64, RelayError> {
        log::info!("SegmentRelay: starting relay loop");

        while let Some(samples) = self.rx.recv().await {
            self.process_samples(samples).await?;
        }

        // Capture stopped; send what is left, in whole frames
        let channels = self.config.channels as usize;
        let stray = self.buffer.len() % channels;
        if stray > 0 {
            log::warn!(
                "SegmentRelay: dropping {} samples of an incomplete trailing frame",
                stray
            );
            self.buffer.truncate(self.buffer.len() - stray);
        }

        if !self.buffer.is_empty() {
            log::debug!(
                "SegmentRelay: sending final partial segment ({} samples)",
                self.buffer.len()
            );
            self.send_segment().await?;
        }

        log::info!(
            "SegmentRelay: relay complete, {} segments sent",
            self.segments_sent
        );

        Ok(self.segments_sent)
    }

    async fn process_samples(&mut self, samples: Vec<f32>) -> Result<(), RelayError> {
        let room = self.max_samples - self.captured;
        let accepted = samples.len().min(room);
        if accepted < samples.len() {
            log::warn!(
                "SegmentRelay: max length {}s reached, dropping {} samples",
                self.config.max_length_secs,
                samples.len() - accepted
            );
        }

        self.buffer.extend_from_slice(&samples[..accepted]);
        self.captured += accepted;

        while self.buffer.len() >= self.samples_per_segment {
            self.send_segment().await?;
        }

        Ok(())
    }

    async fn send_segment(&mut self) -> Result<(), RelayError> {
        // Full segment, or everything left for the final partial one
        let segment_size = self.buffer.len().min(self.samples_per_segment);
        let samples: Vec<f32> = self.buffer.drain(..segment_size).collect();

        let segment = AudioSegment::new(self.segments_sent, samples, self.config.format());
        log::debug!(
            "SegmentRelay: sending segment {} ({} ms)",
            segment.sequence,
            segment.duration_ms()
        );

        self.tx
            .send(segment)
            .await
            .map_err(|_| RelayError::ReceiverClosed)?;

        self.segments_sent += 1;
        Ok(())
    }
}

/// Join handle of a spawned relay task
pub type RelayHandle = JoinHandle<Result<u64, RelayError>>;

/// Spawn a relay on the current tokio runtime
///
/// Returns the sender for captured batches, the receiver for segments, and
/// the task handle. Dropping the sender ends the relay.
pub fn spawn_relay(
    config: RelayConfig,
    channel_capacity: usize,
) -> Result<(mpsc::Sender<Vec<f32>>, mpsc::Receiver<AudioSegment>, RelayHandle), RelayError> {
    let (sample_tx, sample_rx) = mpsc::channel(channel_capacity.max(1));
    let (segment_tx, segment_rx) = mpsc::channel(channel_capacity.max(1));

    let relay = SegmentRelay::new(sample_rx, segment_tx, config)?;
    let handle = tokio::spawn(relay.run());

    Ok((sample_tx, segment_rx, handle))
}
