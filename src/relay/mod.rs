//! Segment relay for chunked "realtime" audio hand-off
//!
//! Captured samples are cut into fixed-duration segments and handed to a
//! receiver as soon as each segment fills, so playback (or persistence) on
//! the receiving side can start while capture continues.
//!
//! # Architecture
//!
//! ```text
//! Capture callback (sync)            Tokio runtime (async)
//! ┌──────────────────┐              ┌────────────────────────┐
//! │ try_send(batch)  │──channel──▶  │ SegmentRelay::run()    │──channel──▶ receiver
//! └──────────────────┘              │   ├─ accumulate        │
//!                                   │   └─ cut 2s segments   │
//!                                   └────────────────────────┘
//! ```
//!
//! When the capture side closes its channel the remaining samples are sent
//! as a final, shorter segment.

mod segment;
mod segment_relay;

pub use segment::{slice_segment, AudioSegment};
pub use segment_relay::{spawn_relay, RelayConfig, RelayHandle, SegmentRelay};

use thiserror::Error;

/// Errors that can occur while relaying segments
#[derive(Debug, Error)]
pub enum RelayError {
    /// Relay configuration cannot produce segments
    #[error("Invalid relay configuration: {0}")]
    InvalidConfig(String),
    /// The segment receiver was dropped before the relay finished
    #[error("Segment receiver closed")]
    ReceiverClosed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relay_error_display() {
        let err = RelayError::InvalidConfig("sample rate must be > 0".to_string());
        assert!(err.to_string().contains("sample rate"));

        let err = RelayError::ReceiverClosed;
        assert!(err.to_string().contains("closed"));
    }
}
