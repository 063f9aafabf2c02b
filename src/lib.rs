//! micclip: microphone clip recording, segment relay and PCM WAV encoding.
//!
//! - [`wav`]: byte-exact 16-bit PCM RIFF/WAVE encoder
//! - [`audio`]: fixed-length recorder fed by a capture callback
//! - [`relay`]: cuts a live sample stream into fixed-duration segments
//! - [`settings`]: persisted configuration
//! - [`commands`]: entry points used by the `micclip` binary

pub mod audio;
pub mod commands;
pub mod relay;
pub mod settings;
pub mod wav;
