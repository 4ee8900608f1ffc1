//! Audio utilities for the notification cue.
//!
//! The cue is synthesized once per playback at the output device's native
//! sample rate and played through a `cpal` output stream. It focuses on:
//! - Building the fixed two-tone chime played for new notifications.
//! - Opening the default output device and playing the chime from its start.
//!
//! # Real-time constraints
//! Audio callbacks run on a real-time thread. The chime is rendered before the
//! stream is built, so the callback only copies samples.

pub mod cue;
pub mod player;

pub use crate::player::{CueError, CuePlayer, OutputCuePlayer};
