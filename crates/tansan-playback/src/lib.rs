//! Playback transport state for generated artifacts.
//!
//! This crate provides:
//! - A play/pause/seek/volume/mute controller per artifact
//! - A coordinator with a configurable single-active-player policy

pub mod controller;
pub mod coordinator;
pub mod error;

pub use controller::{format_time, PlaybackController, DEFAULT_VOLUME};
pub use coordinator::{PlaybackCoordinator, PlaybackPolicy};
pub use error::{PlaybackError, PlaybackResult};
