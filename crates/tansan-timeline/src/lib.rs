//! Multi-track timeline for composing generated media.
//!
//! This crate provides:
//! - Ordered tracks with percentage offset/duration geometry
//! - Permissive placement (overlap and overflow past 100% are allowed)
//! - Pluggable duration estimation for generated voiceovers

pub mod error;
pub mod estimator;
pub mod timeline;

pub use error::{TimelineError, TimelineResult};
pub use estimator::{
    clamp_track_width, CharacterRateEstimator, DurationEstimator, MeasuredDurationEstimator,
    DEFAULT_CHARS_PER_PCT, DEFAULT_TIMELINE_SPAN_SECS, MAX_ESTIMATED_DURATION_PCT,
    MIN_TRACK_DURATION_PCT,
};
pub use timeline::{colors, Timeline};
