//! Playback error types.

use thiserror::Error;

pub type PlaybackResult<T> = Result<T, PlaybackError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlaybackError {
    #[error("Invalid seek position: {0}")]
    InvalidPosition(f64),

    #[error("Invalid volume: {0}")]
    InvalidVolume(f64),

    #[error("Invalid media duration: {0}")]
    InvalidDuration(f64),
}
