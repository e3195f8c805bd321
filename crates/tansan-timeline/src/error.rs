//! Timeline error types.

use thiserror::Error;

pub type TimelineResult<T> = Result<T, TimelineError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TimelineError {
    #[error("Invalid offset {0}: must be a finite value >= 0")]
    InvalidOffset(f64),

    #[error("Invalid duration {0}: must be a finite value > 0")]
    InvalidDuration(f64),
}

impl TimelineError {
    /// Check an offset against the placement rules.
    pub fn check_offset(offset_pct: f64) -> TimelineResult<f64> {
        if offset_pct.is_finite() && offset_pct >= 0.0 {
            Ok(offset_pct)
        } else {
            Err(Self::InvalidOffset(offset_pct))
        }
    }

    /// Check a duration against the placement rules.
    pub fn check_duration(duration_pct: f64) -> TimelineResult<f64> {
        if duration_pct.is_finite() && duration_pct > 0.0 {
            Ok(duration_pct)
        } else {
            Err(Self::InvalidDuration(duration_pct))
        }
    }
}
