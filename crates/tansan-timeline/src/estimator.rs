//! Track duration estimation for generated voiceovers.
//!
//! The timeline only needs a width in percent. How that width is derived is
//! behind [`DurationEstimator`] so a measured duration can replace the
//! script-length heuristic without touching the timeline.

/// Narrowest track an estimator will produce.
pub const MIN_TRACK_DURATION_PCT: f64 = 1.0;
/// Widest track an estimator will produce.
pub const MAX_ESTIMATED_DURATION_PCT: f64 = 100.0;
/// Script characters per percent of timeline width.
pub const DEFAULT_CHARS_PER_PCT: f64 = 15.0;
/// Seconds covered by the full timeline width.
pub const DEFAULT_TIMELINE_SPAN_SECS: f64 = 100.0;

/// Maps a generated voiceover to a track width in percent.
pub trait DurationEstimator: Send + Sync {
    /// Width for a voiceover rendered from `script`.
    ///
    /// `measured_secs` is the backend's measured duration, when known.
    fn estimate_pct(&self, script: &str, measured_secs: Option<f64>) -> f64;
}

/// Clamp an estimated width into `[MIN_TRACK_DURATION_PCT, MAX_ESTIMATED_DURATION_PCT]`.
/// Non-finite widths become the minimum.
pub fn clamp_track_width(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(MIN_TRACK_DURATION_PCT, MAX_ESTIMATED_DURATION_PCT)
    } else {
        MIN_TRACK_DURATION_PCT
    }
}

/// Proportional mapping: `min(100, characters / chars_per_pct)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharacterRateEstimator {
    pub chars_per_pct: f64,
}

impl CharacterRateEstimator {
    /// Non-positive rates fall back to [`DEFAULT_CHARS_PER_PCT`].
    pub fn new(chars_per_pct: f64) -> Self {
        let chars_per_pct = if chars_per_pct.is_finite() && chars_per_pct > 0.0 {
            chars_per_pct
        } else {
            DEFAULT_CHARS_PER_PCT
        };
        Self { chars_per_pct }
    }
}

impl Default for CharacterRateEstimator {
    fn default() -> Self {
        Self::new(DEFAULT_CHARS_PER_PCT)
    }
}

impl DurationEstimator for CharacterRateEstimator {
    fn estimate_pct(&self, script: &str, _measured_secs: Option<f64>) -> f64 {
        let chars = script.chars().count() as f64;
        clamp_track_width(chars / self.chars_per_pct)
    }
}

/// Uses the measured duration against a fixed timeline span, falling back to
/// the character rate when the backend did not measure anything.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasuredDurationEstimator {
    pub timeline_span_secs: f64,
    pub fallback: CharacterRateEstimator,
}

impl MeasuredDurationEstimator {
    pub fn new(timeline_span_secs: f64, fallback: CharacterRateEstimator) -> Self {
        let timeline_span_secs = if timeline_span_secs.is_finite() && timeline_span_secs > 0.0 {
            timeline_span_secs
        } else {
            DEFAULT_TIMELINE_SPAN_SECS
        };
        Self {
            timeline_span_secs,
            fallback,
        }
    }
}

impl Default for MeasuredDurationEstimator {
    fn default() -> Self {
        Self::new(DEFAULT_TIMELINE_SPAN_SECS, CharacterRateEstimator::default())
    }
}

impl DurationEstimator for MeasuredDurationEstimator {
    fn estimate_pct(&self, script: &str, measured_secs: Option<f64>) -> f64 {
        match measured_secs {
            Some(secs) if secs.is_finite() && secs > 0.0 => {
                clamp_track_width(secs * 100.0 / self.timeline_span_secs)
            }
            _ => self.fallback.estimate_pct(script, None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_character_rate_mapping() {
        let estimator = CharacterRateEstimator::default();
        let script = "x".repeat(300);
        assert_eq!(estimator.estimate_pct(&script, None), 20.0);
    }

    #[test]
    fn test_character_rate_clamps() {
        let estimator = CharacterRateEstimator::default();
        assert_eq!(estimator.estimate_pct(&"x".repeat(5000), None), 100.0);
        assert_eq!(estimator.estimate_pct("", None), MIN_TRACK_DURATION_PCT);
        assert_eq!(estimator.estimate_pct("hi", None), MIN_TRACK_DURATION_PCT);
    }

    #[test]
    fn test_character_rate_counts_chars_not_bytes() {
        let estimator = CharacterRateEstimator::new(1.0);
        assert_eq!(estimator.estimate_pct("ééé", None), 3.0);
    }

    #[test]
    fn test_invalid_rate_uses_default() {
        assert_eq!(CharacterRateEstimator::new(0.0).chars_per_pct, DEFAULT_CHARS_PER_PCT);
        assert_eq!(CharacterRateEstimator::new(f64::NAN).chars_per_pct, DEFAULT_CHARS_PER_PCT);
    }

    #[test]
    fn test_measured_duration_preferred() {
        let estimator = MeasuredDurationEstimator::default();
        assert_eq!(estimator.estimate_pct("ignored", Some(30.0)), 30.0);
        assert_eq!(estimator.estimate_pct(&"x".repeat(150), None), 10.0);
        assert_eq!(estimator.estimate_pct(&"x".repeat(150), Some(f64::NAN)), 10.0);
        assert_eq!(estimator.estimate_pct("", Some(500.0)), 100.0);
    }
}
