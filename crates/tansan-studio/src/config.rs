//! Studio configuration.

use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use tansan_models::JobKind;
use tansan_playback::{PlaybackPolicy, DEFAULT_VOLUME};
use tansan_timeline::{DEFAULT_CHARS_PER_PCT, DEFAULT_TIMELINE_SPAN_SECS};

use crate::error::{StudioError, StudioResult};

/// Player length used when an artifact carries no measured duration.
pub const DEFAULT_FALLBACK_MEDIA_SECS: f64 = 30.0;

/// Simulated generation behavior for one job kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KindSettings {
    /// How long the simulated backend takes to answer
    pub latency: Duration,
    /// Probability in `[0, 1]` that a generation fails
    pub failure_rate: f64,
}

impl KindSettings {
    pub fn default_for(kind: JobKind) -> Self {
        let (latency_ms, failure_rate) = match kind {
            JobKind::Tts => (2500, 0.1),
            JobKind::Music => (5000, 0.0),
            JobKind::VoiceCover => (4000, 0.0),
            JobKind::SpeechToSpeech => (4000, 0.0),
            JobKind::VoiceCloneTraining => (2000, 0.0),
            JobKind::Voiceover => (2000, 0.0),
        };
        Self {
            latency: Duration::from_millis(latency_ms),
            failure_rate,
        }
    }
}

/// Session configuration.
#[derive(Debug, Clone)]
pub struct StudioConfig {
    kinds: HashMap<JobKind, KindSettings>,
    /// Script characters per percent of timeline width
    pub voiceover_chars_per_pct: f64,
    /// Seconds covered by the full timeline width
    pub timeline_span_secs: f64,
    /// Notifications buffered per subscriber before the oldest are dropped
    pub notification_capacity: usize,
    pub playback_policy: PlaybackPolicy,
    /// Volume new players start at
    pub default_volume: f64,
    /// Player length for artifacts whose backend reported no duration
    pub fallback_media_secs: f64,
    /// Seed for the simulated outcome draw; random when unset
    pub rng_seed: Option<u64>,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            kinds: JobKind::ALL
                .into_iter()
                .map(|kind| (kind, KindSettings::default_for(kind)))
                .collect(),
            voiceover_chars_per_pct: DEFAULT_CHARS_PER_PCT,
            timeline_span_secs: DEFAULT_TIMELINE_SPAN_SECS,
            notification_capacity: 64,
            playback_policy: PlaybackPolicy::Concurrent,
            default_volume: DEFAULT_VOLUME,
            fallback_media_secs: DEFAULT_FALLBACK_MEDIA_SECS,
            rng_seed: None,
        }
    }
}

impl StudioConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let kinds = JobKind::ALL
            .into_iter()
            .map(|kind| {
                let base = defaults.kind(kind);
                let prefix = format!("STUDIO_{}", kind.as_str().to_uppercase());
                let latency = env_parse::<u64>(&format!("{}_LATENCY_MS", prefix))
                    .map(Duration::from_millis)
                    .unwrap_or(base.latency);
                let failure_rate = env_parse::<f64>(&format!("{}_FAILURE_RATE", prefix))
                    .unwrap_or(base.failure_rate);
                (kind, KindSettings { latency, failure_rate: clamp_rate(failure_rate) })
            })
            .collect();

        Self {
            kinds,
            voiceover_chars_per_pct: env_parse("STUDIO_VOICEOVER_CHARS_PER_PCT")
                .unwrap_or(defaults.voiceover_chars_per_pct),
            timeline_span_secs: env_parse("STUDIO_TIMELINE_SPAN_SECS")
                .unwrap_or(defaults.timeline_span_secs),
            notification_capacity: env_parse("STUDIO_NOTIFICATION_CAPACITY")
                .unwrap_or(defaults.notification_capacity),
            playback_policy: match std::env::var("STUDIO_PLAYBACK_EXCLUSIVE") {
                Ok(v) if matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes") => {
                    PlaybackPolicy::Exclusive
                }
                _ => defaults.playback_policy,
            },
            default_volume: env_parse("STUDIO_DEFAULT_VOLUME").unwrap_or(defaults.default_volume),
            fallback_media_secs: env_parse("STUDIO_FALLBACK_MEDIA_SECS")
                .unwrap_or(defaults.fallback_media_secs),
            rng_seed: env_parse("STUDIO_RNG_SEED"),
        }
    }

    /// Settings for `kind`.
    pub fn kind(&self, kind: JobKind) -> KindSettings {
        self.kinds
            .get(&kind)
            .copied()
            .unwrap_or_else(|| KindSettings::default_for(kind))
    }

    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    pub fn with_playback_policy(mut self, policy: PlaybackPolicy) -> Self {
        self.playback_policy = policy;
        self
    }

    pub fn with_chars_per_pct(mut self, chars_per_pct: f64) -> Self {
        self.voiceover_chars_per_pct = chars_per_pct;
        self
    }

    pub fn set_latency(&mut self, kind: JobKind, latency: Duration) {
        self.kind_mut(kind).latency = latency;
    }

    /// Clamped to `[0, 1]`.
    pub fn set_failure_rate(&mut self, kind: JobKind, rate: f64) {
        self.kind_mut(kind).failure_rate = clamp_rate(rate);
    }

    /// Check values that would make a session unusable.
    pub fn validate(&self) -> StudioResult<()> {
        if self.notification_capacity == 0 {
            return Err(StudioError::config_error(
                "STUDIO_NOTIFICATION_CAPACITY must be at least 1",
            ));
        }
        if !(self.voiceover_chars_per_pct.is_finite() && self.voiceover_chars_per_pct > 0.0) {
            return Err(StudioError::config_error(format!(
                "STUDIO_VOICEOVER_CHARS_PER_PCT must be positive, got {}",
                self.voiceover_chars_per_pct
            )));
        }
        if !(self.timeline_span_secs.is_finite() && self.timeline_span_secs > 0.0) {
            return Err(StudioError::config_error(format!(
                "STUDIO_TIMELINE_SPAN_SECS must be positive, got {}",
                self.timeline_span_secs
            )));
        }
        if !(0.0..=1.0).contains(&self.default_volume) {
            return Err(StudioError::config_error(format!(
                "STUDIO_DEFAULT_VOLUME must be within [0, 1], got {}",
                self.default_volume
            )));
        }
        if !(self.fallback_media_secs.is_finite() && self.fallback_media_secs > 0.0) {
            return Err(StudioError::config_error(format!(
                "STUDIO_FALLBACK_MEDIA_SECS must be positive, got {}",
                self.fallback_media_secs
            )));
        }
        Ok(())
    }

    fn kind_mut(&mut self, kind: JobKind) -> &mut KindSettings {
        self.kinds
            .entry(kind)
            .or_insert_with(|| KindSettings::default_for(kind))
    }
}

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.trim().parse().ok())
}

fn clamp_rate(rate: f64) -> f64 {
    if rate.is_nan() {
        0.0
    } else {
        rate.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StudioConfig::default();
        assert_eq!(config.kind(JobKind::Tts).latency, Duration::from_millis(2500));
        assert_eq!(config.kind(JobKind::Tts).failure_rate, 0.1);
        assert_eq!(config.kind(JobKind::Music).latency, Duration::from_millis(5000));
        assert_eq!(config.kind(JobKind::Music).failure_rate, 0.0);
        assert_eq!(config.kind(JobKind::Voiceover).latency, Duration::from_millis(2000));
        assert_eq!(config.notification_capacity, 64);
        assert_eq!(config.fallback_media_secs, DEFAULT_FALLBACK_MEDIA_SECS);
        assert_eq!(config.playback_policy, PlaybackPolicy::Concurrent);
        tokio_test::assert_ok!(config.validate());
    }

    #[test]
    fn test_failure_rate_is_clamped() {
        let mut config = StudioConfig::default();
        config.set_failure_rate(JobKind::Music, 3.0);
        assert_eq!(config.kind(JobKind::Music).failure_rate, 1.0);
        config.set_failure_rate(JobKind::Music, -0.5);
        assert_eq!(config.kind(JobKind::Music).failure_rate, 0.0);
        config.set_failure_rate(JobKind::Music, f64::NAN);
        assert_eq!(config.kind(JobKind::Music).failure_rate, 0.0);
    }

    #[test]
    fn test_validate_rejects_zero_capacity() {
        let config = StudioConfig {
            notification_capacity: 0,
            ..StudioConfig::default()
        };
        let err = tokio_test::assert_err!(config.validate());
        assert!(matches!(err, StudioError::ConfigError(_)));
    }

    #[test]
    fn test_builder_setters() {
        let config = StudioConfig::default()
            .with_rng_seed(7)
            .with_playback_policy(PlaybackPolicy::Exclusive)
            .with_chars_per_pct(10.0);
        assert_eq!(config.rng_seed, Some(7));
        assert_eq!(config.playback_policy, PlaybackPolicy::Exclusive);
        assert_eq!(config.voiceover_chars_per_pct, 10.0);
        assert_eq!(config.kind(JobKind::Tts).failure_rate, 0.1);
    }

    #[test]
    fn test_from_env_reads_kind_overrides() {
        std::env::set_var("STUDIO_SPEECH_TO_SPEECH_LATENCY_MS", "750");
        std::env::set_var("STUDIO_SPEECH_TO_SPEECH_FAILURE_RATE", "7");

        let config = StudioConfig::from_env();
        let s2s = config.kind(JobKind::SpeechToSpeech);
        assert_eq!(s2s.latency, Duration::from_millis(750));
        assert_eq!(s2s.failure_rate, 1.0);

        std::env::remove_var("STUDIO_SPEECH_TO_SPEECH_LATENCY_MS");
        std::env::remove_var("STUDIO_SPEECH_TO_SPEECH_FAILURE_RATE");
    }
}
