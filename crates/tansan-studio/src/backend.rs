//! Generation backends.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use tansan_models::params::{
    DURATION_MIN, GENRE, MOOD, PITCH, SCRIPT, SOURCE_NAME, TEXT, VOICE, VOICE_NAME,
};
use tansan_models::{FailureReason, GeneratedMedia, JobKind, JobParams, VoiceCatalog, SAMPLE_MEDIA_URLS};

use crate::clock::Clock;
use crate::config::StudioConfig;
use crate::outcome::{Outcome, OutcomeDecider};

/// Reason reported when a simulated generation fails.
pub const GENERATION_FAILED_MESSAGE: &str = "Generation failed. Please try again.";

const TTS_TITLE_CHARS: usize = 50;

/// Produces media for a job.
///
/// Implementations must eventually return; the job stays `running` until
/// they do.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    async fn generate(&self, kind: JobKind, params: &JobParams) -> Result<GeneratedMedia, FailureReason>;
}

/// Stand-in backend: waits the configured latency, asks the outcome
/// strategy, then describes the request with a sample media URL.
pub struct SimulatedBackend {
    config: StudioConfig,
    clock: Arc<dyn Clock>,
    decider: Arc<dyn OutcomeDecider>,
    next_url: AtomicUsize,
}

impl SimulatedBackend {
    pub fn new(config: StudioConfig, clock: Arc<dyn Clock>, decider: Arc<dyn OutcomeDecider>) -> Self {
        Self {
            config,
            clock,
            decider,
            next_url: AtomicUsize::new(0),
        }
    }

    fn next_media_url(&self) -> &'static str {
        let index = self.next_url.fetch_add(1, Ordering::Relaxed);
        SAMPLE_MEDIA_URLS[index % SAMPLE_MEDIA_URLS.len()]
    }
}

#[async_trait]
impl GenerationBackend for SimulatedBackend {
    async fn generate(&self, kind: JobKind, params: &JobParams) -> Result<GeneratedMedia, FailureReason> {
        self.clock.sleep(self.config.kind(kind).latency).await;

        match self.decider.decide(kind) {
            Outcome::Failure => Err(FailureReason::new(GENERATION_FAILED_MESSAGE)),
            Outcome::Success => Ok(describe(kind, params, self.next_media_url())),
        }
    }
}

/// Title and details for a generated result, in the studio's display format.
pub fn describe(kind: JobKind, params: &JobParams, media_url: &str) -> GeneratedMedia {
    let mut duration_secs = None;
    let (title, details) = match kind {
        JobKind::Tts => {
            let text = params.str(TEXT).unwrap_or_default();
            let snippet: String = text.chars().take(TTS_TITLE_CHARS).collect();
            (
                format!("{}...", snippet),
                format!("Voice: {}", voice_name(kind, params)),
            )
        }
        JobKind::Music => {
            let genre = params.str(GENRE).unwrap_or("pop");
            let mood = params.str(MOOD).unwrap_or("happy");
            let minutes = params.number(DURATION_MIN).unwrap_or(2.0);
            duration_secs = Some(minutes * 60.0);
            (
                format!("AI Song ({})", genre),
                format!("Mood: {}, Duration: {} min", mood, minutes),
            )
        }
        JobKind::VoiceCover => {
            let source = non_blank(params, SOURCE_NAME).unwrap_or("YouTube Video");
            let pitch = params.number(PITCH).unwrap_or(0.0);
            let sign = if pitch > 0.0 { "+" } else { "" };
            (
                format!("AI Cover of {}", source),
                format!("Voice: {} | Pitch: {}{}", voice_name(kind, params), sign, pitch),
            )
        }
        JobKind::SpeechToSpeech => (
            format!("Speech to Speech ({})", params.str(SOURCE_NAME).unwrap_or_default()),
            format!("Target voice: {}", voice_name(kind, params)),
        ),
        JobKind::VoiceCloneTraining => (
            params.str(VOICE_NAME).unwrap_or_default().to_string(),
            "Voice model training started".to_string(),
        ),
        JobKind::Voiceover => {
            let script = params.str(SCRIPT).unwrap_or_default();
            (
                format!("Voiceover ({})", voice_name(kind, params)),
                format!("Script: {} characters", script.chars().count()),
            )
        }
    };
    let media = GeneratedMedia::new(media_url, title, details);
    match duration_secs {
        Some(secs) => media.with_duration(secs),
        None => media,
    }
}

fn voice_name(kind: JobKind, params: &JobParams) -> &'static str {
    let id = params.str(VOICE).unwrap_or_default();
    match VoiceCatalog::for_kind(kind) {
        Some(catalog) => catalog.display_name(id),
        None => tansan_models::FALLBACK_VOICE_NAME,
    }
}

fn non_blank<'a>(params: &'a JobParams, key: &str) -> Option<&'a str> {
    params.str(key).filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::SystemClock;
    use crate::outcome::{AlwaysFail, AlwaysSucceed};

    const URL: &str = "https://cdn/sample.mp3";

    #[test]
    fn test_describe_tts() {
        let params = JobParams::new()
            .with(TEXT, "a".repeat(80))
            .with(VOICE, "sarah");
        let media = describe(JobKind::Tts, &params, URL);

        assert_eq!(media.title, format!("{}...", "a".repeat(50)));
        assert_eq!(media.details, "Voice: Sarah");
        assert_eq!(media.media_url, URL);
    }

    #[test]
    fn test_describe_tts_unknown_voice() {
        let params = JobParams::new().with(TEXT, "Hi").with(VOICE, "nobody");
        let media = describe(JobKind::Tts, &params, URL);
        assert_eq!(media.title, "Hi...");
        assert_eq!(media.details, "Voice: AI Voice");
    }

    #[test]
    fn test_describe_music() {
        let params = JobParams::new()
            .with(GENRE, "Jazz")
            .with(MOOD, "Calm")
            .with(DURATION_MIN, "3");
        let media = describe(JobKind::Music, &params, URL);
        assert_eq!(media.title, "AI Song (Jazz)");
        assert_eq!(media.details, "Mood: Calm, Duration: 3 min");
        assert_eq!(media.duration_secs, Some(180.0));
    }

    #[test]
    fn test_describe_cover_pitch_sign() {
        let params = JobParams::new()
            .with(VOICE, "rnb-soul")
            .with(PITCH, 2);
        let media = describe(JobKind::VoiceCover, &params, URL);
        assert_eq!(media.title, "AI Cover of YouTube Video");
        assert_eq!(media.details, "Voice: R&B Soul Style | Pitch: +2");

        let params = params.with(PITCH, -3).with(SOURCE_NAME, "song.mp3");
        let media = describe(JobKind::VoiceCover, &params, URL);
        assert_eq!(media.title, "AI Cover of song.mp3");
        assert_eq!(media.details, "Voice: R&B Soul Style | Pitch: -3");
    }

    #[test]
    fn test_describe_remaining_kinds() {
        let s2s = JobParams::new()
            .with(SOURCE_NAME, "memo.wav")
            .with(VOICE, "old-storyteller");
        let media = describe(JobKind::SpeechToSpeech, &s2s, URL);
        assert_eq!(media.title, "Speech to Speech (memo.wav)");
        assert_eq!(media.details, "Target voice: Old Storyteller");

        let clone = JobParams::new().with(VOICE_NAME, "My Voice");
        let media = describe(JobKind::VoiceCloneTraining, &clone, URL);
        assert_eq!(media.title, "My Voice");
        assert_eq!(media.details, "Voice model training started");

        let voiceover = JobParams::new()
            .with(SCRIPT, "Hello world")
            .with(VOICE, "warm-female");
        let media = describe(JobKind::Voiceover, &voiceover, URL);
        assert_eq!(media.title, "Voiceover (Warm Female)");
        assert_eq!(media.details, "Script: 11 characters");
    }

    #[tokio::test(start_paused = true)]
    async fn test_simulated_backend_rotates_urls() {
        let backend = SimulatedBackend::new(
            StudioConfig::default(),
            Arc::new(SystemClock),
            Arc::new(AlwaysSucceed),
        );
        let params = JobParams::new().with(VOICE_NAME, "v");

        let mut urls = Vec::new();
        for _ in 0..SAMPLE_MEDIA_URLS.len() + 1 {
            let media = backend
                .generate(JobKind::VoiceCloneTraining, &params)
                .await
                .unwrap();
            urls.push(media.media_url);
        }
        assert_eq!(urls[0], SAMPLE_MEDIA_URLS[0]);
        assert_eq!(urls[1], SAMPLE_MEDIA_URLS[1]);
        assert_eq!(urls[SAMPLE_MEDIA_URLS.len()], SAMPLE_MEDIA_URLS[0]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_simulated_backend_waits_latency() {
        let mut config = StudioConfig::default();
        config.set_latency(JobKind::Music, std::time::Duration::from_secs(5));
        let backend = SimulatedBackend::new(config, Arc::new(SystemClock), Arc::new(AlwaysFail));

        let started = tokio::time::Instant::now();
        let result = backend.generate(JobKind::Music, &JobParams::new()).await;

        assert!(started.elapsed() >= std::time::Duration::from_secs(5));
        assert_eq!(result, Err(FailureReason::new(GENERATION_FAILED_MESSAGE)));
    }
}
