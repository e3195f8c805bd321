//! One user's studio: jobs, history, timeline and players.

use std::sync::Arc;

use tokio::sync::{broadcast, Mutex, RwLock};
use tracing::{debug, info};

use tansan_models::{
    Artifact, ArtifactId, Job, JobId, JobKind, JobParams, JobStatus, Notification, Track, TrackId,
    TrackKind,
};
use tansan_playback::{PlaybackController, PlaybackCoordinator, PlaybackResult};
use tansan_store::ResultStore;
use tansan_timeline::{CharacterRateEstimator, DurationEstimator, MeasuredDurationEstimator, Timeline};

use crate::backend::{GenerationBackend, SimulatedBackend};
use crate::clock::{Clock, SystemClock};
use crate::config::StudioConfig;
use crate::error::{StudioError, StudioResult};
use crate::manager::{JobHandle, JobManager};
use crate::metrics;
use crate::notify::Notifier;
use crate::outcome::{OutcomeDecider, ProbabilisticOutcome};

pub const ARTIFACT_REMOVED_MESSAGE: &str = "Generated audio removed.";
pub const HISTORY_CLEARED_MESSAGE: &str = "Generation history cleared.";

/// Explicit owner of every piece of per-user state.
///
/// Nothing here is global; two sessions never observe each other.
pub struct StudioSession {
    config: StudioConfig,
    manager: JobManager,
    results: Arc<RwLock<ResultStore>>,
    timeline: Arc<RwLock<Timeline>>,
    playback: Mutex<PlaybackCoordinator>,
    notifier: Notifier,
}

impl StudioSession {
    /// Session with the simulated backend and system clock.
    pub fn new(config: StudioConfig) -> Self {
        Self::builder(config).build()
    }

    pub fn builder(config: StudioConfig) -> StudioSessionBuilder {
        StudioSessionBuilder {
            config,
            backend: None,
            clock: None,
            decider: None,
            estimator: None,
        }
    }

    pub fn config(&self) -> &StudioConfig {
        &self.config
    }

    /// Underlying job manager, for callers that only need job control.
    pub fn manager(&self) -> &JobManager {
        &self.manager
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.notifier.subscribe()
    }

    // Jobs

    pub async fn submit(&self, kind: JobKind, params: JobParams) -> StudioResult<JobHandle> {
        self.manager.submit(kind, params).await
    }

    /// Check the kind's required parameters, then submit.
    ///
    /// A rejected request publishes an error notification and creates no job.
    pub async fn submit_checked(&self, kind: JobKind, params: JobParams) -> StudioResult<JobHandle> {
        if let Err(e) = params.validate_for(kind) {
            self.notifier.error(None, e.to_string());
            return Err(e.into());
        }
        self.manager.submit(kind, params).await
    }

    pub async fn submit_tagged(&self, tag: &str, params: JobParams) -> StudioResult<JobHandle> {
        self.manager.submit_tagged(tag, params).await
    }

    pub async fn cancel(&self, id: &JobId) -> StudioResult<JobStatus> {
        self.manager.cancel(id).await
    }

    pub async fn jobs(&self) -> Vec<Job> {
        self.manager.jobs().await
    }

    pub async fn job(&self, id: &JobId) -> Option<Job> {
        self.manager.job(id).await
    }

    pub async fn outcome(&self, id: &JobId) -> StudioResult<ArtifactId> {
        self.manager.outcome(id).await
    }

    // History

    /// Current history, most recent first.
    pub async fn artifacts(&self) -> Vec<Artifact> {
        self.results.read().await.list()
    }

    pub async fn artifact(&self, id: &ArtifactId) -> Option<Artifact> {
        self.results.read().await.get(id).cloned()
    }

    /// Remove one artifact and its player. Unknown ids are a no-op.
    pub async fn delete_artifact(&self, id: &ArtifactId) -> bool {
        let mut results = self.results.write().await;
        if !results.delete(id) {
            debug!(artifact_id = %id, "Delete requested for unknown artifact");
            return false;
        }
        self.playback.lock().await.remove(id);
        drop(results);
        metrics::record_artifacts_deleted(1);
        self.notifier.success(None, ARTIFACT_REMOVED_MESSAGE);
        true
    }

    /// Empty the history and drop every player. Returns how many artifacts
    /// were removed.
    pub async fn clear_history(&self) -> usize {
        let mut results = self.results.write().await;
        let removed = results.clear_all();
        self.playback.lock().await.clear();
        drop(results);
        metrics::record_artifacts_deleted(removed);
        info!(removed, "Cleared generation history");
        self.notifier.success(None, HISTORY_CLEARED_MESSAGE);
        removed
    }

    // Timeline

    pub async fn add_track(
        &self,
        kind: TrackKind,
        name: impl Into<String>,
        offset_pct: f64,
        duration_pct: f64,
        color: impl Into<String>,
    ) -> StudioResult<TrackId> {
        let id = self
            .timeline
            .write()
            .await
            .add_track(kind, name, offset_pct, duration_pct, color)?;
        Ok(id)
    }

    pub async fn remove_track(&self, id: &TrackId) -> bool {
        self.timeline.write().await.remove_track(id)
    }

    pub async fn move_track(&self, id: &TrackId, new_offset_pct: f64) -> StudioResult<bool> {
        Ok(self.timeline.write().await.move_track(id, new_offset_pct)?)
    }

    pub async fn resize_track(&self, id: &TrackId, new_duration_pct: f64) -> StudioResult<bool> {
        Ok(self.timeline.write().await.resize_track(id, new_duration_pct)?)
    }

    pub async fn toggle_track_mute(&self, id: &TrackId) -> Option<bool> {
        self.timeline.write().await.toggle_mute(id)
    }

    /// Tracks in rendering order.
    pub async fn tracks(&self) -> Vec<Track> {
        self.timeline.read().await.list()
    }

    // Playback

    /// Start playing an artifact from the history, opening its player on
    /// first use. Returns the artifacts paused by the playback policy.
    pub async fn play(&self, id: &ArtifactId) -> StudioResult<Vec<ArtifactId>> {
        let results = self.results.read().await;
        let duration_secs = self.media_duration(&results, id)?;
        let mut playback = self.playback.lock().await;
        playback.open(id, duration_secs)?;
        Ok(playback.play(id).unwrap_or_default())
    }

    /// Pause an artifact. Returns false if it has no player.
    pub async fn pause(&self, id: &ArtifactId) -> bool {
        self.playback.lock().await.pause(id)
    }

    /// Move the playhead, clamped to the artifact's duration.
    pub async fn seek(&self, id: &ArtifactId, secs: f64) -> StudioResult<f64> {
        self.with_player(id, |player| player.seek(secs)).await
    }

    pub async fn set_volume(&self, id: &ArtifactId, volume: f64) -> StudioResult<f64> {
        self.with_player(id, |player| player.set_volume(volume)).await
    }

    pub async fn toggle_mute(&self, id: &ArtifactId) -> StudioResult<bool> {
        self.with_player(id, |player| Ok(player.toggle_mute())).await
    }

    /// Snapshot of an artifact's player, if one is open.
    pub async fn player(&self, id: &ArtifactId) -> Option<PlaybackController> {
        self.playback.lock().await.get(id).cloned()
    }

    /// Artifacts currently playing.
    pub async fn playing(&self) -> Vec<ArtifactId> {
        self.playback.lock().await.playing()
    }

    /// Players only exist for artifacts still in the history. The store read
    /// guard is held until the player is touched so a concurrent delete
    /// cannot leave one behind.
    async fn with_player<T>(
        &self,
        id: &ArtifactId,
        op: impl FnOnce(&mut PlaybackController) -> PlaybackResult<T>,
    ) -> StudioResult<T> {
        let results = self.results.read().await;
        let duration_secs = self.media_duration(&results, id)?;
        let mut playback = self.playback.lock().await;
        let player = playback.open(id, duration_secs)?;
        Ok(op(player)?)
    }

    fn media_duration(&self, results: &ResultStore, id: &ArtifactId) -> StudioResult<f64> {
        let artifact = results
            .get(id)
            .ok_or_else(|| StudioError::artifact_not_found(id))?;
        Ok(artifact
            .duration_secs
            .unwrap_or(self.config.fallback_media_secs))
    }
}

/// Swaps the collaborators a session is built with.
pub struct StudioSessionBuilder {
    config: StudioConfig,
    backend: Option<Arc<dyn GenerationBackend>>,
    clock: Option<Arc<dyn Clock>>,
    decider: Option<Arc<dyn OutcomeDecider>>,
    estimator: Option<Arc<dyn DurationEstimator>>,
}

impl StudioSessionBuilder {
    /// Replaces the simulated backend entirely.
    pub fn with_backend(mut self, backend: Arc<dyn GenerationBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Outcome strategy for the simulated backend. Ignored with a custom backend.
    pub fn with_decider(mut self, decider: Arc<dyn OutcomeDecider>) -> Self {
        self.decider = Some(decider);
        self
    }

    pub fn with_estimator(mut self, estimator: Arc<dyn DurationEstimator>) -> Self {
        self.estimator = Some(estimator);
        self
    }

    pub fn build(self) -> StudioSession {
        let config = self.config;
        let clock: Arc<dyn Clock> = match self.clock {
            Some(clock) => clock,
            None => Arc::new(SystemClock),
        };
        let backend: Arc<dyn GenerationBackend> = match self.backend {
            Some(backend) => backend,
            None => {
                let decider: Arc<dyn OutcomeDecider> = match self.decider {
                    Some(decider) => decider,
                    None => Arc::new(ProbabilisticOutcome::from_config(&config)),
                };
                Arc::new(SimulatedBackend::new(config.clone(), Arc::clone(&clock), decider))
            }
        };
        let estimator: Arc<dyn DurationEstimator> = match self.estimator {
            Some(estimator) => estimator,
            None => Arc::new(MeasuredDurationEstimator::new(
                config.timeline_span_secs,
                CharacterRateEstimator::new(config.voiceover_chars_per_pct),
            )),
        };

        let notifier = Notifier::new(config.notification_capacity);
        let results = Arc::new(RwLock::new(ResultStore::new()));
        let timeline = Arc::new(RwLock::new(Timeline::with_background_tracks()));
        let manager = JobManager::new(
            backend,
            clock,
            estimator,
            Arc::clone(&results),
            Arc::clone(&timeline),
            notifier.clone(),
        );
        let playback = PlaybackCoordinator::new(config.playback_policy, config.default_volume);

        StudioSession {
            config,
            manager,
            results,
            timeline,
            playback: Mutex::new(playback),
            notifier,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tansan_models::params::{SCRIPT, VOICE};
    use tansan_models::NotificationLevel;
    use tansan_playback::PlaybackPolicy;
    use tansan_timeline::colors;

    use crate::error::StudioError;
    use crate::outcome::AlwaysSucceed;

    fn session(config: StudioConfig) -> StudioSession {
        StudioSession::builder(config)
            .with_decider(Arc::new(AlwaysSucceed))
            .build()
    }

    #[tokio::test]
    async fn test_new_session_has_background_tracks() {
        let session = session(StudioConfig::default());
        let tracks = session.tracks().await;
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].name, "Background Video.mp4");
        assert_eq!(tracks[1].name, "Background Music.mp3");
        assert!(session.artifacts().await.is_empty());
    }

    #[tokio::test]
    async fn test_submit_checked_rejects_missing_script() {
        let session = session(StudioConfig::default());
        let mut rx = session.subscribe();

        let err = session
            .submit_checked(JobKind::Voiceover, JobParams::new().with(VOICE, "warm-female"))
            .await
            .unwrap_err();

        assert!(matches!(err, StudioError::Validation(_)));
        assert!(session.jobs().await.is_empty());
        assert_eq!(rx.recv().await.unwrap().level, NotificationLevel::Error);
    }

    async fn generate(session: &StudioSession, kind: JobKind, params: JobParams) -> ArtifactId {
        let mut handle = session.submit(kind, params).await.unwrap();
        handle.wait().await;
        session.outcome(&handle.id).await.unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_delete_drops_player_and_notifies() {
        let session = session(StudioConfig::default());
        let artifact_id = generate(
            &session,
            JobKind::Voiceover,
            JobParams::new().with(SCRIPT, "Short script"),
        )
        .await;

        session.play(&artifact_id).await.unwrap();
        let mut rx = session.subscribe();

        assert!(session.delete_artifact(&artifact_id).await);
        assert!(session.player(&artifact_id).await.is_none());
        let notification = rx.recv().await.unwrap();
        assert_eq!(notification.message, ARTIFACT_REMOVED_MESSAGE);

        assert!(!session.delete_artifact(&artifact_id).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_deleted_artifact_cannot_be_played() {
        let session = session(StudioConfig::default());
        let artifact_id = generate(&session, JobKind::Music, JobParams::new()).await;
        session.play(&artifact_id).await.unwrap();
        session.delete_artifact(&artifact_id).await;

        let err = session.play(&artifact_id).await.unwrap_err();
        assert!(matches!(err, StudioError::ArtifactNotFound(_)));
        assert!(session.seek(&artifact_id, 1.0).await.is_err());
        assert!(session.player(&artifact_id).await.is_none());
        assert!(session.playing().await.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_artifact_gets_no_player() {
        let session = session(StudioConfig::default());
        let stray = ArtifactId::new();
        assert!(session.play(&stray).await.unwrap_err().is_not_found());
        assert!(!session.pause(&stray).await);
        assert!(session.player(&stray).await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_player_uses_artifact_duration() {
        let session = session(StudioConfig::default());
        let song = generate(
            &session,
            JobKind::Music,
            JobParams::new().with(tansan_models::params::DURATION_MIN, 3),
        )
        .await;
        let voiceover = generate(
            &session,
            JobKind::Voiceover,
            JobParams::new().with(SCRIPT, "Short script"),
        )
        .await;

        assert_eq!(session.seek(&song, 5.0).await.unwrap(), 5.0);
        assert_eq!(session.seek(&song, 500.0).await.unwrap(), 180.0);
        assert_eq!(
            session.seek(&voiceover, 500.0).await.unwrap(),
            session.config().fallback_media_secs
        );
        assert_eq!(session.set_volume(&song, 0.3).await.unwrap(), 0.3);
        assert!(session.toggle_mute(&song).await.unwrap());

        let player = session.player(&song).await.unwrap();
        assert_eq!(player.duration_secs, 180.0);
        assert_eq!(player.position_secs, 180.0);
        assert!(player.is_muted);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exclusive_policy_from_config() {
        let config = StudioConfig::default().with_playback_policy(PlaybackPolicy::Exclusive);
        let session = session(config);
        let a = generate(&session, JobKind::Music, JobParams::new()).await;
        let b = generate(&session, JobKind::Music, JobParams::new()).await;

        assert!(session.play(&a).await.unwrap().is_empty());
        assert_eq!(session.play(&b).await.unwrap(), vec![a]);
        assert_eq!(session.playing().await, vec![b]);
    }

    #[tokio::test]
    async fn test_track_operations() {
        let session = session(StudioConfig::default());
        let id = session
            .add_track(TrackKind::Audio, "Narration", 10.0, 25.0, colors::VOICEOVER)
            .await
            .unwrap();

        assert!(session.move_track(&id, 50.0).await.unwrap());
        assert!(session.resize_track(&id, 30.0).await.unwrap());
        assert_eq!(session.toggle_track_mute(&id).await, Some(true));
        assert!(matches!(
            session.move_track(&id, -1.0).await,
            Err(StudioError::Timeline(_))
        ));

        let track = session.tracks().await.pop().unwrap();
        assert_eq!((track.offset_pct, track.duration_pct), (50.0, 30.0));
        assert!(session.remove_track(&id).await);
        assert_eq!(session.tracks().await.len(), 2);
    }
}
