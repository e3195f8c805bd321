//! Job manager.
//!
//! Owns the job table and drives every job from submission to a terminal
//! status. A resolution task is spawned per job; it calls the backend
//! without holding any lock, then commits its result under the jobs lock
//! only if the job is still `running`. That check is what makes a
//! cancellation win over a backend answer that arrives later.
//!
//! Lock order is jobs, then results, then timeline.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{watch, RwLock};
use tracing::Instrument;

use tansan_models::{
    params::SCRIPT, ArtifactId, FailureReason, GeneratedMedia, Job, JobId, JobKind, JobParams,
    JobStatus, NewArtifact,
};
use tansan_store::ResultStore;
use tansan_timeline::{clamp_track_width, colors, DurationEstimator, Timeline};

use crate::backend::GenerationBackend;
use crate::clock::Clock;
use crate::error::{StudioError, StudioResult};
use crate::logging::JobLogger;
use crate::metrics;
use crate::notify::Notifier;

/// Reason recorded when a backend answers without a media locator.
pub const MISSING_MEDIA_MESSAGE: &str = "Generation returned no media";

/// Caller's view of a submitted job.
#[derive(Debug, Clone)]
pub struct JobHandle {
    pub id: JobId,
    pub kind: JobKind,
    status: watch::Receiver<JobStatus>,
}

impl JobHandle {
    /// Latest known status.
    pub fn status(&self) -> JobStatus {
        *self.status.borrow()
    }

    /// Wait until the job reaches a terminal status and return it.
    pub async fn wait(&mut self) -> JobStatus {
        if let Ok(status) = self.status.wait_for(JobStatus::is_terminal).await {
            return *status;
        }
        // The manager is gone; nothing will change any more
        *self.status.borrow()
    }
}

struct JobEntry {
    job: Job,
    status_tx: watch::Sender<JobStatus>,
}

impl JobEntry {
    fn publish_status(&self, logger: &JobLogger) {
        let previous = self.status_tx.send_replace(self.job.status);
        logger.log_transition(previous, self.job.status);
    }
}

#[derive(Default)]
struct JobTable {
    order: Vec<JobId>,
    entries: HashMap<JobId, JobEntry>,
    in_flight: HashSet<JobId>,
}

impl JobTable {
    fn insert(&mut self, job: Job, status_tx: watch::Sender<JobStatus>) {
        let id = job.id.clone();
        self.order.push(id.clone());
        self.in_flight.insert(id.clone());
        self.entries.insert(id, JobEntry { job, status_tx });
        metrics::set_jobs_in_flight(self.in_flight.len());
    }

    fn settle(&mut self, id: &JobId) {
        self.in_flight.remove(id);
        metrics::set_jobs_in_flight(self.in_flight.len());
    }
}

struct Shared {
    jobs: RwLock<JobTable>,
    results: Arc<RwLock<ResultStore>>,
    timeline: Arc<RwLock<Timeline>>,
    backend: Arc<dyn GenerationBackend>,
    clock: Arc<dyn Clock>,
    estimator: Arc<dyn DurationEstimator>,
    notifier: Notifier,
}

/// Accepts generation requests and tracks them to completion.
///
/// Cheap to clone; clones share the same job table.
#[derive(Clone)]
pub struct JobManager {
    shared: Arc<Shared>,
}

impl JobManager {
    pub fn new(
        backend: Arc<dyn GenerationBackend>,
        clock: Arc<dyn Clock>,
        estimator: Arc<dyn DurationEstimator>,
        results: Arc<RwLock<ResultStore>>,
        timeline: Arc<RwLock<Timeline>>,
        notifier: Notifier,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                jobs: RwLock::new(JobTable::default()),
                results,
                timeline,
                backend,
                clock,
                estimator,
                notifier,
            }),
        }
    }

    /// Start a job. It is `running` by the time this returns.
    ///
    /// Parameters are passed through untouched; see
    /// [`JobParams::validate_for`] for the caller-side check.
    pub async fn submit(&self, kind: JobKind, params: JobParams) -> StudioResult<JobHandle> {
        let now = self.shared.clock.now();
        let mut job = Job::new(kind, params.clone(), now);
        job.start(now)?;

        let id = job.id.clone();
        let (status_tx, status_rx) = watch::channel(job.status);
        self.shared.jobs.write().await.insert(job, status_tx);

        let logger = JobLogger::new(&id, kind);
        logger.log_transition(JobStatus::Queued, JobStatus::Running);
        logger.log_start("submitted to backend");
        metrics::record_job_submitted(kind);
        self.shared.notifier.loading(&id, kind.loading_message());

        let shared = Arc::clone(&self.shared);
        let span = logger.create_span();
        let job_id = id.clone();
        tokio::spawn(
            async move {
                Shared::resolve(shared, job_id, kind, params).await;
            }
            .instrument(span),
        );

        Ok(JobHandle {
            id,
            kind,
            status: status_rx,
        })
    }

    /// Start a job from a kind tag such as `"tts"` or `"voice-cover"`.
    ///
    /// An unknown tag is rejected before any job exists.
    pub async fn submit_tagged(&self, tag: &str, params: JobParams) -> StudioResult<JobHandle> {
        let kind = match tag.parse::<JobKind>() {
            Ok(kind) => kind,
            Err(e) => {
                self.shared.notifier.error(None, e.to_string());
                return Err(e.into());
            }
        };
        self.submit(kind, params).await
    }

    /// Cancel a job and return its status afterwards.
    ///
    /// Terminal jobs are left as they are.
    pub async fn cancel(&self, id: &JobId) -> StudioResult<JobStatus> {
        let now = self.shared.clock.now();
        let mut jobs = self.shared.jobs.write().await;
        let entry = jobs
            .entries
            .get_mut(id)
            .ok_or_else(|| StudioError::job_not_found(id))?;

        if !entry.job.cancel(now) {
            return Ok(entry.job.status);
        }
        let kind = entry.job.kind;
        entry.publish_status(&JobLogger::new(id, kind));
        jobs.settle(id);

        metrics::record_job_cancelled(kind);
        self.shared.notifier.info(Some(id), "Generation cancelled.");
        Ok(JobStatus::Cancelled)
    }

    /// Snapshot of every job, in submission order.
    pub async fn jobs(&self) -> Vec<Job> {
        let jobs = self.shared.jobs.read().await;
        jobs.order
            .iter()
            .filter_map(|id| jobs.entries.get(id))
            .map(|entry| entry.job.clone())
            .collect()
    }

    pub async fn job(&self, id: &JobId) -> Option<Job> {
        let jobs = self.shared.jobs.read().await;
        jobs.entries.get(id).map(|entry| entry.job.clone())
    }

    /// Jobs that have not reached a terminal status.
    pub async fn in_flight(&self) -> usize {
        self.shared.jobs.read().await.in_flight.len()
    }

    /// Artifact produced by a job, or why there is none.
    pub async fn outcome(&self, id: &JobId) -> StudioResult<ArtifactId> {
        let job = self
            .job(id)
            .await
            .ok_or_else(|| StudioError::job_not_found(id))?;

        match job.status {
            JobStatus::Succeeded => job
                .result_ref
                .ok_or_else(|| StudioError::generation_failed(MISSING_MEDIA_MESSAGE)),
            JobStatus::Failed => Err(StudioError::generation_failed(
                job.failure_reason.unwrap_or_default(),
            )),
            JobStatus::Cancelled => Err(StudioError::Cancelled(job.id)),
            JobStatus::Queued | JobStatus::Running => Err(StudioError::StillRunning(job.id)),
        }
    }
}

impl Shared {
    async fn resolve(shared: Arc<Shared>, id: JobId, kind: JobKind, params: JobParams) {
        let logger = JobLogger::new(&id, kind);
        let result = shared.backend.generate(kind, &params).await;
        let now = shared.clock.now();

        let mut jobs = shared.jobs.write().await;
        let Some(entry) = jobs.entries.get_mut(&id) else {
            logger.log_warning("resolution for a job that is not in the table");
            return;
        };

        if entry.job.status != JobStatus::Running {
            logger.log_warning(&format!(
                "discarding backend result, job is already {}",
                entry.job.status
            ));
            metrics::record_late_resolution(kind);
            return;
        }

        let media = match result {
            Ok(media) if media.has_media() => Ok(media),
            Ok(_) => Err(FailureReason::new(MISSING_MEDIA_MESSAGE)),
            Err(reason) => Err(reason),
        };

        match media {
            Ok(media) => {
                let script = params.str(SCRIPT).unwrap_or_default();
                shared.commit_success(entry, media, script, now, &logger).await;
            }
            Err(reason) => shared.commit_failure(entry, reason, now, &logger),
        }
        jobs.settle(&id);
    }

    /// Append the artifact, place it on the timeline when its kind has a
    /// lane, and mark the job succeeded.
    async fn commit_success(
        &self,
        entry: &mut JobEntry,
        media: GeneratedMedia,
        script: &str,
        now: DateTime<Utc>,
        logger: &JobLogger,
    ) {
        let kind = entry.job.kind;
        let measured_secs = media.duration_secs;

        let mut results = self.results.write().await;
        let artifact = results.append(NewArtifact {
            source_job_id: entry.job.id.clone(),
            kind,
            media,
            created_at: now,
        });

        if let Err(e) = entry.job.succeed(artifact.id.clone(), now) {
            results.delete(&artifact.id);
            logger.log_error(&e.to_string());
            return;
        }

        if let Some(track_kind) = kind.timeline_track() {
            let estimated = self.estimator.estimate_pct(script, measured_secs);
            let width = clamp_track_width(estimated);
            if width != estimated {
                logger.log_warning(&format!("estimated width {} clamped to {}%", estimated, width));
            }
            let mut timeline = self.timeline.write().await;
            match timeline.add_artifact_track(
                artifact.id.clone(),
                track_kind,
                artifact.title.clone(),
                0.0,
                width,
                colors::VOICEOVER,
            ) {
                Ok(track_id) => logger.log_progress(&format!(
                    "placed on timeline as {} ({}%)",
                    track_id, width
                )),
                Err(e) => logger.log_error(&format!("could not place on timeline: {}", e)),
            }
        }

        entry.publish_status(logger);
        logger.log_completion(&format!("artifact {}", artifact.id));
        metrics::record_job_succeeded(kind);
        self.notifier
            .success(Some(&entry.job.id), kind.success_message());
    }

    fn commit_failure(
        &self,
        entry: &mut JobEntry,
        reason: FailureReason,
        now: DateTime<Utc>,
        logger: &JobLogger,
    ) {
        if let Err(e) = entry.job.fail(reason.as_str(), now) {
            logger.log_error(&e.to_string());
            return;
        }
        entry.publish_status(logger);
        logger.log_error(reason.as_str());
        metrics::record_job_failed(entry.job.kind);
        self.notifier.error(Some(&entry.job.id), reason.as_str());
    }
}
