//! Structured job logging.
//!
//! Every line carries the job id and kind so one generation can be followed
//! from submission to its terminal status.

use tracing::{debug, error, info, warn, Span};

use tansan_models::{JobId, JobKind, JobStatus};

/// Logs job lifecycle events with the job id and kind attached.
#[derive(Debug, Clone)]
pub struct JobLogger {
    job_id: String,
    kind: JobKind,
}

impl JobLogger {
    pub fn new(job_id: &JobId, kind: JobKind) -> Self {
        Self {
            job_id: job_id.to_string(),
            kind,
        }
    }

    /// Log that a job was accepted and handed to the backend.
    pub fn log_start(&self, message: &str) {
        info!(
            job_id = %self.job_id,
            kind = %self.kind,
            "Job started: {}", message
        );
    }

    /// Log a status change. Terminal statuses log at info, the rest at debug.
    pub fn log_transition(&self, from: JobStatus, to: JobStatus) {
        let message = transition_message(from, to);
        if to.is_terminal() {
            info!(
                job_id = %self.job_id,
                kind = %self.kind,
                from = %from,
                to = %to,
                "{}", message
            );
        } else {
            debug!(
                job_id = %self.job_id,
                kind = %self.kind,
                from = %from,
                to = %to,
                "{}", message
            );
        }
    }

    pub fn log_progress(&self, message: &str) {
        info!(
            job_id = %self.job_id,
            kind = %self.kind,
            "Job progress: {}", message
        );
    }

    pub fn log_warning(&self, message: &str) {
        warn!(
            job_id = %self.job_id,
            kind = %self.kind,
            "Job warning: {}", message
        );
    }

    /// Log a failure, either the backend's reason or a commit problem.
    pub fn log_error(&self, message: &str) {
        error!(
            job_id = %self.job_id,
            kind = %self.kind,
            "Job error: {}", message
        );
    }

    /// Log the artifact a succeeded job produced.
    pub fn log_completion(&self, message: &str) {
        info!(
            job_id = %self.job_id,
            kind = %self.kind,
            "Job completed: {}", message
        );
    }

    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    pub fn kind(&self) -> JobKind {
        self.kind
    }

    /// Span covering a job's resolution task.
    pub fn create_span(&self) -> Span {
        tracing::info_span!(
            "job",
            job_id = %self.job_id,
            kind = %self.kind
        )
    }
}

fn transition_message(from: JobStatus, to: JobStatus) -> String {
    format!("Job status: {} -> {}", from, to)
}
