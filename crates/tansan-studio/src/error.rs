//! Studio error types.

use thiserror::Error;

use tansan_models::{ArtifactId, JobId, TransitionError, ValidationError};
use tansan_playback::PlaybackError;
use tansan_timeline::TimelineError;

pub type StudioResult<T> = Result<T, StudioError>;

#[derive(Debug, Error)]
pub enum StudioError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Timeline error: {0}")]
    Timeline(#[from] TimelineError),

    #[error("Playback error: {0}")]
    Playback(#[from] PlaybackError),

    #[error("Invalid status change: {0}")]
    Transition(#[from] TransitionError),

    #[error("Job not found: {0}")]
    JobNotFound(JobId),

    #[error("Artifact not found: {0}")]
    ArtifactNotFound(ArtifactId),

    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    #[error("Job {0} was cancelled")]
    Cancelled(JobId),

    #[error("Job {0} has not finished")]
    StillRunning(JobId),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl StudioError {
    pub fn job_not_found(id: &JobId) -> Self {
        Self::JobNotFound(id.clone())
    }

    pub fn artifact_not_found(id: &ArtifactId) -> Self {
        Self::ArtifactNotFound(id.clone())
    }

    pub fn generation_failed(reason: impl Into<String>) -> Self {
        Self::GenerationFailed(reason.into())
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Check if resubmitting the same request could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StudioError::GenerationFailed(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StudioError::JobNotFound(_) | StudioError::ArtifactNotFound(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tansan_models::JobKind;

    #[test]
    fn test_retryable_classification() {
        assert!(StudioError::generation_failed("boom").is_retryable());
        assert!(!StudioError::job_not_found(&JobId::new()).is_retryable());
        assert!(StudioError::artifact_not_found(&ArtifactId::new()).is_not_found());
        assert!(!StudioError::from(ValidationError::unknown_kind("karaoke")).is_retryable());
    }

    #[test]
    fn test_wraps_validation_message() {
        let err = StudioError::from(ValidationError::missing_field(JobKind::Tts, "text"));
        assert_eq!(
            err.to_string(),
            "Validation error: Missing parameter 'text' for tts job"
        );
    }
}
