//! Generation job definitions.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::artifact::ArtifactId;
use crate::error::{TransitionError, ValidationError};
use crate::params::JobParams;
use crate::track::TrackKind;

/// Unique identifier for a job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    /// Generate a new random job ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of generation requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    /// Text-to-speech
    Tts,
    /// Music composition
    Music,
    /// Voice cover of an existing song
    VoiceCover,
    /// Voice conversion of a recording
    SpeechToSpeech,
    /// Training a cloned voice model
    VoiceCloneTraining,
    /// Voiceover studio script rendering
    Voiceover,
}

impl JobKind {
    pub const ALL: [JobKind; 6] = [
        JobKind::Tts,
        JobKind::Music,
        JobKind::VoiceCover,
        JobKind::SpeechToSpeech,
        JobKind::VoiceCloneTraining,
        JobKind::Voiceover,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobKind::Tts => "tts",
            JobKind::Music => "music",
            JobKind::VoiceCover => "voice_cover",
            JobKind::SpeechToSpeech => "speech_to_speech",
            JobKind::VoiceCloneTraining => "voice_clone_training",
            JobKind::Voiceover => "voiceover",
        }
    }

    /// Message shown while a job of this kind is running.
    pub fn loading_message(&self) -> &'static str {
        match self {
            JobKind::Tts => "Generating your audio...",
            JobKind::Music => "Creating your masterpiece...",
            JobKind::VoiceCover => "Generating your AI cover...",
            JobKind::SpeechToSpeech => "Transforming speech...",
            JobKind::VoiceCloneTraining => "Starting voice training...",
            JobKind::Voiceover => "Generating voiceover...",
        }
    }

    /// Message shown when a job of this kind succeeds.
    pub fn success_message(&self) -> &'static str {
        match self {
            JobKind::Tts => "Audio generated successfully!",
            JobKind::Music => "Song created successfully!",
            JobKind::VoiceCover => "AI cover generated successfully!",
            JobKind::SpeechToSpeech => "Speech transformed successfully!",
            JobKind::VoiceCloneTraining => "Training started! It may take up to 24 hours.",
            JobKind::Voiceover => "Voiceover added to timeline!",
        }
    }

    /// Timeline lane a succeeded job of this kind is placed on, if any.
    ///
    /// Only voiceover results become tracks.
    pub fn timeline_track(&self) -> Option<TrackKind> {
        match self {
            JobKind::Voiceover => Some(TrackKind::Audio),
            JobKind::Tts
            | JobKind::Music
            | JobKind::VoiceCover
            | JobKind::SpeechToSpeech
            | JobKind::VoiceCloneTraining => None,
        }
    }
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobKind {
    type Err = ValidationError;

    /// Accepts both `voice_cover` and `voice-cover` spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        JobKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| ValidationError::unknown_kind(s))
    }
}

/// Job lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Job was accepted but has not started
    #[default]
    Queued,
    /// Job is waiting on the generation backend
    Running,
    /// Job produced an artifact
    Succeeded,
    /// Job failed with a reason
    Failed,
    /// Job was cancelled before resolving
    Cancelled,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Running => "running",
            JobStatus::Succeeded => "succeeded",
            JobStatus::Failed => "failed",
            JobStatus::Cancelled => "cancelled",
        }
    }

    /// Check if this is a terminal state (no more updates expected).
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Succeeded | JobStatus::Failed | JobStatus::Cancelled
        )
    }

    /// Forward-only transition table.
    pub fn can_transition_to(&self, next: JobStatus) -> bool {
        use JobStatus::*;
        matches!(
            (*self, next),
            (Queued, Running)
                | (Queued, Cancelled)
                | (Running, Succeeded)
                | (Running, Failed)
                | (Running, Cancelled)
        )
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A status a job held, and since when.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct StatusChange {
    pub status: JobStatus,
    pub at: DateTime<Utc>,
}

/// A single generation request.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Job {
    /// Unique job ID
    pub id: JobId,

    /// What is being generated
    pub kind: JobKind,

    /// Opaque generation parameters
    pub params: JobParams,

    /// Current status
    #[serde(default)]
    pub status: JobStatus,

    /// Submission timestamp
    pub created_at: DateTime<Utc>,

    /// Last status change
    pub updated_at: DateTime<Utc>,

    /// Artifact produced on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_ref: Option<ArtifactId>,

    /// Reason reported on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,

    /// Every status held so far, oldest first
    #[serde(default)]
    pub history: Vec<StatusChange>,
}

impl Job {
    /// Create a queued job.
    pub fn new(kind: JobKind, params: JobParams, now: DateTime<Utc>) -> Self {
        Self {
            id: JobId::new(),
            kind,
            params,
            status: JobStatus::Queued,
            created_at: now,
            updated_at: now,
            result_ref: None,
            failure_reason: None,
            history: vec![StatusChange {
                status: JobStatus::Queued,
                at: now,
            }],
        }
    }

    /// Check if the job is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Statuses this job has held, oldest first.
    pub fn status_sequence(&self) -> Vec<JobStatus> {
        self.history.iter().map(|change| change.status).collect()
    }

    /// Mark the job as handed to the backend.
    pub fn start(&mut self, at: DateTime<Utc>) -> Result<(), TransitionError> {
        self.transition(JobStatus::Running, at)
    }

    /// Mark the job as succeeded with its artifact.
    pub fn succeed(&mut self, artifact_id: ArtifactId, at: DateTime<Utc>) -> Result<(), TransitionError> {
        self.transition(JobStatus::Succeeded, at)?;
        self.result_ref = Some(artifact_id);
        Ok(())
    }

    /// Mark the job as failed with a reason.
    pub fn fail(&mut self, reason: impl Into<String>, at: DateTime<Utc>) -> Result<(), TransitionError> {
        self.transition(JobStatus::Failed, at)?;
        self.failure_reason = Some(reason.into());
        Ok(())
    }

    /// Cancel the job. Terminal jobs are left untouched.
    ///
    /// Returns true if the status changed.
    pub fn cancel(&mut self, at: DateTime<Utc>) -> bool {
        if self.is_terminal() {
            return false;
        }
        self.transition(JobStatus::Cancelled, at).is_ok()
    }

    fn transition(&mut self, next: JobStatus, at: DateTime<Utc>) -> Result<(), TransitionError> {
        if !self.status.can_transition_to(next) {
            return Err(TransitionError {
                job_id: self.id.clone(),
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        self.updated_at = at;
        self.history.push(StatusChange { status: next, at });
        Ok(())
    }
}
