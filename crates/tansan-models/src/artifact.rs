//! Artifacts produced by succeeded jobs.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::job::{JobId, JobKind};

/// Unique identifier for an artifact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct ArtifactId(pub String);

impl ArtifactId {
    /// Generate a new random artifact ID.
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

impl Default for ArtifactId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a generation backend hands back on success.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GeneratedMedia {
    /// Opaque media locator
    pub media_url: String,
    pub title: String,
    /// Human-readable summary of the generation parameters
    pub details: String,
    /// Measured duration, when the backend knows it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_secs: Option<f64>,
}

impl GeneratedMedia {
    pub fn new(media_url: impl Into<String>, title: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            media_url: media_url.into(),
            title: title.into(),
            details: details.into(),
            duration_secs: None,
        }
    }

    pub fn with_duration(mut self, secs: f64) -> Self {
        self.duration_secs = Some(secs);
        self
    }

    /// A result without a media locator cannot become an artifact.
    pub fn has_media(&self) -> bool {
        !self.media_url.trim().is_empty()
    }
}

/// Why a generation attempt failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct FailureReason(pub String);

impl FailureReason {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Artifact contents before the result store assigns an id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewArtifact {
    pub source_job_id: JobId,
    pub kind: JobKind,
    pub media: GeneratedMedia,
    pub created_at: DateTime<Utc>,
}

/// Immutable result of a succeeded job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Artifact {
    pub id: ArtifactId,
    pub source_job_id: JobId,
    pub kind: JobKind,
    pub media_url: String,
    pub title: String,
    pub details: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_secs: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl Artifact {
    /// Materialize a draft under a freshly assigned id.
    pub fn from_draft(id: ArtifactId, draft: NewArtifact) -> Self {
        let NewArtifact {
            source_job_id,
            kind,
            media,
            created_at,
        } = draft;

        Self {
            id,
            source_job_id,
            kind,
            media_url: media.media_url,
            title: media.title,
            details: media.details,
            duration_secs: media.duration_secs,
            created_at,
        }
    }
}
