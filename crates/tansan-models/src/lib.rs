//! Shared data models for the TansanMediai studio core.
//!
//! This crate provides Serde-serializable types for:
//! - Generation jobs and their status lifecycle
//! - Job parameters and per-kind required fields
//! - Artifacts produced by succeeded jobs
//! - Timeline tracks
//! - Voice catalogs
//! - User-facing notifications

pub mod artifact;
pub mod error;
pub mod job;
pub mod notification;
pub mod params;
pub mod track;
pub mod voice;

// Re-export common types
pub use artifact::{Artifact, ArtifactId, FailureReason, GeneratedMedia, NewArtifact};
pub use error::{TransitionError, ValidationError, ValidationResult};
pub use job::{Job, JobId, JobKind, JobStatus, StatusChange};
pub use notification::{Notification, NotificationLevel};
pub use params::JobParams;
pub use track::{Track, TrackId, TrackKind};
pub use voice::{Voice, VoiceCatalog, FALLBACK_VOICE_NAME, SAMPLE_MEDIA_URLS};
