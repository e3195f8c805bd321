//! User-facing notifications.
//!
//! Every outcome the presentation layer should surface (job started, job
//! succeeded or failed, history changed) is published as one of these.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::job::JobId;

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    /// Work started, a result will follow
    Loading,
    Success,
    Error,
    Info,
}

impl NotificationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationLevel::Loading => "loading",
            NotificationLevel::Success => "success",
            NotificationLevel::Error => "error",
            NotificationLevel::Info => "info",
        }
    }
}

/// A discrete, user-visible message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    /// Job the message belongs to; a later message for the same job replaces
    /// its loading message
    #[serde(rename = "jobId", skip_serializing_if = "Option::is_none")]
    pub job_id: Option<JobId>,
    pub timestamp: DateTime<Utc>,
}

impl Notification {
    fn new(level: NotificationLevel, message: impl Into<String>, job_id: Option<JobId>) -> Self {
        Self {
            level,
            message: message.into(),
            job_id,
            timestamp: Utc::now(),
        }
    }

    /// Create a loading message for a job.
    pub fn loading(job_id: &JobId, message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Loading, message, Some(job_id.clone()))
    }

    /// Create a success message.
    pub fn success(job_id: Option<&JobId>, message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Success, message, job_id.cloned())
    }

    /// Create an error message.
    pub fn error(job_id: Option<&JobId>, message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Error, message, job_id.cloned())
    }

    /// Create an info message.
    pub fn info(job_id: Option<&JobId>, message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Info, message, job_id.cloned())
    }
}
