//! Model validation errors.

use thiserror::Error;

use crate::job::{JobId, JobKind, JobStatus};

pub type ValidationResult<T> = Result<T, ValidationError>;

/// Errors raised before a job is created.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Unknown job kind: {0}")]
    UnknownKind(String),

    #[error("Missing parameter '{field}' for {kind} job")]
    MissingField { kind: JobKind, field: &'static str },

    #[error("Invalid parameter '{field}' for {kind} job: {reason}")]
    InvalidField {
        kind: JobKind,
        field: &'static str,
        reason: String,
    },
}

impl ValidationError {
    pub fn unknown_kind(tag: impl Into<String>) -> Self {
        Self::UnknownKind(tag.into())
    }

    pub fn missing_field(kind: JobKind, field: &'static str) -> Self {
        Self::MissingField { kind, field }
    }

    pub fn invalid_field(kind: JobKind, field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            kind,
            field,
            reason: reason.into(),
        }
    }
}

/// A status change that would move a job backwards or skip a state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Job {job_id} cannot move from {from} to {to}")]
pub struct TransitionError {
    pub job_id: JobId,
    pub from: JobStatus,
    pub to: JobStatus,
}
