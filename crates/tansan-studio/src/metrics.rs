//! Job and history metrics.
//!
//! Recorded through the `metrics` facade; nothing is exported unless the
//! embedding application installs a recorder.

use metrics::{counter, gauge};

use tansan_models::JobKind;

/// Metric names as constants for consistency.
pub mod names {
    pub const JOBS_SUBMITTED_TOTAL: &str = "tansan_jobs_submitted_total";
    pub const JOBS_SUCCEEDED_TOTAL: &str = "tansan_jobs_succeeded_total";
    pub const JOBS_FAILED_TOTAL: &str = "tansan_jobs_failed_total";
    pub const JOBS_CANCELLED_TOTAL: &str = "tansan_jobs_cancelled_total";
    pub const JOBS_IN_FLIGHT: &str = "tansan_jobs_in_flight";
    pub const LATE_RESOLUTIONS_DISCARDED_TOTAL: &str = "tansan_late_resolutions_discarded_total";
    pub const ARTIFACTS_DELETED_TOTAL: &str = "tansan_artifacts_deleted_total";
}

fn kind_labels(kind: JobKind) -> [(&'static str, String); 1] {
    [("kind", kind.as_str().to_string())]
}

pub fn record_job_submitted(kind: JobKind) {
    counter!(names::JOBS_SUBMITTED_TOTAL, &kind_labels(kind)).increment(1);
}

pub fn record_job_succeeded(kind: JobKind) {
    counter!(names::JOBS_SUCCEEDED_TOTAL, &kind_labels(kind)).increment(1);
}

pub fn record_job_failed(kind: JobKind) {
    counter!(names::JOBS_FAILED_TOTAL, &kind_labels(kind)).increment(1);
}

pub fn record_job_cancelled(kind: JobKind) {
    counter!(names::JOBS_CANCELLED_TOTAL, &kind_labels(kind)).increment(1);
}

pub fn record_late_resolution(kind: JobKind) {
    counter!(names::LATE_RESOLUTIONS_DISCARDED_TOTAL, &kind_labels(kind)).increment(1);
}

pub fn record_artifacts_deleted(count: usize) {
    counter!(names::ARTIFACTS_DELETED_TOTAL).increment(count as u64);
}

pub fn set_jobs_in_flight(count: usize) {
    gauge!(names::JOBS_IN_FLIGHT).set(count as f64);
}
