//! Per-session generation history.
//!
//! This crate provides:
//! - Most-recent-first artifact history
//! - Idempotent deletion and unconditional clearing

pub mod result_store;

pub use result_store::ResultStore;
