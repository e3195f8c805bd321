//! Generation job orchestration for the TansanMediai studio.
//!
//! A [`StudioSession`] owns one user's job manager, generation history,
//! voiceover timeline and players. Jobs are resolved asynchronously by a
//! [`GenerationBackend`]; progress is published as notifications.

pub mod backend;
pub mod clock;
pub mod config;
pub mod error;
pub mod logging;
pub mod manager;
pub mod metrics;
pub mod notify;
pub mod outcome;
pub mod session;

pub use backend::{describe, GenerationBackend, SimulatedBackend, GENERATION_FAILED_MESSAGE};
pub use clock::{Clock, SystemClock};
pub use config::{KindSettings, StudioConfig};
pub use error::{StudioError, StudioResult};
pub use logging::JobLogger;
pub use manager::{JobHandle, JobManager, MISSING_MEDIA_MESSAGE};
pub use notify::Notifier;
pub use outcome::{AlwaysFail, AlwaysSucceed, Outcome, OutcomeDecider, ProbabilisticOutcome};
pub use session::{StudioSession, StudioSessionBuilder, ARTIFACT_REMOVED_MESSAGE, HISTORY_CLEARED_MESSAGE};
