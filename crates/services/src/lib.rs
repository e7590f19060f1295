#![forbid(unsafe_code)]

pub mod error;
pub mod review;
pub mod sessions;

pub use quiz_core::Clock;

pub use error::SessionError;
pub use review::{ReviewEntry, reconcile};
pub use sessions::{QuizFlowService, QuizPhase, QuizProgress, QuizSession, SubmissionSnapshot};
