//! Shared error types for the services crate.

use thiserror::Error;

use client::ProviderError;
use quiz_core::model::QuestionId;

/// Errors emitted by the quiz session and its workflow.
///
/// `Incomplete` is the one variant a UI is expected to surface to the end
/// user; the rest indicate misuse of the session lifecycle or a failing
/// collaborator.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("question set is empty")]
    Empty,
    #[error("no questions loaded")]
    NoQuestionsLoaded,
    #[error("question {0} is not part of this quiz")]
    UnknownQuestion(QuestionId),
    #[error("only {answered} of {total} questions answered")]
    Incomplete { answered: usize, total: usize },
    #[error("quiz already started")]
    AlreadyStarted,
    #[error("quiz is not in progress")]
    NotInProgress,
    #[error("no submission in flight")]
    NotSubmitting,
    #[error(transparent)]
    Provider(#[from] ProviderError),
}
