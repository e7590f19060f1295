use std::sync::Arc;

use tracing::{debug, warn};

use client::{GradingService, QuestionProvider, QuizBackend};
use quiz_core::Clock;
use quiz_core::model::GradingReport;

use super::session::QuizSession;
use crate::error::SessionError;

/// Orchestrates a quiz attempt around its collaborators.
///
/// Owns the time source and the question/grading endpoints; the session
/// itself stays a plain value threaded through by the caller.
#[derive(Clone)]
pub struct QuizFlowService {
    clock: Clock,
    questions: Arc<dyn QuestionProvider>,
    grader: Arc<dyn GradingService>,
}

impl QuizFlowService {
    #[must_use]
    pub fn new(
        clock: Clock,
        questions: Arc<dyn QuestionProvider>,
        grader: Arc<dyn GradingService>,
    ) -> Self {
        Self {
            clock,
            questions,
            grader,
        }
    }

    #[must_use]
    pub fn from_backend(clock: Clock, backend: &QuizBackend) -> Self {
        Self::new(clock, backend.questions.clone(), backend.grader.clone())
    }

    /// Fetch a fresh question set and begin the attempt.
    ///
    /// A provider failure propagates before the session is touched, so a
    /// quiz is never started over an unavailable question source.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Provider` when the fetch fails,
    /// `SessionError::Empty` when the server has no questions, and the
    /// `start` lifecycle errors otherwise.
    pub async fn start_quiz(&self, session: &mut QuizSession) -> Result<(), SessionError> {
        let questions = self.questions.fetch_quiz_questions().await?;
        session.load_questions(questions)?;
        session.start(self.clock.now())?;
        debug!(total = session.question_count(), "quiz started");
        Ok(())
    }

    /// Submit the completed attempt for grading.
    ///
    /// On success the report is attached and the session completes; on a
    /// grading failure the submission is aborted, leaving answers and
    /// elapsed time intact, and the provider error propagates. Either way
    /// the session never stays in `Submitting`. A host that cancels an
    /// in-flight grading call must route the cancellation through the same
    /// abort path.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Incomplete` / `SessionError::NotInProgress`
    /// from the submission gate, or `SessionError::Provider` when grading
    /// fails.
    pub async fn submit(&self, session: &mut QuizSession) -> Result<GradingReport, SessionError> {
        let snapshot = session.begin_submission()?;

        match self
            .grader
            .submit(&snapshot.answers, &snapshot.time_taken)
            .await
        {
            Ok(report) => {
                session.complete_submission(report.clone())?;
                debug!(score = report.score_percent, "quiz graded");
                Ok(report)
            }
            Err(err) => {
                warn!(error = %err, "grading failed, keeping attempt alive");
                session.abort_submission()?;
                Err(err.into())
            }
        }
    }
}
