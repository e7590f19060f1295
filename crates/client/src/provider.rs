use async_trait::async_trait;
use quiz_core::model::{Answer, AnswerOption, GradingReport, Question, QuestionId, QuestionResult};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by quiz backend adapters.
///
/// The core treats any of these as "the collaborator is unavailable"; retry
/// and backoff policy live with the caller, not here.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProviderError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("server returned status {0}")]
    Status(u16),

    #[error("malformed response: {0}")]
    Decode(String),
}

/// Source of the question set for a quiz attempt.
#[async_trait]
pub trait QuestionProvider: Send + Sync {
    /// Fetch the questions for a new attempt, in presentation order.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` when the question source is unreachable or
    /// responds with an unusable payload.
    async fn fetch_quiz_questions(&self) -> Result<Vec<Question>, ProviderError>;
}

/// Grading authority for a submitted attempt.
#[async_trait]
pub trait GradingService: Send + Sync {
    /// Submit a completed answer sheet and the formatted elapsed time.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` when grading fails; the caller is expected to
    /// abort the submission and keep the attempt intact.
    async fn submit(
        &self,
        answers: &[Answer],
        time_taken: &str,
    ) -> Result<GradingReport, ProviderError>;
}

/// Read-only access to past grading reports.
///
/// Not consumed by the session itself; a review surface may list these.
#[async_trait]
pub trait QuizHistory: Send + Sync {
    /// # Errors
    ///
    /// Returns `ProviderError` when history cannot be fetched.
    async fn fetch_quiz_history(&self) -> Result<Vec<GradingReport>, ProviderError>;
}

/// In-memory quiz backend for testing and prototyping.
///
/// Holds the question set together with its answer key and grades
/// submissions locally the way the server would.
#[derive(Clone, Default)]
pub struct InMemoryQuizBackend {
    questions: Arc<Mutex<Vec<Question>>>,
    answer_key: Arc<Mutex<HashMap<QuestionId, AnswerOption>>>,
    history: Arc<Mutex<Vec<GradingReport>>>,
}

impl InMemoryQuizBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a question and its correct option to the bank.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Connection` if the backing store is poisoned.
    pub fn seed_question(
        &self,
        question: Question,
        correct: AnswerOption,
    ) -> Result<(), ProviderError> {
        let mut key = self
            .answer_key
            .lock()
            .map_err(|e| ProviderError::Connection(e.to_string()))?;
        let mut questions = self
            .questions
            .lock()
            .map_err(|e| ProviderError::Connection(e.to_string()))?;
        key.insert(question.id(), correct);
        questions.push(question);
        Ok(())
    }
}

#[async_trait]
impl QuestionProvider for InMemoryQuizBackend {
    async fn fetch_quiz_questions(&self) -> Result<Vec<Question>, ProviderError> {
        let guard = self
            .questions
            .lock()
            .map_err(|e| ProviderError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }
}

#[async_trait]
impl GradingService for InMemoryQuizBackend {
    async fn submit(
        &self,
        answers: &[Answer],
        time_taken: &str,
    ) -> Result<GradingReport, ProviderError> {
        let key = self
            .answer_key
            .lock()
            .map_err(|e| ProviderError::Connection(e.to_string()))?;

        let total = key.len() as u32;
        let mut results = Vec::with_capacity(answers.len());
        for answer in answers {
            let Some(correct) = key.get(&answer.question_id).copied() else {
                // The server ignores answers to questions it no longer knows.
                continue;
            };
            results.push(QuestionResult {
                question_id: answer.question_id,
                selected_option: answer.selected,
                correct_option: correct,
                is_correct: answer.selected == correct,
            });
        }

        let correct_count = results.iter().filter(|r| r.is_correct).count() as u32;
        let score_percent = if total == 0 {
            0.0
        } else {
            (f64::from(correct_count) / f64::from(total) * 100.0).round()
        };

        let report = GradingReport {
            total_questions: total,
            correct_count,
            score_percent,
            time_taken: time_taken.to_string(),
            results,
        };

        let mut history = self
            .history
            .lock()
            .map_err(|e| ProviderError::Connection(e.to_string()))?;
        history.push(report.clone());

        Ok(report)
    }
}

#[async_trait]
impl QuizHistory for InMemoryQuizBackend {
    async fn fetch_quiz_history(&self) -> Result<Vec<GradingReport>, ProviderError> {
        let guard = self
            .history
            .lock()
            .map_err(|e| ProviderError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }
}

/// Aggregates the quiz collaborators behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct QuizBackend {
    pub questions: Arc<dyn QuestionProvider>,
    pub grader: Arc<dyn GradingService>,
    pub history: Arc<dyn QuizHistory>,
}

impl QuizBackend {
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_in_memory(InMemoryQuizBackend::new())
    }

    #[must_use]
    pub fn from_in_memory(backend: InMemoryQuizBackend) -> Self {
        let questions: Arc<dyn QuestionProvider> = Arc::new(backend.clone());
        let grader: Arc<dyn GradingService> = Arc::new(backend.clone());
        let history: Arc<dyn QuizHistory> = Arc::new(backend);
        Self {
            questions,
            grader,
            history,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
