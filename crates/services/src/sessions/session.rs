use chrono::{DateTime, Utc};
use std::fmt;

use quiz_core::model::{Answer, AnswerOption, AnswerSheet, GradingReport, Question, QuestionId};
use quiz_core::timer::QuizTimer;

use super::progress::QuizProgress;
use crate::error::SessionError;
use crate::review::{self, ReviewEntry};

//
// ─── LIFECYCLE ─────────────────────────────────────────────────────────────────
//

/// Submission lifecycle of a quiz attempt.
///
/// `NotStarted → InProgress → Submitting → Completed`, plus `restart` from
/// any phase back to `NotStarted`. No other transitions exist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QuizPhase {
    #[default]
    NotStarted,
    InProgress,
    Submitting,
    Completed,
}

/// Immutable view of the attempt handed to the grading service.
///
/// Captured at the moment submission begins; later ledger writes do not
/// affect it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionSnapshot {
    pub answers: Vec<Answer>,
    pub time_taken: String,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-memory state machine for one quiz attempt.
///
/// Owns the loaded question sequence, the navigation cursor, the answer
/// sheet, the elapsed-time counter and the submission lifecycle. All
/// mutation happens through discrete calls from a single owner; the one
/// waiting point (grading) is modeled as `begin_submission` followed by
/// exactly one of `complete_submission` / `abort_submission`.
#[derive(Clone, Default, PartialEq)]
pub struct QuizSession {
    questions: Vec<Question>,
    cursor: usize,
    answers: AnswerSheet,
    timer: QuizTimer,
    started_at: Option<DateTime<Utc>>,
    phase: QuizPhase,
    report: Option<GradingReport>,
}

impl QuizSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    #[must_use]
    pub fn report(&self) -> Option<&GradingReport> {
        self.report.as_ref()
    }

    #[must_use]
    pub fn elapsed_seconds(&self) -> u64 {
        self.timer.elapsed_seconds()
    }

    /// Elapsed time rendered as `MM:SS`.
    #[must_use]
    pub fn elapsed_display(&self) -> String {
        self.timer.format()
    }

    /// True while the host should be delivering one-second ticks.
    ///
    /// The host starts its interval exactly when `start` succeeds and stops
    /// it on any transition away from `InProgress`.
    #[must_use]
    pub fn timer_running(&self) -> bool {
        self.phase == QuizPhase::InProgress
    }

    //
    // ─── SETUP ─────────────────────────────────────────────────────────────────
    //

    /// Replace the question sequence for the next attempt.
    ///
    /// Resets the cursor and clears the answer sheet. Legal from any phase
    /// and does not change the phase itself.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` when given no questions; a quiz cannot
    /// be taken over an empty set.
    pub fn load_questions(&mut self, questions: Vec<Question>) -> Result<(), SessionError> {
        if questions.is_empty() {
            return Err(SessionError::Empty);
        }
        self.questions = questions;
        self.cursor = 0;
        self.answers.clear();
        Ok(())
    }

    /// Begin the attempt: zero the clock, clear answers and any prior
    /// report, move to `InProgress`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AlreadyStarted` outside `NotStarted` (the
    /// clock is never silently restarted) and
    /// `SessionError::NoQuestionsLoaded` when nothing has been loaded.
    pub fn start(&mut self, started_at: DateTime<Utc>) -> Result<(), SessionError> {
        if self.phase != QuizPhase::NotStarted {
            return Err(SessionError::AlreadyStarted);
        }
        if self.questions.is_empty() {
            return Err(SessionError::NoQuestionsLoaded);
        }

        self.cursor = 0;
        self.answers.clear();
        self.timer.reset();
        self.report = None;
        self.started_at = Some(started_at);
        self.phase = QuizPhase::InProgress;
        Ok(())
    }

    /// Clear everything and return to `NotStarted`. Legal from any phase.
    pub fn restart(&mut self) {
        *self = Self::default();
    }

    //
    // ─── NAVIGATION ────────────────────────────────────────────────────────────
    //

    /// Jump to a question by index.
    ///
    /// Out-of-range requests are silently ignored; navigation favors UI
    /// robustness over strict validation.
    pub fn go_to_question(&mut self, index: usize) {
        if index < self.questions.len() {
            self.cursor = index;
        }
    }

    /// Advance the cursor, stopping at the last question.
    pub fn next_question(&mut self) {
        if self.cursor + 1 < self.questions.len() {
            self.cursor += 1;
        }
    }

    /// Move the cursor back, stopping at the first question.
    pub fn previous_question(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.cursor)
    }

    //
    // ─── ANSWERS ───────────────────────────────────────────────────────────────
    //

    /// Record (or replace) the pick for a question.
    ///
    /// There is no phase guard here: re-answering is allowed at any time,
    /// and the submission snapshot is cloned, so late writes cannot reach
    /// an in-flight grading call.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnknownQuestion` when the id is not among the
    /// loaded questions.
    pub fn record_answer(
        &mut self,
        question_id: QuestionId,
        selected: AnswerOption,
    ) -> Result<(), SessionError> {
        if !self.questions.iter().any(|q| q.id() == question_id) {
            return Err(SessionError::UnknownQuestion(question_id));
        }
        self.answers.record(question_id, selected);
        Ok(())
    }

    #[must_use]
    pub fn selected_answer(&self, question_id: QuestionId) -> Option<AnswerOption> {
        self.answers.selected(question_id)
    }

    /// True iff every loaded question has a recorded pick.
    ///
    /// This is the single predicate gating submission.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.questions.is_empty()
            && self
                .answers
                .is_complete_for(self.questions.iter().map(Question::id))
    }

    /// Returns a summary of the current attempt progress.
    #[must_use]
    pub fn progress(&self) -> QuizProgress {
        let total = self.questions.len();
        let answered = self.answers.len();
        QuizProgress {
            total,
            answered,
            remaining: total.saturating_sub(answered),
            current_index: self.cursor,
            is_complete: self.is_complete(),
        }
    }

    //
    // ─── CLOCK ─────────────────────────────────────────────────────────────────
    //

    /// Deliver one elapsed second.
    ///
    /// Suppressed outside `InProgress`: a submission in flight or a finished
    /// attempt never accumulates time, even if the host keeps ticking.
    pub fn tick(&mut self) {
        if self.phase == QuizPhase::InProgress {
            self.timer.tick();
        }
    }

    //
    // ─── SUBMISSION ────────────────────────────────────────────────────────────
    //

    /// Validate completeness and move to `Submitting`.
    ///
    /// The returned snapshot (cloned answer sheet plus `MM:SS` at the moment
    /// of the call) is what the caller hands to the grading service.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotInProgress` outside `InProgress`, and
    /// `SessionError::Incomplete` when unanswered questions remain; neither
    /// performs a transition.
    pub fn begin_submission(&mut self) -> Result<SubmissionSnapshot, SessionError> {
        if self.phase != QuizPhase::InProgress {
            return Err(SessionError::NotInProgress);
        }
        if !self.is_complete() {
            return Err(SessionError::Incomplete {
                answered: self.answers.len(),
                total: self.questions.len(),
            });
        }

        self.phase = QuizPhase::Submitting;
        Ok(SubmissionSnapshot {
            answers: self.answers.answers().to_vec(),
            time_taken: self.timer.format(),
        })
    }

    /// Attach the grading report and move to `Completed`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotSubmitting` unless a submission is in
    /// flight.
    pub fn complete_submission(&mut self, report: GradingReport) -> Result<(), SessionError> {
        if self.phase != QuizPhase::Submitting {
            return Err(SessionError::NotSubmitting);
        }
        self.report = Some(report);
        self.phase = QuizPhase::Completed;
        Ok(())
    }

    /// Roll a failed grading call back to `InProgress`.
    ///
    /// Answers and elapsed time are exactly as they were when submission
    /// began; a failed submission never loses user progress.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotSubmitting` unless a submission is in
    /// flight.
    pub fn abort_submission(&mut self) -> Result<(), SessionError> {
        if self.phase != QuizPhase::Submitting {
            return Err(SessionError::NotSubmitting);
        }
        self.phase = QuizPhase::InProgress;
        Ok(())
    }

    /// Graded results joined back onto the held questions for review.
    ///
    /// `Some` only once the attempt is `Completed`.
    #[must_use]
    pub fn review(&self) -> Option<Vec<ReviewEntry<'_>>> {
        self.report
            .as_ref()
            .map(|report| review::reconcile(&self.questions, report))
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("questions_len", &self.questions.len())
            .field("cursor", &self.cursor)
            .field("answered", &self.answers.len())
            .field("elapsed_seconds", &self.timer.elapsed_seconds())
            .field("phase", &self.phase)
            .field("has_report", &self.report.is_some())
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::time::fixed_now;

    fn build_question(id: u64) -> Question {
        Question::new(
            QuestionId::new(id),
            format!("Question {id}?"),
            ["one", "two", "three", "four"].map(str::to_string),
        )
        .unwrap()
    }

    fn loaded_session(count: u64) -> QuizSession {
        let mut session = QuizSession::new();
        session
            .load_questions((1..=count).map(build_question).collect())
            .unwrap();
        session
    }

    fn started_session(count: u64) -> QuizSession {
        let mut session = loaded_session(count);
        session.start(fixed_now()).unwrap();
        session
    }

    #[test]
    fn load_rejects_empty_set() {
        let mut session = QuizSession::new();
        let err = session.load_questions(Vec::new()).unwrap_err();
        assert!(matches!(err, SessionError::Empty));
        assert_eq!(session.phase(), QuizPhase::NotStarted);
    }

    #[test]
    fn load_replaces_questions_and_clears_answers() {
        let mut session = started_session(2);
        session
            .record_answer(QuestionId::new(1), AnswerOption::A)
            .unwrap();
        session.go_to_question(1);

        session
            .load_questions(vec![build_question(7), build_question(8), build_question(9)])
            .unwrap();

        assert_eq!(session.question_count(), 3);
        assert_eq!(session.cursor(), 0);
        assert_eq!(session.selected_answer(QuestionId::new(1)), None);
        // Loading alone never changes the lifecycle.
        assert_eq!(session.phase(), QuizPhase::InProgress);
    }

    #[test]
    fn start_requires_loaded_questions() {
        let mut session = QuizSession::new();
        let err = session.start(fixed_now()).unwrap_err();
        assert!(matches!(err, SessionError::NoQuestionsLoaded));
    }

    #[test]
    fn start_is_rejected_once_in_progress() {
        let mut session = started_session(2);
        session.tick();

        let err = session.start(fixed_now()).unwrap_err();
        assert!(matches!(err, SessionError::AlreadyStarted));
        // The rejected call must not have restarted the clock.
        assert_eq!(session.elapsed_seconds(), 1);
    }

    #[test]
    fn start_stamps_started_at_and_runs_timer() {
        let session = started_session(1);
        assert_eq!(session.started_at(), Some(fixed_now()));
        assert_eq!(session.phase(), QuizPhase::InProgress);
        assert!(session.timer_running());
    }

    #[test]
    fn navigation_clamps_at_both_ends() {
        let mut session = started_session(3);

        session.previous_question();
        assert_eq!(session.cursor(), 0);

        session.next_question();
        session.next_question();
        assert_eq!(session.cursor(), 2);
        session.next_question();
        assert_eq!(session.cursor(), 2);

        session.previous_question();
        assert_eq!(session.cursor(), 1);
    }

    #[test]
    fn go_to_ignores_out_of_range() {
        let mut session = started_session(3);
        session.go_to_question(2);
        assert_eq!(session.cursor(), 2);

        session.go_to_question(3);
        assert_eq!(session.cursor(), 2);
        session.go_to_question(usize::MAX);
        assert_eq!(session.cursor(), 2);
    }

    #[test]
    fn current_question_follows_cursor() {
        let mut session = started_session(2);
        assert_eq!(
            session.current_question().map(Question::id),
            Some(QuestionId::new(1))
        );
        session.next_question();
        assert_eq!(
            session.current_question().map(Question::id),
            Some(QuestionId::new(2))
        );
    }

    #[test]
    fn record_answer_rejects_unknown_question() {
        let mut session = started_session(2);
        let err = session
            .record_answer(QuestionId::new(99), AnswerOption::A)
            .unwrap_err();
        assert!(matches!(
            err,
            SessionError::UnknownQuestion(id) if id == QuestionId::new(99)
        ));
        assert_eq!(session.progress().answered, 0);
    }

    #[test]
    fn reanswering_replaces_instead_of_duplicating() {
        let mut session = started_session(2);
        session
            .record_answer(QuestionId::new(1), AnswerOption::A)
            .unwrap();
        session
            .record_answer(QuestionId::new(1), AnswerOption::D)
            .unwrap();

        assert_eq!(session.progress().answered, 1);
        assert_eq!(
            session.selected_answer(QuestionId::new(1)),
            Some(AnswerOption::D)
        );
    }

    #[test]
    fn tick_only_advances_in_progress() {
        let mut session = loaded_session(1);
        session.tick();
        assert_eq!(session.elapsed_seconds(), 0);

        session.start(fixed_now()).unwrap();
        session.tick();
        session.tick();
        assert_eq!(session.elapsed_seconds(), 2);

        session
            .record_answer(QuestionId::new(1), AnswerOption::A)
            .unwrap();
        session.begin_submission().unwrap();
        session.tick();
        assert_eq!(session.elapsed_seconds(), 2);
        assert!(!session.timer_running());
    }

    #[test]
    fn incomplete_submission_is_rejected_without_transition() {
        let mut session = started_session(3);
        session
            .record_answer(QuestionId::new(1), AnswerOption::A)
            .unwrap();
        session
            .record_answer(QuestionId::new(2), AnswerOption::B)
            .unwrap();

        let err = session.begin_submission().unwrap_err();
        assert!(matches!(
            err,
            SessionError::Incomplete {
                answered: 2,
                total: 3
            }
        ));
        assert_eq!(session.phase(), QuizPhase::InProgress);
    }

    #[test]
    fn submission_before_start_is_rejected() {
        let mut session = loaded_session(1);
        let err = session.begin_submission().unwrap_err();
        assert!(matches!(err, SessionError::NotInProgress));
        assert_eq!(session.phase(), QuizPhase::NotStarted);
    }

    #[test]
    fn full_submission_lifecycle() {
        let mut session = started_session(3);
        session
            .record_answer(QuestionId::new(1), AnswerOption::A)
            .unwrap();
        session
            .record_answer(QuestionId::new(2), AnswerOption::B)
            .unwrap();
        assert!(!session.is_complete());
        assert!(session.begin_submission().is_err());

        session
            .record_answer(QuestionId::new(3), AnswerOption::C)
            .unwrap();
        assert!(session.is_complete());

        let snapshot = session.begin_submission().unwrap();
        assert_eq!(session.phase(), QuizPhase::Submitting);
        assert_eq!(snapshot.time_taken, "00:00");
        let picks: Vec<_> = snapshot
            .answers
            .iter()
            .map(|a| (a.question_id.value(), a.selected))
            .collect();
        assert_eq!(
            picks,
            vec![
                (1, AnswerOption::A),
                (2, AnswerOption::B),
                (3, AnswerOption::C)
            ]
        );

        let report = GradingReport {
            total_questions: 3,
            correct_count: 2,
            score_percent: 67.0,
            time_taken: snapshot.time_taken.clone(),
            results: Vec::new(),
        };
        session.complete_submission(report).unwrap();
        assert_eq!(session.phase(), QuizPhase::Completed);
        assert_eq!(session.report().unwrap().correct_count, 2);
    }

    #[test]
    fn snapshot_is_isolated_from_later_writes() {
        let mut session = started_session(1);
        session
            .record_answer(QuestionId::new(1), AnswerOption::A)
            .unwrap();

        let snapshot = session.begin_submission().unwrap();
        session.abort_submission().unwrap();
        session
            .record_answer(QuestionId::new(1), AnswerOption::D)
            .unwrap();

        assert_eq!(snapshot.answers[0].selected, AnswerOption::A);
    }

    #[test]
    fn abort_round_trips_to_in_progress() {
        let mut session = started_session(2);
        for id in 1..=2 {
            session
                .record_answer(QuestionId::new(id), AnswerOption::B)
                .unwrap();
        }
        session.tick();
        session.tick();
        session.tick();

        let before = session.clone();
        session.begin_submission().unwrap();
        session.abort_submission().unwrap();

        assert_eq!(session, before);
        assert_eq!(session.phase(), QuizPhase::InProgress);
        assert_eq!(session.elapsed_seconds(), 3);
    }

    #[test]
    fn complete_and_abort_require_a_submission_in_flight() {
        let mut session = started_session(1);
        assert!(matches!(
            session.abort_submission().unwrap_err(),
            SessionError::NotSubmitting
        ));

        let report = GradingReport {
            total_questions: 1,
            correct_count: 1,
            score_percent: 100.0,
            time_taken: "00:01".into(),
            results: Vec::new(),
        };
        assert!(matches!(
            session.complete_submission(report).unwrap_err(),
            SessionError::NotSubmitting
        ));
    }

    #[test]
    fn restart_matches_a_fresh_session() {
        let mut session = started_session(2);
        session
            .record_answer(QuestionId::new(1), AnswerOption::A)
            .unwrap();
        session.tick();
        session.next_question();

        session.restart();

        assert_eq!(session, QuizSession::new());
        assert_eq!(session.phase(), QuizPhase::NotStarted);
        assert_eq!(session.elapsed_seconds(), 0);
    }

    #[test]
    fn restart_from_completed_clears_the_report() {
        let mut session = started_session(1);
        session
            .record_answer(QuestionId::new(1), AnswerOption::A)
            .unwrap();
        session.begin_submission().unwrap();
        session
            .complete_submission(GradingReport {
                total_questions: 1,
                correct_count: 1,
                score_percent: 100.0,
                time_taken: "00:00".into(),
                results: Vec::new(),
            })
            .unwrap();

        session.restart();
        assert!(session.report().is_none());
        assert!(session.review().is_none());
        assert_eq!(session, QuizSession::new());
    }

    #[test]
    fn progress_tracks_counts() {
        let mut session = started_session(3);
        session
            .record_answer(QuestionId::new(2), AnswerOption::C)
            .unwrap();
        session.go_to_question(1);

        let progress = session.progress();
        assert_eq!(progress.total, 3);
        assert_eq!(progress.answered, 1);
        assert_eq!(progress.remaining, 2);
        assert_eq!(progress.current_index, 1);
        assert!(!progress.is_complete);
    }
}
