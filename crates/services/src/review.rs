//! Joins a grading report back onto the locally held question set.

use quiz_core::model::{GradingReport, Question, QuestionResult};

/// One graded entry paired with its question, ready for display.
///
/// Borrowed from the session that produced it; nothing here is persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReviewEntry<'a> {
    pub question: &'a Question,
    pub result: &'a QuestionResult,
}

/// Join each graded entry to the matching question by id.
///
/// Output follows the order of `report.results`, not the question order. An
/// entry whose question is not held locally is dropped: the server is the
/// grading authority, so the mismatch is a display-only inconsistency
/// rather than a failure.
#[must_use]
pub fn reconcile<'a>(
    questions: &'a [Question],
    report: &'a GradingReport,
) -> Vec<ReviewEntry<'a>> {
    report
        .results
        .iter()
        .filter_map(|result| {
            questions
                .iter()
                .find(|question| question.id() == result.question_id)
                .map(|question| ReviewEntry { question, result })
        })
        .collect()
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
