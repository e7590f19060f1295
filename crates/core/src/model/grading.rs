use serde::{Deserialize, Serialize};

use crate::model::ids::QuestionId;
use crate::model::question::AnswerOption;

/// Graded outcome for a single question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionResult {
    pub question_id: QuestionId,
    pub selected_option: AnswerOption,
    pub correct_option: AnswerOption,
    pub is_correct: bool,
}

/// Server-computed grading of one submitted quiz attempt.
///
/// Produced by the grading service; immutable once attached to a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradingReport {
    pub total_questions: u32,
    pub correct_count: u32,
    pub score_percent: f64,
    pub time_taken: String,
    pub results: Vec<QuestionResult>,
}
