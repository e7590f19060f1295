use serde::{Deserialize, Serialize};

use crate::model::ids::QuestionId;
use crate::model::question::AnswerOption;

//
// ─── ANSWER ────────────────────────────────────────────────────────────────────
//

/// The quiz taker's pick for a single question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub question_id: QuestionId,
    pub selected: AnswerOption,
}

//
// ─── ANSWER SHEET ──────────────────────────────────────────────────────────────
//

/// Per-question answer record for one quiz attempt.
///
/// Keeps at most one entry per `QuestionId`; recording again for the same
/// question replaces the earlier pick. Entry order is insertion order and
/// carries no meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerSheet {
    entries: Vec<Answer>,
}

impl AnswerSheet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a pick, replacing any earlier pick for the same question.
    pub fn record(&mut self, question_id: QuestionId, selected: AnswerOption) {
        let answer = Answer {
            question_id,
            selected,
        };
        match self
            .entries
            .iter_mut()
            .find(|entry| entry.question_id == question_id)
        {
            Some(existing) => *existing = answer,
            None => self.entries.push(answer),
        }
    }

    /// The pick for a question, if one was recorded.
    #[must_use]
    pub fn selected(&self, question_id: QuestionId) -> Option<AnswerOption> {
        self.entries
            .iter()
            .find(|entry| entry.question_id == question_id)
            .map(|entry| entry.selected)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True iff every given question has a recorded pick.
    pub fn is_complete_for<I>(&self, question_ids: I) -> bool
    where
        I: IntoIterator<Item = QuestionId>,
    {
        question_ids
            .into_iter()
            .all(|id| self.selected(id).is_some())
    }

    #[must_use]
    pub fn answers(&self) -> &[Answer] {
        &self.entries
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
