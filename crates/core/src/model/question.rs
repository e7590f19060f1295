use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::ids::QuestionId;

//
// ─── ANSWER OPTION ─────────────────────────────────────────────────────────────
//

/// One of the four answer labels a question offers.
///
/// Interior APIs only ever accept this enum; an out-of-range label can exist
/// solely as an unparsed string at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnswerOption {
    A,
    B,
    C,
    D,
}

impl AnswerOption {
    /// All options in presentation order.
    pub const ALL: [AnswerOption; 4] = [Self::A, Self::B, Self::C, Self::D];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
        }
    }

    /// Position of the option within a question's option list.
    #[must_use]
    pub fn index(&self) -> usize {
        match self {
            Self::A => 0,
            Self::B => 1,
            Self::C => 2,
            Self::D => 3,
        }
    }
}

impl fmt::Display for AnswerOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an answer label outside `A`-`D`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid answer option: {0:?}")]
pub struct ParseAnswerOptionError(pub String);

impl FromStr for AnswerOption {
    type Err = ParseAnswerOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" | "a" => Ok(Self::A),
            "B" | "b" => Ok(Self::B),
            "C" | "c" => Ok(Self::C),
            "D" | "d" => Ok(Self::D),
            other => Err(ParseAnswerOptionError(other.to_string())),
        }
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A multiple-choice question as the quiz taker sees it.
///
/// The correct answer is withheld by the server until grading, so it never
/// appears here. Immutable once constructed; the only way in is the
/// validating constructor, wire shapes stay in the adapter layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    prompt: String,
    options: [String; 4],
}

impl Question {
    /// Build a question, validating that the prompt and every option carry text.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyPrompt` or `QuestionError::EmptyOption`
    /// when a field is blank.
    pub fn new(
        id: QuestionId,
        prompt: impl Into<String>,
        options: [String; 4],
    ) -> Result<Self, QuestionError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        for (slot, text) in AnswerOption::ALL.iter().zip(options.iter()) {
            if text.trim().is_empty() {
                return Err(QuestionError::EmptyOption(*slot));
            }
        }

        Ok(Self {
            id,
            prompt,
            options,
        })
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Text of the given option.
    #[must_use]
    pub fn option(&self, option: AnswerOption) -> &str {
        &self.options[option.index()]
    }

    /// Options paired with their labels, in `A`-`D` order.
    pub fn options(&self) -> impl Iterator<Item = (AnswerOption, &str)> {
        AnswerOption::ALL
            .iter()
            .map(|label| (*label, self.option(*label)))
    }
}

//
// ─── QUESTION VALIDATION ERRORS ────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QuestionError {
    #[error("question prompt is empty")]
    EmptyPrompt,

    #[error("option {0} is empty")]
    EmptyOption(AnswerOption),
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
