mod answer;
mod grading;
mod ids;
mod question;

pub use answer::{Answer, AnswerSheet};
pub use grading::{GradingReport, QuestionResult};
pub use ids::{ParseIdError, QuestionId};
pub use question::{AnswerOption, ParseAnswerOptionError, Question, QuestionError};
