#![forbid(unsafe_code)]

pub mod http;
pub mod provider;

pub use http::{ApiConfig, HttpQuizApi};
pub use provider::{
    GradingService, InMemoryQuizBackend, ProviderError, QuestionProvider, QuizBackend, QuizHistory,
};
