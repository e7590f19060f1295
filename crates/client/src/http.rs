use std::env;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use quiz_core::model::{Answer, AnswerOption, GradingReport, Question, QuestionId, QuestionResult};

use crate::provider::{GradingService, ProviderError, QuestionProvider, QuizHistory};

//
// ─── CONFIG ────────────────────────────────────────────────────────────────────
//

#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub base_url: Url,
    pub bearer_token: Option<String>,
}

impl ApiConfig {
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            bearer_token: None,
        }
    }

    #[must_use]
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// Read the API endpoint from `QUIZ_API_BASE_URL` / `QUIZ_API_TOKEN`.
    ///
    /// Returns `None` when the base URL is unset or unparseable.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let base_url = env::var("QUIZ_API_BASE_URL").ok()?;
        let base_url = Url::parse(base_url.trim()).ok()?;
        let bearer_token = env::var("QUIZ_API_TOKEN")
            .ok()
            .filter(|token| !token.trim().is_empty());
        Some(Self {
            base_url,
            bearer_token,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url.as_str().trim_end_matches('/'))
    }
}

//
// ─── HTTP ADAPTER ──────────────────────────────────────────────────────────────
//

/// Reqwest-backed implementation of the quiz collaborators.
#[derive(Clone)]
pub struct HttpQuizApi {
    client: Client,
    config: ApiConfig,
}

impl HttpQuizApi {
    #[must_use]
    pub fn new(config: ApiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.decorate(self.client.get(self.config.endpoint(path)))
    }

    fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.decorate(self.client.post(self.config.endpoint(path)))
    }

    fn decorate(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.bearer_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ProviderError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ProviderError::Status(status.as_u16()));
    }
    response
        .json::<T>()
        .await
        .map_err(|e| ProviderError::Decode(e.to_string()))
}

#[async_trait]
impl QuestionProvider for HttpQuizApi {
    async fn fetch_quiz_questions(&self) -> Result<Vec<Question>, ProviderError> {
        let response = self
            .get("quiz/start")
            .send()
            .await
            .map_err(|e| ProviderError::Connection(e.to_string()))?;

        let dtos: Vec<QuestionDto> = read_json(response).await?;
        let questions = dtos
            .into_iter()
            .map(QuestionDto::into_question)
            .collect::<Result<Vec<_>, _>>()?;

        debug!(count = questions.len(), "fetched quiz questions");
        Ok(questions)
    }
}

#[async_trait]
impl GradingService for HttpQuizApi {
    async fn submit(
        &self,
        answers: &[Answer],
        time_taken: &str,
    ) -> Result<GradingReport, ProviderError> {
        let payload = SubmissionRequestDto::new(answers, time_taken);
        let response = self
            .post("quiz/submit")
            .json(&payload)
            .send()
            .await
            .map_err(|e| ProviderError::Connection(e.to_string()))?;

        let dto: SubmissionResponseDto = read_json(response).await?;
        debug!(score = dto.score, "quiz graded");
        Ok(dto.into_report())
    }
}

#[async_trait]
impl QuizHistory for HttpQuizApi {
    async fn fetch_quiz_history(&self) -> Result<Vec<GradingReport>, ProviderError> {
        let response = self
            .get("quiz/history")
            .send()
            .await
            .map_err(|e| ProviderError::Connection(e.to_string()))?;

        let dtos: Vec<SubmissionResponseDto> = read_json(response).await?;
        Ok(dtos
            .into_iter()
            .map(SubmissionResponseDto::into_report)
            .collect())
    }
}

//
// ─── WIRE SHAPES ───────────────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize)]
struct QuestionDto {
    id: u64,
    question_text: String,
    option_a: String,
    option_b: String,
    option_c: String,
    option_d: String,
}

impl QuestionDto {
    fn into_question(self) -> Result<Question, ProviderError> {
        Question::new(
            QuestionId::new(self.id),
            self.question_text,
            [self.option_a, self.option_b, self.option_c, self.option_d],
        )
        .map_err(|e| ProviderError::Decode(e.to_string()))
    }
}

#[derive(Debug, Serialize)]
struct SubmissionRequestDto {
    answers: Vec<AnswerDto>,
    time_taken: String,
}

impl SubmissionRequestDto {
    fn new(answers: &[Answer], time_taken: &str) -> Self {
        Self {
            answers: answers
                .iter()
                .map(|answer| AnswerDto {
                    question_id: answer.question_id,
                    selected_answer: answer.selected,
                })
                .collect(),
            time_taken: time_taken.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct AnswerDto {
    question_id: QuestionId,
    selected_answer: AnswerOption,
}

#[derive(Debug, Deserialize)]
struct SubmissionResponseDto {
    total_questions: u32,
    correct_answers: u32,
    score: f64,
    time_taken: String,
    results: Vec<QuestionResultDto>,
}

impl SubmissionResponseDto {
    fn into_report(self) -> GradingReport {
        GradingReport {
            total_questions: self.total_questions,
            correct_count: self.correct_answers,
            score_percent: self.score,
            time_taken: self.time_taken,
            results: self
                .results
                .into_iter()
                .map(QuestionResultDto::into_result)
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct QuestionResultDto {
    question_id: QuestionId,
    selected_answer: AnswerOption,
    correct_answer: AnswerOption,
    is_correct: bool,
}

impl QuestionResultDto {
    fn into_result(self) -> QuestionResult {
        QuestionResult {
            question_id: self.question_id,
            selected_option: self.selected_answer,
            correct_option: self.correct_answer,
            is_correct: self.is_correct,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
