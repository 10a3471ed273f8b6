use derivative::Derivative;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::upstream::send_with_single_retry;

mod chat;
mod prompt;

use chat::{ChatRequest, ChatResponse};

/// Shown in place of a recommendation the service could not produce.
pub const RECOMMENDATION_PLACEHOLDER: &str = "A recommendation could not be generated.";

pub const MIN_READING_LIST_CHARS: u32 = 100;
pub const MAX_READING_LIST_CHARS: u32 = 3000;
pub const DEFAULT_READING_LIST_CHARS: u32 = 1000;

/// Writing tones offered to the user. Any other free-form tone is accepted as well.
pub const WRITING_TONES: &[&str] = &[
    "a neutral and objective text",
    "a concise, easy-to-follow text",
    "a friendly, approachable text",
    "a text for general readers that avoids jargon",
    "a carefully worded, precise text",
    "a text with a touch of humor",
    "a text with simple grammar",
    "an engaging text that makes the subject interesting",
    "a text with concrete, vivid examples",
    "a warm text that conveys feelings and thoughts",
    "a trustworthy text that cites its sources",
    "a text with catchy titles and subtitles",
    "a text that explains with statistics and figures",
    "a logical text that presents an original point of view",
    "an explanatory text that goes from problem to solution",
    "a text focused on current, newsworthy topics",
    "a light, entertaining text",
    "an in-depth text tailored to the reader's interests",
    "a text built around profiles and interviews",
];

/// What the user wants to learn and how far.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, ToSchema, Validate,
)]
pub struct LearnerProfile {
    #[validate(length(min = 1, max = 200, message = "Must be between 1 and 200 characters long"))]
    pub topic: String,
    #[serde(default)]
    #[validate(length(max = 500, message = "Must be at most 500 characters long"))]
    pub current_level: String,
    #[serde(default)]
    #[validate(length(max = 500, message = "Must be at most 500 characters long"))]
    pub target_level: String,
    #[serde(default)]
    #[validate(length(max = 1000, message = "Must be at most 1000 characters long"))]
    pub constraints: String,
}

#[derive(Debug, thiserror::Error)]
pub enum RecommendError {
    #[error("Generation API key is not configured")]
    MissingCredential,
    #[error("Generation service is unavailable: {reason}")]
    Unavailable { reason: String },
}

impl RecommendError {
    fn unavailable(reason: impl ToString) -> Self {
        RecommendError::Unavailable {
            reason: reason.to_string(),
        }
    }
}

/// Client of an OpenAI-compatible text-generation service.
#[derive(Derivative, Clone)]
#[derivative(Debug)]
pub struct Recommender {
    base_url: String,
    model: String,
    #[derivative(Debug(format_with = "crate::utils::mask_fmt"))]
    api_key: Option<String>,
    http_client: reqwest::Client,
}

impl Recommender {
    pub fn new(
        base_url: String,
        model: String,
        api_key: Option<String>,
        http_client: reqwest::Client,
    ) -> Self {
        let api_key = api_key.filter(|key| !key.trim().is_empty());

        Self {
            base_url,
            model,
            api_key,
            http_client,
        }
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    /// Explains why `book_title` suits the learner.
    #[tracing::instrument(skip(self, profile), fields(topic = %profile.topic))]
    pub async fn recommend(
        &self,
        book_title: &str,
        profile: &LearnerProfile,
    ) -> Result<String, RecommendError> {
        self.complete(&prompt::recommendation(book_title, profile))
            .await
    }

    /// Asks for three ranked books about `topic`, written in `tone`.
    #[tracing::instrument(skip(self))]
    pub async fn reading_list(
        &self,
        topic: &str,
        tone: &str,
        max_chars: u32,
    ) -> Result<String, RecommendError> {
        let max_chars = max_chars.clamp(MIN_READING_LIST_CHARS, MAX_READING_LIST_CHARS);

        self.complete(&prompt::reading_list(topic, tone, max_chars))
            .await
    }

    async fn complete(&self, prompt: &str) -> Result<String, RecommendError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            tracing::warn!("Generation API key missing, refusing to generate");

            RecommendError::MissingCredential
        })?;

        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));

        let request = self
            .http_client
            .post(url)
            .bearer_auth(api_key)
            .json(&ChatRequest::one_shot(&self.model, prompt));

        let response = send_with_single_retry(request).await.map_err(|err| {
            let err = err.without_url();

            tracing::warn!(%err, "Generation request failed");

            RecommendError::unavailable(err)
        })?;

        let status = response.status();

        if !status.is_success() {
            tracing::warn!(%status, "Generation service returned an error");

            return Err(RecommendError::unavailable(format!(
                "service responded with status {status}"
            )));
        }

        let response = response.json::<ChatResponse>().await.map_err(|err| {
            let err = err.without_url();

            tracing::warn!(%err, "Generation response could not be parsed");

            RecommendError::unavailable(err)
        })?;

        let content = response
            .into_first_content()
            .ok_or_else(|| RecommendError::unavailable("response contained no text"))?;

        tracing::debug!(chars = content.chars().count(), "Generated");

        Ok(content)
    }
}
