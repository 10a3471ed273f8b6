use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::ApiError,
    extractor::{json::ApiJson, validated::Validated},
    recommend::DEFAULT_READING_LIST_CHARS,
    state::ApiState,
    traits::ErrorVerbosityProvider,
};

#[derive(Debug, Deserialize, JsonSchema, ToSchema, Validate)]
pub struct ReadingListBody {
    #[validate(length(min = 1, max = 200, message = "Must be between 1 and 200 characters long"))]
    pub topic: String,
    /// One of the preset tones or any other description of the desired style.
    #[validate(length(min = 1, max = 200, message = "Must be between 1 and 200 characters long"))]
    pub tone: String,
    #[validate(range(min = 100, max = 3000, message = "Must be between 100 and 3000"))]
    pub max_chars: Option<u32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReadingListResponse {
    pub reading_list: String,
}

impl IntoResponse for ReadingListResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Ask for three ranked books about a topic.
#[utoipa::path(
    post,
    path = "/reading-list",
    tag = "reading-list",
    request_body = ReadingListBody,
    responses(
        (status = 200, description = "Ranked reading list", body = ReadingListResponse),
        (status = 422, description = "Invalid request", body = ApiError),
        (status = 502, description = "Generation service unavailable", body = ApiError),
        (status = 503, description = "Generation API key missing", body = ApiError),
    )
)]
pub async fn generate_reading_list(
    State(state): State<ApiState>,
    Validated(ApiJson(body)): Validated<ApiJson<ReadingListBody>>,
) -> Result<ReadingListResponse, ApiError> {
    let reading_list = state
        .recommender()
        .reading_list(
            body.topic.trim(),
            body.tone.trim(),
            body.max_chars.unwrap_or(DEFAULT_READING_LIST_CHARS),
        )
        .await
        .map_err(|err| ApiError::from_recommend_error(state.error_verbosity(), err))?;

    Ok(ReadingListResponse { reading_list })
}
