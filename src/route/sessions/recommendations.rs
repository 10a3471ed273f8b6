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
    extractor::{json::ApiJson, session::CurrentSession, validated::Validated},
    recommend::{LearnerProfile, RecommendError, RECOMMENDATION_PLACEHOLDER},
    state::ApiState,
    traits::ErrorVerbosityProvider,
};

#[derive(Debug, Deserialize, JsonSchema, ToSchema, Validate)]
pub struct RecommendBookBody {
    #[validate(length(min = 1, max = 500, message = "Must be between 1 and 500 characters long"))]
    pub title: String,
    #[validate(nested)]
    pub profile: LearnerProfile,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RecommendBookResponse {
    pub title: String,
    /// The explanation, or a placeholder if it could not be generated.
    pub recommendation: String,
    /// `false` if `recommendation` is the placeholder.
    pub generated: bool,
    /// `true` if this session already received the same recommendation.
    pub cached: bool,
}

impl IntoResponse for RecommendBookResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Explain why a book fits the learner.
///
/// A generation failure does not fail the request: a placeholder is returned instead.
#[utoipa::path(
    post,
    path = "/sessions/{session_id}/recommendations",
    tag = "sessions",
    params(("session_id" = Uuid, Path, description = "Session id")),
    request_body = RecommendBookBody,
    responses(
        (status = 200, description = "Recommendation or placeholder", body = RecommendBookResponse),
        (status = 404, description = "Unknown session", body = ApiError),
        (status = 503, description = "Generation API key missing", body = ApiError),
    )
)]
pub async fn recommend_book(
    State(state): State<ApiState>,
    session: CurrentSession,
    Validated(ApiJson(body)): Validated<ApiJson<RecommendBookBody>>,
) -> Result<RecommendBookResponse, ApiError> {
    let RecommendBookBody { title, profile } = body;

    let cached = session
        .handle
        .lock()
        .await
        .recommendations
        .get(&title, &profile)
        .map(str::to_string);

    if let Some(recommendation) = cached {
        tracing::debug!(session_id = %session.id, "Recommendation served from memo");

        return Ok(RecommendBookResponse {
            title,
            recommendation,
            generated: true,
            cached: true,
        });
    }

    match state.recommender().recommend(&title, &profile).await {
        Ok(recommendation) => {
            session.handle.lock().await.recommendations.insert(
                title.clone(),
                profile,
                recommendation.clone(),
            );

            Ok(RecommendBookResponse {
                title,
                recommendation,
                generated: true,
                cached: false,
            })
        }
        Err(RecommendError::Unavailable { reason }) => {
            tracing::warn!(session_id = %session.id, %reason, "Recommendation unavailable");

            Ok(RecommendBookResponse {
                title,
                recommendation: RECOMMENDATION_PLACEHOLDER.to_string(),
                generated: false,
                cached: false,
            })
        }
        Err(err @ RecommendError::MissingCredential) => {
            Err(ApiError::from_recommend_error(state.error_verbosity(), err))
        }
    }
}
