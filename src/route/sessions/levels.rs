use std::collections::BTreeMap;

use axum::{
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
    levels::{LearningArea, LevelLog, LevelRecord, MAX_LEVEL, MIN_LEVEL},
};

fn validate_levels(levels: &BTreeMap<LearningArea, u8>) -> Result<(), validator::ValidationError> {
    if levels
        .values()
        .all(|level| (MIN_LEVEL..=MAX_LEVEL).contains(level))
    {
        return Ok(());
    }

    let mut error = validator::ValidationError::new("level_range");
    error.message = Some("Every level must be between 1 and 5".into());

    Err(error)
}

#[derive(Debug, Deserialize, JsonSchema, ToSchema, Validate)]
pub struct RecordLevelsBody {
    /// Areas left out are recorded at level 3.
    #[serde(default)]
    #[validate(custom(function = "validate_levels"))]
    pub levels: BTreeMap<LearningArea, u8>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LevelsResponse {
    pub latest: Option<LevelRecord>,
    /// Newest first.
    pub history: Vec<LevelRecord>,
}

impl From<&LevelLog> for LevelsResponse {
    fn from(log: &LevelLog) -> Self {
        Self {
            latest: log.latest().cloned(),
            history: log.history().iter().rev().cloned().collect(),
        }
    }
}

impl IntoResponse for LevelsResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Self-assessed level history of this session.
#[utoipa::path(
    get,
    path = "/sessions/{session_id}/levels",
    tag = "sessions",
    params(("session_id" = Uuid, Path, description = "Session id")),
    responses(
        (status = 200, description = "Level history", body = LevelsResponse),
        (status = 404, description = "Unknown session", body = ApiError),
    )
)]
pub async fn list_levels(session: CurrentSession) -> LevelsResponse {
    LevelsResponse::from(&session.handle.lock().await.levels)
}

/// Record a new self-assessment.
#[utoipa::path(
    post,
    path = "/sessions/{session_id}/levels",
    tag = "sessions",
    params(("session_id" = Uuid, Path, description = "Session id")),
    request_body = RecordLevelsBody,
    responses(
        (status = 200, description = "Level history including the new record", body = LevelsResponse),
        (status = 404, description = "Unknown session", body = ApiError),
        (status = 422, description = "Level out of range", body = ApiError),
    )
)]
pub async fn record_levels(
    session: CurrentSession,
    Validated(ApiJson(body)): Validated<ApiJson<RecordLevelsBody>>,
) -> LevelsResponse {
    let mut session_state = session.handle.lock().await;

    session_state.levels.record(&body.levels);

    tracing::info!(session_id = %session.id, "Levels recorded");

    LevelsResponse::from(&session_state.levels)
}
