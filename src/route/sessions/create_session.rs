use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{session::SessionId, state::ApiState};

#[derive(Debug, Serialize, ToSchema)]
pub struct CreateSessionResponse {
    #[schema(value_type = String, format = Uuid)]
    pub session_id: SessionId,
}

impl IntoResponse for CreateSessionResponse {
    fn into_response(self) -> Response {
        (StatusCode::CREATED, Json(self)).into_response()
    }
}

/// Start a new session with an empty shelf and level log.
#[utoipa::path(
    post,
    path = "/sessions",
    tag = "sessions",
    responses((status = 201, description = "Session created", body = CreateSessionResponse))
)]
pub async fn create_session(State(state): State<ApiState>) -> CreateSessionResponse {
    let session_id = state.sessions().create().await;

    CreateSessionResponse { session_id }
}
