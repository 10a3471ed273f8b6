use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::recommend::WRITING_TONES;

#[derive(Debug, Serialize, ToSchema)]
pub struct ListTonesResponse {
    pub tones: Vec<&'static str>,
}

impl IntoResponse for ListTonesResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Preset writing tones for a reading list.
#[utoipa::path(
    get,
    path = "/reading-list/tones",
    tag = "reading-list",
    responses((status = 200, description = "Preset tones", body = ListTonesResponse))
)]
pub async fn list_tones() -> ListTonesResponse {
    ListTonesResponse {
        tones: WRITING_TONES.to_vec(),
    }
}
