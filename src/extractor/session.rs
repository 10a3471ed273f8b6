use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use serde::Deserialize;

use crate::{
    error::{ApiError, SessionNotFoundError},
    session::{SessionHandle, SessionId},
    state::ApiState,
    traits::ErrorVerbosityProvider,
};

use super::path::ApiPath;

#[derive(Debug, Deserialize)]
struct SessionPath {
    session_id: SessionId,
}

/// Resolves the `:session_id` path segment to a live session.
pub struct CurrentSession {
    pub id: SessionId,
    pub handle: SessionHandle,
}

#[async_trait]
impl FromRequestParts<ApiState> for CurrentSession {
    type Rejection = ApiError;

    #[tracing::instrument(name = "session_extractor", skip_all)]
    async fn from_request_parts(
        parts: &mut Parts,
        state: &ApiState,
    ) -> Result<Self, Self::Rejection> {
        let ApiPath(SessionPath { session_id }) =
            ApiPath::<SessionPath>::from_request_parts(parts, state).await?;

        let handle = state.sessions().get(&session_id).await.ok_or_else(|| {
            tracing::warn!(%session_id, "Unknown session");

            SessionNotFoundError::new(state.error_verbosity(), session_id)
        })?;

        Ok(CurrentSession {
            id: session_id,
            handle,
        })
    }
}
