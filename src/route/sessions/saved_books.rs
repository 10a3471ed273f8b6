use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    book::BookRecord,
    error::ApiError,
    extractor::{json::ApiJson, query::ApiQuery, session::CurrentSession},
    session::SessionId,
    shelf::{SavedBook, SavedSet},
};

#[derive(Debug, Default, Clone, Copy, Deserialize, JsonSchema, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SavedBooksOrder {
    #[default]
    NewestFirst,
    OldestFirst,
}

#[derive(Debug, Deserialize, JsonSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListSavedBooksQuery {
    /// Defaults to `newest_first`.
    #[serde(default)]
    #[param(inline)]
    pub order: SavedBooksOrder,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SavedBooksResponse {
    #[schema(value_type = String, format = Uuid)]
    pub session_id: SessionId,
    pub books: Vec<SavedBook>,
}

impl SavedBooksResponse {
    fn new(session_id: SessionId, saved: &SavedSet, order: SavedBooksOrder) -> Self {
        let books = match order {
            SavedBooksOrder::NewestFirst => saved.all().iter().rev().cloned().collect(),
            SavedBooksOrder::OldestFirst => saved.all().to_vec(),
        };

        Self { session_id, books }
    }
}

impl IntoResponse for SavedBooksResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// List the books saved in this session.
#[utoipa::path(
    get,
    path = "/sessions/{session_id}/saved",
    tag = "sessions",
    params(
        ("session_id" = Uuid, Path, description = "Session id"),
        ListSavedBooksQuery,
    ),
    responses(
        (status = 200, description = "Saved books", body = SavedBooksResponse),
        (status = 404, description = "Unknown session", body = ApiError),
    )
)]
pub async fn list_saved_books(
    session: CurrentSession,
    ApiQuery(query): ApiQuery<ListSavedBooksQuery>,
) -> SavedBooksResponse {
    let session_state = session.handle.lock().await;

    SavedBooksResponse::new(session.id, &session_state.saved, query.order)
}

#[derive(Debug, Deserialize, JsonSchema, ToSchema)]
pub struct SaveBookBody {
    pub book: BookRecord,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SaveBookResponse {
    /// `false` if an equal book was already saved.
    pub added: bool,
    #[serde(flatten)]
    pub saved: SavedBooksResponse,
}

impl IntoResponse for SaveBookResponse {
    fn into_response(self) -> Response {
        let status = match self.added {
            true => StatusCode::CREATED,
            false => StatusCode::OK,
        };

        (status, Json(self)).into_response()
    }
}

/// Flag a book as interesting.
///
/// Saving a book that is already on the shelf changes nothing.
#[utoipa::path(
    post,
    path = "/sessions/{session_id}/saved",
    tag = "sessions",
    params(("session_id" = Uuid, Path, description = "Session id")),
    request_body = SaveBookBody,
    responses(
        (status = 201, description = "Book saved", body = SaveBookResponse),
        (status = 200, description = "Book was already saved", body = SaveBookResponse),
        (status = 404, description = "Unknown session", body = ApiError),
    )
)]
pub async fn save_book(
    session: CurrentSession,
    ApiJson(body): ApiJson<SaveBookBody>,
) -> SaveBookResponse {
    let mut session_state = session.handle.lock().await;

    let added = session_state.saved.add(body.book);

    tracing::info!(session_id = %session.id, added, "Save book");

    SaveBookResponse {
        added,
        saved: SavedBooksResponse::new(
            session.id,
            &session_state.saved,
            SavedBooksOrder::NewestFirst,
        ),
    }
}
