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
    book::BookRecord,
    catalog::{CategoryFilter, DEFAULT_CATEGORY_RESULTS, DEFAULT_FREE_TEXT_RESULTS},
    error::ApiError,
    extractor::{json::ApiJson, validated::Validated},
    state::ApiState,
    traits::ErrorVerbosityProvider,
};

#[derive(Debug, Deserialize, JsonSchema, ToSchema, Validate)]
pub struct SearchBooksBody {
    /// Free-text query. Takes precedence over `keywords`.
    #[serde(default)]
    #[validate(length(max = 256, message = "Must be at most 256 characters long"))]
    pub query: String,
    /// Preset keywords, joined with spaces when `query` is empty.
    #[serde(default)]
    #[validate(length(max = 16, message = "Must contain at most 16 keywords"))]
    pub keywords: Vec<String>,
    /// Restricts the search to one field. Without it, every field is searched.
    pub field: Option<CategoryFilter>,
    #[validate(range(min = 1, max = 20, message = "Must be between 1 and 20"))]
    pub max_results: Option<u32>,
}

impl SearchBooksBody {
    fn effective_query(&self) -> String {
        let query = self.query.trim();

        if !query.is_empty() {
            return query.to_string();
        }

        self.keywords
            .iter()
            .map(|keyword| keyword.trim())
            .filter(|keyword| !keyword.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SearchBooksResponse {
    pub query: String,
    pub books: Vec<BookRecord>,
}

impl IntoResponse for SearchBooksResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Search the book catalog.
///
/// An empty query is not an error: it returns no books and the catalog is not contacted.
#[utoipa::path(
    post,
    path = "/books/search",
    tag = "books",
    request_body = SearchBooksBody,
    responses(
        (status = 200, description = "Books found", body = SearchBooksResponse),
        (status = 422, description = "Invalid search", body = ApiError),
        (status = 502, description = "Catalog unavailable", body = ApiError),
        (status = 503, description = "Catalog API key missing", body = ApiError),
    )
)]
pub async fn search_books(
    State(state): State<ApiState>,
    Validated(ApiJson(body)): Validated<ApiJson<SearchBooksBody>>,
) -> Result<SearchBooksResponse, ApiError> {
    let query = body.effective_query();
    let catalog = state.catalog();

    let books = match body.field {
        Some(field) => {
            catalog
                .search(
                    &query,
                    field,
                    body.max_results.unwrap_or(DEFAULT_CATEGORY_RESULTS),
                )
                .await
        }
        None => {
            catalog
                .search_free_text(&query, body.max_results.unwrap_or(DEFAULT_FREE_TEXT_RESULTS))
                .await
        }
    }
    .map_err(|err| ApiError::from_catalog_error(state.error_verbosity(), err))?;

    Ok(SearchBooksResponse { query, books })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(query: &str, keywords: &[&str]) -> SearchBooksBody {
        SearchBooksBody {
            query: query.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            field: None,
            max_results: None,
        }
    }

    #[test]
    fn query_wins_over_keywords() {
        assert_eq!(body(" Python ", &["DX"]).effective_query(), "Python");
    }

    #[test]
    fn keywords_are_joined_when_query_is_empty() {
        assert_eq!(
            body("", &["DX", " ", "Generative AI"]).effective_query(),
            "DX Generative AI"
        );
    }

    #[test]
    fn nothing_given_is_an_empty_query() {
        assert_eq!(body("  ", &[]).effective_query(), "");
    }
}
