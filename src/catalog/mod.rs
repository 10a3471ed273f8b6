use derivative::Derivative;
use reqwest::StatusCode;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{book::BookRecord, upstream::send_with_single_retry};

mod volume;

use volume::VolumesResponse;

pub const MIN_RESULTS: u32 = 1;
pub const MAX_RESULTS: u32 = 20;
/// Page size of a free-text search when the caller does not choose one.
pub const DEFAULT_FREE_TEXT_RESULTS: u32 = 5;
/// Page size of a category-filtered search when the caller does not choose one.
pub const DEFAULT_CATEGORY_RESULTS: u32 = 16;

/// Restricts a search to one field of the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CategoryFilter {
    Title,
    Author,
    Subject,
}

impl CategoryFilter {
    /// The query prefix understood by the catalog.
    pub fn token(&self) -> &'static str {
        match self {
            CategoryFilter::Title => "intitle",
            CategoryFilter::Author => "inauthor",
            CategoryFilter::Subject => "subject",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Catalog API key is not configured")]
    MissingCredential,
    #[error("Catalog responded with status {status_code}")]
    Unavailable { status_code: u16 },
    #[error("Failed to reach the catalog: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("Failed to parse the catalog response: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Client of the external book catalog.
#[derive(Derivative, Clone)]
#[derivative(Debug)]
pub struct CatalogClient {
    base_url: String,
    #[derivative(Debug(format_with = "crate::utils::mask_fmt"))]
    api_key: Option<String>,
    http_client: reqwest::Client,
}

impl CatalogClient {
    pub fn new(base_url: String, api_key: Option<String>, http_client: reqwest::Client) -> Self {
        let api_key = api_key.filter(|key| !key.trim().is_empty());

        Self {
            base_url,
            api_key,
            http_client,
        }
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    /// Searches books whose `field` matches `query`.
    ///
    /// An empty query returns no books without contacting the catalog.
    #[tracing::instrument(skip(self))]
    pub async fn search(
        &self,
        query: &str,
        field: CategoryFilter,
        max_results: u32,
    ) -> Result<Vec<BookRecord>, CatalogError> {
        let query = query.trim();

        if query.is_empty() {
            tracing::debug!("Empty query, skipping search");

            return Ok(Vec::new());
        }

        self.fetch(&format!("{}:{query}", field.token()), max_results)
            .await
    }

    /// Searches books matching `query` in any field.
    #[tracing::instrument(skip(self))]
    pub async fn search_free_text(
        &self,
        query: &str,
        max_results: u32,
    ) -> Result<Vec<BookRecord>, CatalogError> {
        let query = query.trim();

        if query.is_empty() {
            tracing::debug!("Empty query, skipping search");

            return Ok(Vec::new());
        }

        self.fetch(query, max_results).await
    }

    async fn fetch(&self, q: &str, max_results: u32) -> Result<Vec<BookRecord>, CatalogError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            tracing::warn!("Catalog API key missing, refusing to search");

            CatalogError::MissingCredential
        })?;

        let max_results = max_results.clamp(MIN_RESULTS, MAX_RESULTS).to_string();

        let request = self.http_client.get(&self.base_url).query(&[
            ("q", q),
            ("maxResults", max_results.as_str()),
            ("printType", "books"),
            ("key", api_key),
        ]);

        let response = send_with_single_retry(request)
            .await
            .map_err(|err| CatalogError::Transport(err.without_url()))?;

        let status = response.status();

        if status != StatusCode::OK {
            tracing::warn!(%status, "Catalog request failed");

            return Err(CatalogError::Unavailable {
                status_code: status.as_u16(),
            });
        }

        let volumes = response
            .json::<VolumesResponse>()
            .await
            .map_err(|err| CatalogError::Decode(err.without_url()))?;

        let books: Vec<BookRecord> = volumes.items.into_iter().map(BookRecord::from).collect();

        tracing::debug!(count = books.len(), "Catalog search succeeded");

        Ok(books)
    }
}

#[cfg(test)]
mod tests {
    use httpmock::MockServer;
    use serde_json::json;

    use super::*;
    use crate::book::{PLACEHOLDER_INFO_URL, UNKNOWN_AUTHOR};

    fn client(server: &MockServer, api_key: Option<&str>) -> CatalogClient {
        CatalogClient::new(
            server.url("/books/v1/volumes"),
            api_key.map(str::to_string),
            reqwest::Client::new(),
        )
    }

    fn three_items() -> serde_json::Value {
        json!({
            "items": [
                { "volumeInfo": {
                    "title": "Python Crash Course",
                    "authors": ["Eric Matthes"],
                    "infoLink": "https://books.example/pcc"
                } },
                { "volumeInfo": {
                    "title": "Fluent Python",
                    "authors": ["Luciano Ramalho"],
                    "description": "Deep dive",
                    "imageLinks": { "thumbnail": "https://img.example/fp.jpg" },
                    "infoLink": "https://books.example/fp"
                } },
                { "volumeInfo": { "title": "Python Tricks" } }
            ]
        })
    }

    #[tokio::test]
    async fn title_search_maps_every_item() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method("GET")
                    .path("/books/v1/volumes")
                    .query_param("q", "intitle:Python")
                    .query_param("maxResults", "5")
                    .query_param("printType", "books")
                    .query_param("key", "catalog-key");
                then.status(200).json_body(three_items());
            })
            .await;

        let books = client(&server, Some("catalog-key"))
            .search("Python", CategoryFilter::Title, 5)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(books.len(), 3);
        assert_eq!(books[1].thumbnail_url(), Some("https://img.example/fp.jpg"));
        assert_eq!(books[2].authors(), [UNKNOWN_AUTHOR.to_string()]);
        assert_eq!(books[2].info_url(), PLACEHOLDER_INFO_URL);
    }

    #[tokio::test]
    async fn empty_query_makes_no_request() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.any_request();
                then.status(200).json_body(three_items());
            })
            .await;

        let client = client(&server, Some("catalog-key"));

        assert!(client
            .search("", CategoryFilter::Author, 5)
            .await
            .unwrap()
            .is_empty());
        assert!(client.search_free_text("   ", 5).await.unwrap().is_empty());

        mock.assert_hits_async(0).await;
    }

    #[tokio::test]
    async fn non_ok_status_is_unavailable_with_that_code() {
        for code in [400u16, 403, 429, 500, 503] {
            let server = MockServer::start_async().await;
            server
                .mock_async(|when, then| {
                    when.method("GET");
                    then.status(code);
                })
                .await;

            let err = client(&server, Some("catalog-key"))
                .search("Python", CategoryFilter::Subject, 5)
                .await
                .unwrap_err();

            match err {
                CatalogError::Unavailable { status_code } => assert_eq!(status_code, code),
                other => panic!("unexpected error: {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn missing_items_is_an_empty_result() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method("GET");
                then.status(200).json_body(json!({ "totalItems": 0 }));
            })
            .await;

        let books = client(&server, Some("catalog-key"))
            .search_free_text("nothing matches this", 5)
            .await
            .unwrap();

        assert!(books.is_empty());
    }

    #[tokio::test]
    async fn missing_api_key_makes_no_request() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.any_request();
                then.status(200).json_body(three_items());
            })
            .await;

        for key in [None, Some(""), Some("  ")] {
            let err = client(&server, key)
                .search("Python", CategoryFilter::Title, 5)
                .await
                .unwrap_err();

            assert!(matches!(err, CatalogError::MissingCredential));
        }

        mock.assert_hits_async(0).await;
    }

    #[tokio::test]
    async fn max_results_is_clamped() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method("GET")
                    .query_param("q", "rust")
                    .query_param("maxResults", "20");
                then.status(200).json_body(json!({}));
            })
            .await;

        client(&server, Some("catalog-key"))
            .search_free_text("rust", 500)
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn unparsable_body_is_a_decode_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method("GET");
                then.status(200).body("not json");
            })
            .await;

        let err = client(&server, Some("catalog-key"))
            .search_free_text("rust", 5)
            .await
            .unwrap_err();

        assert!(matches!(err, CatalogError::Decode(_)));
    }

    #[tokio::test]
    async fn unreachable_catalog_is_a_transport_error() {
        let client = CatalogClient::new(
            "http://127.0.0.1:1/volumes".to_string(),
            Some("catalog-key".to_string()),
            reqwest::Client::new(),
        );

        let err = client.search_free_text("rust", 5).await.unwrap_err();

        assert!(matches!(err, CatalogError::Transport(_)));
    }
}
