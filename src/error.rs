use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use derive_more::From;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{catalog::CatalogError, recommend::RecommendError};

#[derive(Debug, Clone, Copy, Deserialize)]
pub enum ErrorVerbosity {
    /// Server returns the appropriate status code with an empty body and no message.
    None,
    /// Server returns only the appropriate status code.
    StatusCode,
    /// Server returns only the message with the appropriate status code.
    Message,
    /// Server returns the message, the error type with cleared error content and the appropriate status code.
    Type,
    /// Server returns the message, the error type with the error content and the appropriate status code.
    Full,
}

impl ErrorVerbosity {
    pub fn should_generate_error_reason(&self) -> bool {
        matches!(self, ErrorVerbosity::Full)
    }
}

/// Maps an error into an [`ApiError::InternalServerError`] using the verbosity of `$state`.
#[macro_export]
macro_rules! server_error {
    ($state:expr) => {
        |err| {
            $crate::error::ApiError::from($crate::error::InternalServerError::from_generic_error(
                $crate::traits::ErrorVerbosityProvider::error_verbosity(&$state),
                err,
            ))
        }
    };
}

#[derive(Debug, Serialize)]
struct ApiErrorResponse {
    #[serde(flatten)]
    error: ApiError,
    message: &'static str,
}

#[derive(Debug, Serialize)]
struct ApiErrorMessage {
    message: &'static str,
}

impl From<ApiErrorResponse> for ApiErrorMessage {
    fn from(response: ApiErrorResponse) -> Self {
        ApiErrorMessage {
            message: response.message,
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        let status_code = self.error.status_code();

        match self.error.verbosity() {
            ErrorVerbosity::None | ErrorVerbosity::StatusCode => status_code.into_response(),
            ErrorVerbosity::Message => {
                (status_code, Json(ApiErrorMessage::from(self))).into_response()
            }
            ErrorVerbosity::Type | ErrorVerbosity::Full => {
                (status_code, Json(self)).into_response()
            }
        }
    }
}

#[derive(Debug, From, Serialize, ToSchema)]
#[serde(tag = "error_type", content = "error")]
/// API error
pub enum ApiError {
    /// Internal server error
    ///
    /// This error is returned when an internal server error occurs.
    InternalServerError(InternalServerError),
    /// Query error
    ///
    /// This error is returned when the query parameters are not as expected.
    Query(QueryError),
    /// Body error
    ///
    /// This error is returned when the body is not as expected.
    Body(BodyError),
    /// Path error
    ///
    /// This error is returned when the path is not as expected.
    Path(PathError),
    /// Validation error
    ///
    /// This error is returned when the extracted data does not pass validation.
    Validation(ValidationError),
    /// Method not allowed
    ///
    /// This error is returned when the method is not allowed.
    MethodNotAllowed(MethodNotAllowedError),
    /// Not found error
    ///
    /// This error is returned when the requested resource is not found.
    NotFound(NotFoundError),
    /// Session not found
    ///
    /// This error is returned when the session id does not belong to a live session.
    SessionNotFound(SessionNotFoundError),
    /// Missing credential
    ///
    /// This error is returned when an upstream service has no API key configured.
    MissingCredential(MissingCredentialError),
    /// Catalog unavailable
    ///
    /// This error is returned when the book catalog could not answer a search.
    CatalogUnavailable(CatalogUnavailableError),
    /// Generation unavailable
    ///
    /// This error is returned when the text-generation service could not answer.
    GenerationUnavailable(GenerationUnavailableError),
}

impl ApiError {
    fn verbosity(&self) -> ErrorVerbosity {
        match self {
            ApiError::InternalServerError(err) => err.verbosity,
            ApiError::Query(err) => err.verbosity,
            ApiError::Body(err) => err.verbosity,
            ApiError::Path(err) => err.verbosity,
            ApiError::Validation(err) => err.verbosity,
            ApiError::MethodNotAllowed(err) => err.verbosity,
            ApiError::NotFound(err) => err.verbosity,
            ApiError::SessionNotFound(err) => err.verbosity,
            ApiError::MissingCredential(err) => err.verbosity,
            ApiError::CatalogUnavailable(err) => err.verbosity,
            ApiError::GenerationUnavailable(err) => err.verbosity,
        }
    }

    fn message(&self) -> &'static str {
        match self {
            ApiError::InternalServerError(_) => "An internal server error has occurred",
            ApiError::Query(_) => "Failed to parse query parameters",
            ApiError::Body(_) => "Failed to parse request body",
            ApiError::Path(_) => "Failed to parse path parameters",
            ApiError::Validation(_) => "Validation failed",
            ApiError::MethodNotAllowed(_) => "Method not allowed",
            ApiError::NotFound(_) => "The requested resource was not found",
            ApiError::SessionNotFound(_) => "Session not found",
            ApiError::MissingCredential(_) => "An API key for an upstream service is missing",
            ApiError::CatalogUnavailable(_) => "The book catalog is unavailable",
            ApiError::GenerationUnavailable(_) => "The text-generation service is unavailable",
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Query(_) | ApiError::Body(_) | ApiError::Path(_) => StatusCode::BAD_REQUEST,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::NotFound(_) | ApiError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MissingCredential(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::CatalogUnavailable(_) | ApiError::GenerationUnavailable(_) => {
                StatusCode::BAD_GATEWAY
            }
        }
    }
}

impl From<ApiError> for ApiErrorResponse {
    fn from(error: ApiError) -> Self {
        let message = match error.verbosity() {
            ErrorVerbosity::None => "",
            _ => error.message(),
        };

        ApiErrorResponse { error, message }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        ApiErrorResponse::from(self).into_response()
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InternalServerError {
    #[serde(skip)]
    verbosity: ErrorVerbosity,
    internal_server_error: Option<String>,
}

impl InternalServerError {
    pub fn from_generic_error<E: Into<anyhow::Error>>(verbosity: ErrorVerbosity, err: E) -> Self {
        let err: anyhow::Error = err.into();
        let err = format!("{err:#}");
        tracing::error!(%err, "Internal server error");

        let internal_server_error = verbosity.should_generate_error_reason().then_some(err);

        InternalServerError {
            verbosity,
            internal_server_error,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct QueryError {
    #[serde(skip)]
    verbosity: ErrorVerbosity,
    query_error_reason: Option<String>,
    query_expected_schema: Option<String>,
}

impl QueryError {
    pub fn new(
        verbosity: ErrorVerbosity,
        query_error_reason: String,
        query_expected_schema: String,
    ) -> Self {
        let (query_error_reason, query_expected_schema) =
            match verbosity.should_generate_error_reason() {
                true => (Some(query_error_reason), Some(query_expected_schema)),
                false => (None, None),
            };

        QueryError {
            verbosity,
            query_error_reason,
            query_expected_schema,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BodyError {
    #[serde(skip)]
    verbosity: ErrorVerbosity,
    body_error_reason: Option<String>,
    body_expected_schema: Option<String>,
}

impl BodyError {
    pub fn new(
        verbosity: ErrorVerbosity,
        body_error_reason: String,
        body_expected_schema: String,
    ) -> Self {
        let (body_error_reason, body_expected_schema) =
            match verbosity.should_generate_error_reason() {
                true => (Some(body_error_reason), Some(body_expected_schema)),
                false => (None, None),
            };

        BodyError {
            verbosity,
            body_error_reason,
            body_expected_schema,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PathError {
    #[serde(skip)]
    verbosity: ErrorVerbosity,
    path_error_reason: Option<String>,
}

impl PathError {
    pub fn new(verbosity: ErrorVerbosity, path_error_reason: String) -> Self {
        let path_error_reason = verbosity
            .should_generate_error_reason()
            .then_some(path_error_reason);

        PathError {
            verbosity,
            path_error_reason,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ValidationError {
    #[serde(skip)]
    verbosity: ErrorVerbosity,
    validation_error_reason: Option<String>,
}

impl ValidationError {
    pub fn from_validation_errors(
        verbosity: ErrorVerbosity,
        errors: validator::ValidationErrors,
    ) -> Self {
        let validation_error_reason = verbosity
            .should_generate_error_reason()
            .then(|| errors.to_string());

        ValidationError {
            verbosity,
            validation_error_reason,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MethodNotAllowedError {
    #[serde(skip)]
    verbosity: ErrorVerbosity,
}

impl MethodNotAllowedError {
    pub fn new(verbosity: ErrorVerbosity) -> Self {
        MethodNotAllowedError { verbosity }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NotFoundError {
    #[serde(skip)]
    verbosity: ErrorVerbosity,
}

impl NotFoundError {
    pub fn new(verbosity: ErrorVerbosity) -> Self {
        NotFoundError { verbosity }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SessionNotFoundError {
    #[serde(skip)]
    verbosity: ErrorVerbosity,
    session_not_found_reason: Option<String>,
}

impl SessionNotFoundError {
    pub fn new(verbosity: ErrorVerbosity, session_id: uuid::Uuid) -> Self {
        let session_not_found_reason = verbosity
            .should_generate_error_reason()
            .then(|| format!("No live session with id {session_id}"));

        SessionNotFoundError {
            verbosity,
            session_not_found_reason,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
pub enum Credential {
    Catalog,
    Generation,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MissingCredentialError {
    #[serde(skip)]
    verbosity: ErrorVerbosity,
    missing_credential: Option<Credential>,
}

impl MissingCredentialError {
    pub fn new(verbosity: ErrorVerbosity, credential: Credential) -> Self {
        let missing_credential = verbosity.should_generate_error_reason().then_some(credential);

        MissingCredentialError {
            verbosity,
            missing_credential,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CatalogUnavailableError {
    #[serde(skip)]
    verbosity: ErrorVerbosity,
    /// Status code returned by the catalog, absent if it could not be reached.
    upstream_status_code: Option<u16>,
    catalog_error_reason: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GenerationUnavailableError {
    #[serde(skip)]
    verbosity: ErrorVerbosity,
    generation_error_reason: Option<String>,
}

impl ApiError {
    pub fn from_catalog_error(verbosity: ErrorVerbosity, err: CatalogError) -> Self {
        let upstream_status_code = match err {
            CatalogError::MissingCredential => {
                return MissingCredentialError::new(verbosity, Credential::Catalog).into()
            }
            CatalogError::Unavailable { status_code } => Some(status_code),
            CatalogError::Transport(_) | CatalogError::Decode(_) => None,
        };

        let catalog_error_reason = verbosity
            .should_generate_error_reason()
            .then(|| err.to_string());

        CatalogUnavailableError {
            verbosity,
            upstream_status_code,
            catalog_error_reason,
        }
        .into()
    }

    pub fn from_recommend_error(verbosity: ErrorVerbosity, err: RecommendError) -> Self {
        match err {
            RecommendError::MissingCredential => {
                MissingCredentialError::new(verbosity, Credential::Generation).into()
            }
            RecommendError::Unavailable { reason } => {
                let generation_error_reason =
                    verbosity.should_generate_error_reason().then_some(reason);

                GenerationUnavailableError {
                    verbosity,
                    generation_error_reason,
                }
                .into()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_of(response: Response) -> axum::body::Bytes {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn silent_verbosity_keeps_the_status_code() {
        let error = ApiError::from_catalog_error(
            ErrorVerbosity::None,
            CatalogError::Unavailable { status_code: 503 },
        );

        let response = error.into_response();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert!(body_of(response).await.is_empty());
    }

    #[tokio::test]
    async fn missing_credential_is_not_reported_as_success() {
        let error = ApiError::from_catalog_error(ErrorVerbosity::None, CatalogError::MissingCredential);

        assert_eq!(error.into_response().status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn full_verbosity_includes_upstream_status_code() {
        let error = ApiError::from_catalog_error(
            ErrorVerbosity::Full,
            CatalogError::Unavailable { status_code: 429 },
        );

        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let body: serde_json::Value = serde_json::from_slice(&body_of(response).await).unwrap();
        assert_eq!(body["error_type"], "CatalogUnavailable");
        assert_eq!(body["error"]["upstream_status_code"], 429);
    }
}
