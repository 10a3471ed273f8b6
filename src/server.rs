use std::{net::SocketAddr, path::Path, time::Duration};

use anyhow::Context;
use axum::{middleware, routing::get, Router};
use derivative::Derivative;
use serde::Deserialize;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    decompression::RequestDecompressionLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;
use utoipa_redoc::{Redoc, Servable};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    catalog::CatalogClient,
    error::ErrorVerbosity,
    middleware::{
        method_not_allowed::method_not_allowed, not_found::not_found,
        trace_headers::trace_headers, trace_response_body::trace_response_body,
    },
    openapi::ApiDoc,
    recommend::Recommender,
    route,
    session::SessionRegistry,
    state::ApiState,
    upstream::http_client,
};

#[derive(Derivative, Clone, Deserialize)]
#[derivative(Debug)]
pub struct CatalogConfig {
    #[serde(default = "CatalogConfig::default_base_url")]
    pub base_url: String,
    #[serde(default)]
    #[derivative(Debug(format_with = "crate::utils::mask_fmt"))]
    pub api_key: Option<String>,
    #[serde(default = "CatalogConfig::default_timeout_in_seconds")]
    pub timeout_in_seconds: u64,
}

impl CatalogConfig {
    fn default_base_url() -> String {
        "https://www.googleapis.com/books/v1/volumes".to_string()
    }

    fn default_timeout_in_seconds() -> u64 {
        10
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: Self::default_base_url(),
            api_key: None,
            timeout_in_seconds: Self::default_timeout_in_seconds(),
        }
    }
}

#[derive(Derivative, Clone, Deserialize)]
#[derivative(Debug)]
pub struct GenerationConfig {
    #[serde(default = "GenerationConfig::default_base_url")]
    pub base_url: String,
    #[serde(default = "GenerationConfig::default_model")]
    pub model: String,
    #[serde(default)]
    #[derivative(Debug(format_with = "crate::utils::mask_fmt"))]
    pub api_key: Option<String>,
    #[serde(default = "GenerationConfig::default_timeout_in_seconds")]
    pub timeout_in_seconds: u64,
}

impl GenerationConfig {
    fn default_base_url() -> String {
        "https://api.openai.com/v1".to_string()
    }

    fn default_model() -> String {
        "gpt-4o-mini".to_string()
    }

    fn default_timeout_in_seconds() -> u64 {
        30
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            base_url: Self::default_base_url(),
            model: Self::default_model(),
            api_key: None,
            timeout_in_seconds: Self::default_timeout_in_seconds(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionsConfig {
    /// Sessions not accessed for this long are dropped together with their saved books.
    #[serde(default = "SessionsConfig::default_idle_timeout_in_seconds")]
    pub idle_timeout_in_seconds: u64,
}

impl SessionsConfig {
    fn default_idle_timeout_in_seconds() -> u64 {
        60 * 60
    }
}

impl Default for SessionsConfig {
    fn default() -> Self {
        Self {
            idle_timeout_in_seconds: Self::default_idle_timeout_in_seconds(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[source] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[source] serde_yaml::Error),
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    socket_address: SocketAddr,
    error_verbosity: ErrorVerbosity,
    #[serde(default)]
    catalog: CatalogConfig,
    #[serde(default)]
    generation: GenerationConfig,
    #[serde(default)]
    sessions: SessionsConfig,
}

impl ServerConfig {
    pub async fn from_config_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(ConfigError::Read)?;

        serde_yaml::from_str(&content).map_err(ConfigError::Parse)
    }

    /// Replaces the configured API keys with the given ones, if any.
    pub fn with_api_keys(
        mut self,
        catalog_api_key: Option<String>,
        generation_api_key: Option<String>,
    ) -> Self {
        if catalog_api_key.is_some() {
            self.catalog.api_key = catalog_api_key;
        }

        if generation_api_key.is_some() {
            self.generation.api_key = generation_api_key;
        }

        self
    }

    pub fn catalog(&self) -> &CatalogConfig {
        &self.catalog
    }

    pub fn generation(&self) -> &GenerationConfig {
        &self.generation
    }

    pub fn sessions(&self) -> &SessionsConfig {
        &self.sessions
    }

    /// Builds the shared state from this configuration.
    pub fn build_state(&self) -> anyhow::Result<ApiState> {
        let catalog = CatalogClient::new(
            self.catalog.base_url.clone(),
            self.catalog.api_key.clone(),
            http_client(self.catalog.timeout_in_seconds)
                .context("Failed to build catalog HTTP client")?,
        );

        let recommender = Recommender::new(
            self.generation.base_url.clone(),
            self.generation.model.clone(),
            self.generation.api_key.clone(),
            http_client(self.generation.timeout_in_seconds)
                .context("Failed to build generation HTTP client")?,
        );

        if !catalog.has_credential() {
            tracing::warn!("No catalog API key configured, searches will be refused");
        }

        if !recommender.has_credential() {
            tracing::warn!("No generation API key configured, recommendations will be refused");
        }

        let sessions = SessionRegistry::new(Duration::from_secs(
            self.sessions.idle_timeout_in_seconds,
        ));

        Ok(ApiState::new(
            self.error_verbosity,
            catalog,
            recommender,
            sessions,
        ))
    }
}

/// Builds the application router on top of `state`.
pub fn app(state: ApiState) -> Router {
    Router::new()
        .route("/", get(|| async { "Bookshelf" }))
        .nest("/books", route::books::app::app())
        .nest("/sessions", route::sessions::app::app())
        .nest("/reading-list", route::reading_list::app::app())
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            method_not_allowed::<ApiState>,
        ))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            trace_response_body,
        ))
        .layer(middleware::from_fn(trace_headers))
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Redoc::with_url("/redoc", ApiDoc::openapi()))
        .merge(RapiDoc::new("/api-docs/openapi.json").path("/rapidoc"))
}

pub struct Server {
    config: ServerConfig,
}

impl Server {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let state = self.config.build_state()?;

        let app = app(state).layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(tracing::Level::INFO))
                        .on_request(DefaultOnRequest::new().level(tracing::Level::INFO))
                        .on_response(DefaultOnResponse::new().level(tracing::Level::INFO)),
                )
                .layer(RequestDecompressionLayer::new())
                .layer(CompressionLayer::new())
                .layer(CorsLayer::permissive()),
        );

        tracing::info!(addr = %self.config.socket_address, "Starting server");

        let listener = TcpListener::bind(&self.config.socket_address)
            .await
            .context("Bind failed")?;

        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server failed")?;

        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(%err, "Failed to listen for CTRL+C");

            return std::future::pending::<()>().await;
        }

        tracing::info!("CTRL+C received");
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;

                tracing::info!("SIGTERM received");
            }
            Err(err) => {
                tracing::error!(%err, "Failed to install SIGTERM signal handler");

                std::future::pending::<()>().await
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutting down");
}
