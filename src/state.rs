use std::{ops::Deref, sync::Arc};

use crate::{
    catalog::CatalogClient, error::ErrorVerbosity, recommend::Recommender,
    session::SessionRegistry, traits::ErrorVerbosityProvider,
};

#[derive(Clone)]
pub struct ApiState {
    inner: Arc<ApiStateInner>,
}

impl ApiState {
    pub fn new(
        error_verbosity: ErrorVerbosity,
        catalog: CatalogClient,
        recommender: Recommender,
        sessions: SessionRegistry,
    ) -> Self {
        Self {
            inner: Arc::new(ApiStateInner {
                error_verbosity,
                catalog,
                recommender,
                sessions,
            }),
        }
    }
}

impl Deref for ApiState {
    type Target = ApiStateInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

pub struct ApiStateInner {
    error_verbosity: ErrorVerbosity,
    catalog: CatalogClient,
    recommender: Recommender,
    sessions: SessionRegistry,
}

impl ApiStateInner {
    pub fn catalog(&self) -> &CatalogClient {
        &self.catalog
    }

    pub fn recommender(&self) -> &Recommender {
        &self.recommender
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }
}

impl ErrorVerbosityProvider for ApiState {
    fn error_verbosity(&self) -> ErrorVerbosity {
        self.error_verbosity
    }
}
