use axum::{routing::post, Router};

use crate::state::ApiState;

pub fn app() -> Router<ApiState> {
    Router::<ApiState>::new().route("/search", post(super::search_books::search_books))
}
