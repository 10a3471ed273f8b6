use axum::{
    routing::{get, post},
    Router,
};

use crate::state::ApiState;

pub fn app() -> Router<ApiState> {
    Router::<ApiState>::new()
        .route("/", post(super::create_session::create_session))
        .route(
            "/:session_id/saved",
            get(super::saved_books::list_saved_books).post(super::saved_books::save_book),
        )
        .route(
            "/:session_id/recommendations",
            post(super::recommendations::recommend_book),
        )
        .route(
            "/:session_id/levels",
            get(super::levels::list_levels).post(super::levels::record_levels),
        )
}
