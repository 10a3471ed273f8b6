use axum::{
    routing::{get, post},
    Router,
};

use crate::state::ApiState;

pub fn app() -> Router<ApiState> {
    Router::<ApiState>::new()
        .route(
            "/",
            post(super::generate_reading_list::generate_reading_list),
        )
        .route("/tones", get(super::list_tones::list_tones))
}
