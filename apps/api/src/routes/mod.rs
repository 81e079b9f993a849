pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::background::handlers as background;
use crate::layout::handlers as layout;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Background removal API
        .route(
            "/api/remove-background",
            post(background::handle_remove_background),
        )
        // Layout API
        .route("/api/layout/:layout_type", get(layout::handle_get_layout))
        .route(
            "/api/layout/:layout_type/apply",
            post(layout::handle_apply_layout),
        )
        .with_state(state)
}
