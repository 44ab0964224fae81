pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::dispatch::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/tools", get(handlers::handle_list_tools))
        .route("/api/v1/tools/:name", post(handlers::handle_call_tool))
        .with_state(state)
}
