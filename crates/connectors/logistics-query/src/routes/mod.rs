mod get_health;
mod get_metrics;
mod post_query;
mod post_query_explain;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::ServerState;

pub use get_health::{get_health, HealthResponse};
pub use get_metrics::get_metrics;
pub use post_query::post_query;
pub use post_query_explain::post_query_explain;

pub fn create_router(state: ServerState) -> Router {
    Router::new()
        .route("/health", get(get_health))
        .route("/query", post(post_query))
        .route("/query/explain", post(post_query_explain))
        .route("/metrics", get(get_metrics))
        .with_state(state)
}
