use axum::{extract::State, http::header};

use crate::{error::ServerError, state::ServerState};

/// Prometheus metrics in the text exposition format.
pub async fn get_metrics(
    State(state): State<ServerState>,
) -> Result<([(header::HeaderName, &'static str); 1], String), ServerError> {
    state.metrics.update_pool_metrics(&state.pool);

    let body = prometheus::TextEncoder::new()
        .encode_to_string(&state.metrics_registry.gather())
        .map_err(|err| {
            tracing::error!("unable to encode metrics: {}", err);
            ServerError::Execution
        })?;

    Ok(([(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)], body))
}
