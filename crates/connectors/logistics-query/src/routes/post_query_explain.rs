use axum::{extract::rejection::JsonRejection, extract::State, Json};
use tracing::{info_span, Instrument};

use query_engine_execution::{query, response::ExplainResponse};
use query_engine_translation::translation::{self, request::FilterSpec};

use crate::{error::ServerError, state::ServerState};

/// Explain the query a request would run, with the database's plan for it.
pub async fn post_query_explain(
    State(state): State<ServerState>,
    request: Result<Json<FilterSpec>, JsonRejection>,
) -> Result<Json<ExplainResponse>, ServerError> {
    let Json(filter) = request?;
    tracing::info!(?filter, "Explain request");

    let plan = info_span!("Plan query").in_scope(|| translation::query::translate(&filter));

    let result = query::explain(&state.pool, &plan)
        .instrument(info_span!("Explain query"))
        .await;

    match result {
        Ok(response) => {
            // assuming explain succeeded, increment counter
            state.metrics.explain_total.inc();
            Ok(Json(response))
        }
        Err(err) => {
            state.metrics.error_total.inc();
            Err(err.into())
        }
    }
}
