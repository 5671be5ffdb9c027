use axum::{extract::rejection::JsonRejection, extract::State, Json};
use tracing::{info_span, Instrument};

use query_engine_execution::{query, response::QueryResponse};
use query_engine_translation::translation::{self, request::FilterSpec};

use crate::{error::ServerError, state::ServerState};

/// Run the filters (and grouping, if any) against the daily summary.
pub async fn post_query(
    State(state): State<ServerState>,
    request: Result<Json<FilterSpec>, JsonRejection>,
) -> Result<Json<QueryResponse>, ServerError> {
    let Json(filter) = request?;
    tracing::info!(?filter, "Query request");

    // Compile the query.
    let plan = info_span!("Plan query").in_scope(|| translation::query::translate(&filter));

    // Execute the query.
    let result = query::execute(&state.pool, &state.metrics, &plan)
        .instrument(info_span!("Execute query"))
        .await;

    match result {
        Ok(response) => {
            // assuming query succeeded, increment counter
            state.metrics.query_total.inc();
            Ok(Json(response))
        }
        Err(err) => {
            state.metrics.error_total.inc();
            Err(err.into())
        }
    }
}
