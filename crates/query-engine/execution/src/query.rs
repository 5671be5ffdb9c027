//! Execute an execution plan against the database.

use sqlx::Row;
use tracing::{info_span, Instrument};

use query_engine_sql::sql;

use crate::error::{Error, QueryError};
use crate::metrics;
use crate::response::{self, ExplainResponse, QueryResponse};

/// Execute a query against postgres.
///
/// One pooled connection is held for the duration of the call and returned
/// to the pool when it finishes, whether it succeeded or not.
pub async fn execute(
    pool: &sqlx::PgPool,
    metrics: &metrics::Metrics,
    plan: &sql::execution_plan::ExecutionPlan,
) -> Result<QueryResponse, Error> {
    let query = plan.query_sql();

    tracing::info!(
        generated_sql = %query.sql,
        params = ?&query.params,
        arguments = ?&plan.arguments,
    );

    let sqlx_query = build_query_with_params(&query, &plan.arguments)?;

    let timer = metrics.query_execution_seconds.start_timer();
    let rows = async {
        let mut connection = pool.acquire().await?;
        let row = sqlx_query.fetch_one(&mut *connection).await?;
        let rows: serde_json::Value = row.try_get(0)?;
        Ok::<_, Error>(rows)
    }
    .instrument(info_span!("Database request"))
    .await;
    timer.observe_duration();
    let rows = rows?;

    // Make a response from rows.
    let response = async { response::rows_to_response(rows) }
        .instrument(info_span!("Create response"))
        .await?;

    tracing::debug!(row_count = response.count);

    Ok(response)
}

/// Convert a query to an EXPLAIN query and execute it against postgres.
pub async fn explain(
    pool: &sqlx::PgPool,
    plan: &sql::execution_plan::ExecutionPlan,
) -> Result<ExplainResponse, Error> {
    let query = plan.explain_query_sql();

    tracing::info!(
        generated_sql = %query.sql,
        params = ?&query.params,
        arguments = ?&plan.arguments,
    );

    let sqlx_query = build_query_with_params(&query, &plan.arguments)?;

    // run and fetch from the database
    let mut connection = pool.acquire().await?;
    let rows: Vec<sqlx::postgres::PgRow> = sqlx_query.fetch_all(&mut *connection).await?;

    let mut results: Vec<String> = vec![];
    for row in rows {
        results.push(row.try_get(0)?);
    }

    let pretty = sqlformat::format(
        &plan.query_sql().sql,
        &sqlformat::QueryParams::None,
        sqlformat::FormatOptions::default(),
    );

    Ok(ExplainResponse {
        sql: pretty,
        arguments: plan.arguments.clone(),
        plan: results.join("\n"),
    })
}

/// Create a SQLx query based on our SQL query and bind the values of its parameters to it.
///
/// Every value is bound as text. Placeholders that need another type are cast
/// in the query itself.
pub fn build_query_with_params<'a>(
    query: &'a sql::string::SQL,
    arguments: &'a sql::execution_plan::Arguments,
) -> Result<sqlx::query::Query<'a, sqlx::Postgres, sqlx::postgres::PgArguments>, Error> {
    let sqlx_query = sqlx::query(query.sql.as_str());

    query
        .params
        .iter()
        .try_fold(sqlx_query, |sqlx_query, param| match param {
            sql::string::Param::Variable(var) => match arguments.get(var) {
                Some(value) => Ok(sqlx_query.bind(value.as_str())),
                None => Err(Error::Query(QueryError::VariableNotFound(var.to_string()))),
            },
        })
}
