//! The shapes returned by the query endpoints.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use query_engine_sql::sql;

use crate::error::QueryError;

/// A single row, as column name to value, in the order the database returned the columns.
pub type Row = IndexMap<String, RowFieldValue>;

/// A column value as the database rendered it to json.
/// Dates arrive as ISO strings and numeric sums as numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowFieldValue(pub serde_json::Value);

/// The rows of a query and how many there are.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub rows: Vec<Row>,
    /// Always `rows.len()`, not the number of rows matching the filters.
    pub count: usize,
}

impl QueryResponse {
    pub fn new(rows: Vec<Row>) -> Self {
        let count = rows.len();
        QueryResponse { rows, count }
    }
}

/// What a query would do, without its results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplainResponse {
    /// The generated query, pretty printed.
    pub sql: String,
    /// The values bound to the query's parameters.
    pub arguments: sql::execution_plan::Arguments,
    /// The database's plan for the query.
    pub plan: String,
}

/// Take the json array the database returned and wrap it as a QueryResponse.
pub fn rows_to_response(rows: serde_json::Value) -> Result<QueryResponse, QueryError> {
    let rows: Vec<Row> = serde_json::from_value(rows)
        .map_err(|err| QueryError::MalformedResult(err.to_string()))?;
    Ok(QueryResponse::new(rows))
}
