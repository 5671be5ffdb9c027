//! Translate an incoming `FilterSpec`.

pub mod aggregates;
pub mod filtering;
pub mod root;

use query_engine_sql::sql;

use crate::translation::request::FilterSpec;
use aggregates::AggregationPlan;
use filtering::PredicateClause;

/// The shape of the result, decided solely by the presence of `group_by`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryMode {
    /// One row per group with summed measures, at most `top_n` of them.
    Aggregation { plan: AggregationPlan, top_n: u32 },
    /// The matching rows as they are, at most `limit` of them.
    Detail { limit: u32 },
}

impl QueryMode {
    pub fn from_filter(filter: &FilterSpec) -> Self {
        match filter.group_by {
            Some(dimension) => QueryMode::Aggregation {
                plan: AggregationPlan::new(dimension),
                top_n: root::clamp_top_n(filter.top_n),
            },
            None => QueryMode::Detail {
                limit: root::clamp_limit(filter.limit),
            },
        }
    }
}

/// Translate the incoming filters to an ExecutionPlan (SQL) to be run against the database.
///
/// This cannot fail: identifiers only come from the summary table's metadata,
/// and every value from the request is bound as a parameter.
pub fn translate(filter: &FilterSpec) -> sql::execution_plan::ExecutionPlan {
    let (predicates, arguments) = filtering::translate(filter);
    let mode = QueryMode::from_filter(filter);

    let row_select = translate_rows_query(&mode, &predicates);

    // form a single JSON array of row objects
    let json_select = sql::helpers::select_rows_as_json(
        sql::helpers::make_column_alias("rows".to_string()),
        sql::helpers::make_table_alias("rows".to_string()),
        row_select,
    );

    // log and return
    tracing::debug!("SQL AST: {:?}", json_select);
    sql::execution_plan::simple_exec_plan(json_select, arguments)
}

/// Translate the rows query of a mode to sql ast.
pub fn translate_rows_query(mode: &QueryMode, predicates: &PredicateClause) -> sql::ast::Select {
    match mode {
        QueryMode::Aggregation { plan, top_n } => {
            root::translate_aggregation_query(plan, predicates, *top_n)
        }
        QueryMode::Detail { limit } => root::translate_detail_query(predicates, *limit),
    }
}
