//! Build the SELECT for each query mode.

use query_engine_metadata::metadata::{self, SummaryColumn};
use query_engine_sql::sql;

use super::aggregates::AggregationPlan;
use super::filtering::PredicateClause;

pub const MIN_TOP_N: u32 = 1;
pub const MAX_TOP_N: u32 = 200;
pub const MIN_LIMIT: u32 = 1;
pub const MAX_LIMIT: u32 = 1000;

/// Clamp a requested number of groups to `[1, 200]`.
pub fn clamp_top_n(top_n: i64) -> u32 {
    clamp(top_n, MIN_TOP_N, MAX_TOP_N)
}

/// Clamp a requested number of rows to `[1, 1000]`.
pub fn clamp_limit(limit: i64) -> u32 {
    clamp(limit, MIN_LIMIT, MAX_LIMIT)
}

fn clamp(value: i64, min: u32, max: u32) -> u32 {
    let clamped = value.clamp(i64::from(min), i64::from(max));
    u32::try_from(clamped).unwrap_or(max)
}

/// The summary table, and how its columns are referenced.
fn summary_table() -> (sql::ast::From, sql::ast::TableReference) {
    let alias = sql::helpers::make_table_alias(metadata::SUMMARY_TABLE_NAME.to_string());
    let from = sql::ast::From::Table {
        reference: sql::helpers::make_db_table_reference(metadata::SUMMARY_TABLE_NAME.to_string()),
        alias: alias.clone(),
    };
    (from, sql::ast::TableReference::AliasedTable(alias))
}

/// Summed measures per group, largest sales first.
pub fn translate_aggregation_query(
    plan: &AggregationPlan,
    predicates: &PredicateClause,
    top_n: u32,
) -> sql::ast::Select {
    let (from, table) = summary_table();

    let mut select = sql::helpers::simple_select(plan.select_list(&table));
    select.from = Some(from);
    select.where_ = sql::ast::Where(predicates.to_expression(&table));
    select.group_by = plan.group_by(&table);
    select.order_by = plan.order_by(&table);
    select.limit = sql::ast::Limit { limit: Some(top_n) };
    select
}

/// Every column of the matching rows, latest first.
pub fn translate_detail_query(predicates: &PredicateClause, limit: u32) -> sql::ast::Select {
    let (from, table) = summary_table();

    let mut select = sql::helpers::star_select(from);
    select.where_ = sql::ast::Where(predicates.to_expression(&table));
    select.order_by = sql::ast::OrderBy {
        elements: vec![sql::ast::OrderByElement {
            target: sql::helpers::make_column(
                table,
                sql::ast::ColumnName(SummaryColumn::WorkDate.name().to_string()),
            ),
            direction: sql::ast::OrderByDirection::Desc,
        }],
    };
    select.limit = sql::ast::Limit { limit: Some(limit) };
    select
}
