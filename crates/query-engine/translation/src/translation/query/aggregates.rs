//! Handle aggregates translation.

use query_engine_metadata::metadata::{self, Dimension, SummaryColumn};
use query_engine_sql::sql;

/// What to group by and which measures to sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregationPlan {
    pub dimension: Dimension,
    pub measures: [SummaryColumn; 4],
}

impl AggregationPlan {
    pub fn new(dimension: Dimension) -> Self {
        AggregationPlan {
            dimension,
            measures: SummaryColumn::MEASURES,
        }
    }

    pub fn group_column(&self) -> SummaryColumn {
        self.dimension.column()
    }

    /// The grouping column as `group_key`, followed by one sum per measure
    /// named after the measure.
    pub fn select_list(
        &self,
        table: &sql::ast::TableReference,
    ) -> Vec<(sql::ast::ColumnAlias, sql::ast::Expression)> {
        let group_key = (
            sql::helpers::make_column_alias(metadata::GROUP_KEY_ALIAS.to_string()),
            column(table, self.group_column()),
        );

        std::iter::once(group_key)
            .chain(self.measures.iter().map(|measure| {
                (
                    sql::helpers::make_column_alias(measure.name().to_string()),
                    sum(table, *measure),
                )
            }))
            .collect()
    }

    pub fn group_by(&self, table: &sql::ast::TableReference) -> sql::ast::GroupBy {
        sql::ast::GroupBy {
            elements: vec![column(table, self.group_column())],
        }
    }

    /// Largest summed sales first.
    pub fn order_by(&self, table: &sql::ast::TableReference) -> sql::ast::OrderBy {
        sql::ast::OrderBy {
            elements: vec![sql::ast::OrderByElement {
                target: sum(table, SummaryColumn::SalesSum),
                direction: sql::ast::OrderByDirection::Desc,
            }],
        }
    }
}

fn column(table: &sql::ast::TableReference, column: SummaryColumn) -> sql::ast::Expression {
    sql::helpers::make_column(
        table.clone(),
        sql::ast::ColumnName(column.name().to_string()),
    )
}

fn sum(table: &sql::ast::TableReference, measure: SummaryColumn) -> sql::ast::Expression {
    sql::ast::Expression::FunctionCall {
        function: sql::ast::Function::Sum,
        args: vec![column(table, measure)],
    }
}
