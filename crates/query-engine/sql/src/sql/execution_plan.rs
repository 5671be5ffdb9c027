//! Describe the SQL execution plan.

use indexmap::IndexMap;

use super::ast;
use super::string;

/// Values for the named parameters of a query, in the order they were declared.
pub type Arguments = IndexMap<String, String>;

/// Definition of an execution plan to be run against the database.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionPlan {
    /// The query.
    pub query: ast::Select,
    /// Values for every `Variable` the query refers to.
    pub arguments: Arguments,
}

impl ExecutionPlan {
    /// Extract the query component as SQL.
    pub fn query_sql(&self) -> string::SQL {
        select_to_sql(&self.query)
    }

    /// Extract an EXPLAIN of the query component as SQL.
    pub fn explain_query_sql(&self) -> string::SQL {
        explain_to_sql(&ast::Explain::Select(&self.query))
    }
}

/// Render a SELECT.
pub fn select_to_sql(select: &ast::Select) -> string::SQL {
    let mut sql = string::SQL::new();
    select.to_sql(&mut sql);
    sql
}

/// Render an EXPLAIN.
pub fn explain_to_sql(explain: &ast::Explain) -> string::SQL {
    let mut sql = string::SQL::new();
    explain.to_sql(&mut sql);
    sql
}

/// A simple execution plan with only a query and its arguments.
pub fn simple_exec_plan(query: ast::Select, arguments: Arguments) -> ExecutionPlan {
    ExecutionPlan { query, arguments }
}
