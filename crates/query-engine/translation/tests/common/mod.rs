use query_engine_sql::sql;
use query_engine_translation::translation;

/// The output of translating a request: the SQL text, the parameter each
/// placeholder refers to, and the values bound to those parameters.
pub struct Translated {
    pub sql: String,
    pub params: Vec<sql::string::Param>,
    pub arguments: sql::execution_plan::Arguments,
}

/// Translate a request the way the query endpoint does.
pub fn test_translation(filter: &translation::request::FilterSpec) -> Translated {
    let plan = translation::query::translate(filter);
    let query = plan.query_sql();
    Translated {
        sql: query.sql,
        params: query.params,
        arguments: plan.arguments,
    }
}

/// Translate only the rows query of a request, without the json framing.
pub fn test_rows_translation(filter: &translation::request::FilterSpec) -> String {
    let (predicates, _) = translation::query::filtering::translate(filter);
    let mode = translation::query::QueryMode::from_filter(filter);
    let select = translation::query::translate_rows_query(&mode, &predicates);
    sql::execution_plan::select_to_sql(&select).sql
}

pub fn variable(name: &str) -> sql::string::Param {
    sql::string::Param::Variable(name.to_string())
}
