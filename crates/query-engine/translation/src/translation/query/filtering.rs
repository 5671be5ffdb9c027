//! Handle filtering/where clauses translation.

use enum_iterator::Sequence;
use query_engine_metadata::metadata::{ComparisonOperator, SummaryColumn};
use query_engine_sql::sql;

use crate::translation::request::FilterSpec;

/// The optional filters of a request, in declaration order.
///
/// Predicates are emitted in this order, so the generated SQL and the
/// parameter numbering are deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Sequence)]
pub enum FilterField {
    StartDate,
    EndDate,
    Shipper,
    Region,
    Imex,
    Manager,
}

impl FilterField {
    /// The name of the query parameter this filter's value is bound to.
    pub fn parameter_name(&self) -> &'static str {
        match self {
            FilterField::StartDate => "start_date",
            FilterField::EndDate => "end_date",
            FilterField::Shipper => "shipper",
            FilterField::Region => "region",
            FilterField::Imex => "imex",
            FilterField::Manager => "manager",
        }
    }

    pub fn column(&self) -> SummaryColumn {
        match self {
            FilterField::StartDate | FilterField::EndDate => SummaryColumn::WorkDate,
            FilterField::Shipper => SummaryColumn::Shipper,
            FilterField::Region => SummaryColumn::Region,
            FilterField::Imex => SummaryColumn::Imex,
            FilterField::Manager => SummaryColumn::Manager,
        }
    }

    pub fn operator(&self) -> ComparisonOperator {
        match self {
            FilterField::StartDate => ComparisonOperator::GreaterThanOrEqualTo,
            FilterField::EndDate => ComparisonOperator::LessThanOrEqualTo,
            FilterField::Shipper
            | FilterField::Region
            | FilterField::Imex
            | FilterField::Manager => ComparisonOperator::Equals,
        }
    }

    /// The value supplied for this filter. Empty strings count as absent.
    pub fn value<'a>(&self, filter: &'a FilterSpec) -> Option<&'a str> {
        let value = match self {
            FilterField::StartDate => &filter.start_date,
            FilterField::EndDate => &filter.end_date,
            FilterField::Shipper => &filter.shipper,
            FilterField::Region => &filter.region,
            FilterField::Imex => &filter.imex,
            FilterField::Manager => &filter.manager,
        };
        value.as_deref().filter(|value| !value.is_empty())
    }
}

/// A single condition: `column operator :parameter`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Predicate {
    pub column: SummaryColumn,
    pub operator: ComparisonOperator,
    pub parameter: &'static str,
}

impl From<FilterField> for Predicate {
    fn from(field: FilterField) -> Self {
        Predicate {
            column: field.column(),
            operator: field.operator(),
            parameter: field.parameter_name(),
        }
    }
}

/// The conditions of a request, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PredicateClause(pub Vec<Predicate>);

impl PredicateClause {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Translate to a single expression over the given table.
    /// An empty clause translates to `true`.
    pub fn to_expression(&self, table: &sql::ast::TableReference) -> sql::ast::Expression {
        sql::helpers::conjunction(
            self.0
                .iter()
                .map(|predicate| translate_predicate(table, predicate))
                .collect(),
        )
    }
}

/// Collect the predicates of a request and the values to bind to their parameters.
pub fn translate(filter: &FilterSpec) -> (PredicateClause, sql::execution_plan::Arguments) {
    let mut predicates = vec![];
    let mut arguments = sql::execution_plan::Arguments::new();

    for field in enum_iterator::all::<FilterField>() {
        if let Some(value) = field.value(filter) {
            predicates.push(Predicate::from(field));
            arguments.insert(field.parameter_name().to_string(), value.to_string());
        }
    }

    (PredicateClause(predicates), arguments)
}

fn translate_predicate(
    table: &sql::ast::TableReference,
    predicate: &Predicate,
) -> sql::ast::Expression {
    let left = sql::helpers::make_column(
        table.clone(),
        sql::ast::ColumnName(predicate.column.name().to_string()),
    );

    let parameter =
        sql::ast::Expression::Value(sql::ast::Value::Variable(predicate.parameter.to_string()));

    let scalar_type = predicate.column.scalar_type();
    let right = if scalar_type.needs_parameter_cast() {
        sql::ast::Expression::Cast {
            expression: Box::new(parameter),
            r#type: sql::ast::ScalarType(scalar_type.name().to_string()),
        }
    } else {
        parameter
    };

    sql::ast::Expression::BinaryOperation {
        left: Box::new(left),
        operator: translate_operator(predicate.operator),
        right: Box::new(right),
    }
}

fn translate_operator(operator: ComparisonOperator) -> sql::ast::BinaryOperator {
    match operator {
        ComparisonOperator::Equals => sql::ast::BinaryOperator::Equals,
        ComparisonOperator::LessThanOrEqualTo => sql::ast::BinaryOperator::LessThanOrEqualTo,
        ComparisonOperator::GreaterThanOrEqualTo => {
            sql::ast::BinaryOperator::GreaterThanOrEqualTo
        }
    }
}
