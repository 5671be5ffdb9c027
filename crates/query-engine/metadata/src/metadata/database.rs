//! Metadata information regarding the database and tracked information.
//!
//! The service reads a single pre-aggregated relation. Every identifier the
//! query engine emits comes from the enumerations in this module, never from
//! request text.
//!
//! `daily_summary.work_date` must be a `date` column. Date filters are bound
//! as text and cast to `date` in the statement, so a `timestamp` or `text`
//! column would compare with different semantics.

use std::fmt;

use enum_iterator::Sequence;
use serde::{Deserialize, Serialize};

/// The relation every query reads from.
pub const SUMMARY_TABLE_NAME: &str = "daily_summary";

/// The output name of the grouping column in aggregation mode.
pub const GROUP_KEY_ALIAS: &str = "group_key";

/// The scalar types of the summary columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarType {
    Date,
    Text,
    Numeric,
}

impl ScalarType {
    /// The type name as known to the database.
    pub fn name(&self) -> &'static str {
        match self {
            ScalarType::Date => "date",
            ScalarType::Text => "text",
            ScalarType::Numeric => "numeric",
        }
    }

    /// Text parameters compare against text columns as they are. Anything else
    /// must be cast to the column type inside the statement.
    pub fn needs_parameter_cast(&self) -> bool {
        !matches!(self, ScalarType::Text)
    }
}

/// The columns of the summary relation the query engine is allowed to reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Sequence)]
pub enum SummaryColumn {
    WorkDate,
    Shipper,
    Region,
    Manager,
    Imex,
    TripCount,
    SalesSum,
    PaymentSum,
    MarginSum,
}

impl SummaryColumn {
    /// The pre-aggregated measures, in output order.
    pub const MEASURES: [SummaryColumn; 4] = [
        SummaryColumn::TripCount,
        SummaryColumn::SalesSum,
        SummaryColumn::PaymentSum,
        SummaryColumn::MarginSum,
    ];

    /// The column name in the database.
    pub fn name(&self) -> &'static str {
        match self {
            Self::WorkDate => "work_date",
            Self::Shipper => "shipper",
            Self::Region => "region",
            Self::Manager => "manager",
            Self::Imex => "imex",
            Self::TripCount => "trip_count",
            Self::SalesSum => "sales_sum",
            Self::PaymentSum => "payment_sum",
            Self::MarginSum => "margin_sum",
        }
    }

    pub fn scalar_type(&self) -> ScalarType {
        match self {
            Self::WorkDate => ScalarType::Date,
            Self::Shipper | Self::Region | Self::Manager | Self::Imex => ScalarType::Text,
            Self::TripCount | Self::SalesSum | Self::PaymentSum | Self::MarginSum => {
                ScalarType::Numeric
            }
        }
    }

    pub fn is_measure(&self) -> bool {
        Self::MEASURES.contains(self)
    }
}

impl fmt::Display for SummaryColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The dimensions a summary can be grouped by.
///
/// This is the closed set accepted for `group_by`; anything else is rejected
/// when the request is deserialized.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Sequence, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    WorkDate,
    Shipper,
    Region,
    Manager,
    Imex,
}

impl Dimension {
    /// The column this dimension groups on.
    pub fn column(&self) -> SummaryColumn {
        match self {
            Dimension::WorkDate => SummaryColumn::WorkDate,
            Dimension::Shipper => SummaryColumn::Shipper,
            Dimension::Region => SummaryColumn::Region,
            Dimension::Manager => SummaryColumn::Manager,
            Dimension::Imex => SummaryColumn::Imex,
        }
    }
}

/// The comparison operators a filter can translate to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Sequence)]
pub enum ComparisonOperator {
    Equals,
    LessThanOrEqualTo,
    GreaterThanOrEqualTo,
}
