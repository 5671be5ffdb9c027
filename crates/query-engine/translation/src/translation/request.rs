//! The request body of the query endpoints.

use std::fmt;

use query_engine_metadata::metadata;
use serde::de::{self, Deserializer, Unexpected, Visitor};
use serde::{Deserialize, Serialize};

/// The number of groups returned in aggregation mode when none is requested.
pub const DEFAULT_TOP_N: i64 = 50;

/// The number of rows returned in detail mode when none is requested.
pub const DEFAULT_LIMIT: i64 = 200;

/// Filters and an optional grouping over the daily summary.
///
/// Deserializing this type is where request validation happens: `group_by`
/// only accepts one of the known dimensions and `top_n`/`limit` only accept
/// integers. Integers beyond the range of `i64` saturate, so the clamps see
/// them as very large or very small. Every other field is an opaque string that is only ever bound as
/// a query parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    /// Lower bound on `work_date`, inclusive. Expected as YYYY-MM-DD.
    #[serde(default, alias = "startDate")]
    pub start_date: Option<String>,
    /// Upper bound on `work_date`, inclusive. Expected as YYYY-MM-DD.
    #[serde(default, alias = "endDate")]
    pub end_date: Option<String>,
    #[serde(default)]
    pub shipper: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub imex: Option<String>,
    #[serde(default)]
    pub manager: Option<String>,
    /// Summarize by this dimension instead of returning rows.
    #[serde(default, alias = "groupBy")]
    pub group_by: Option<metadata::Dimension>,
    /// Maximum number of groups in aggregation mode.
    #[serde(
        default = "default_top_n",
        alias = "topN",
        deserialize_with = "deserialize_saturating_integer"
    )]
    pub top_n: i64,
    /// Maximum number of rows in detail mode.
    #[serde(
        default = "default_limit",
        deserialize_with = "deserialize_saturating_integer"
    )]
    pub limit: i64,
}

impl Default for FilterSpec {
    fn default() -> Self {
        FilterSpec {
            start_date: None,
            end_date: None,
            shipper: None,
            region: None,
            imex: None,
            manager: None,
            group_by: None,
            top_n: DEFAULT_TOP_N,
            limit: DEFAULT_LIMIT,
        }
    }
}

// for serde default //
fn default_top_n() -> i64 {
    DEFAULT_TOP_N
}
fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

/// The smallest positive float that cannot be a `u64`.
const ABOVE_U64: f64 = 18_446_744_073_709_551_616.0;
/// `i64::MIN` as a float.
const I64_MIN: f64 = -9_223_372_036_854_775_808.0;

/// Accept any JSON integer, saturating at the bounds of `i64`.
///
/// Integer literals outside the range of both `i64` and `u64` reach the
/// visitor as floats. Those are taken when they have no fractional part;
/// floats that could have been parsed as an integer are rejected.
fn deserialize_saturating_integer<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_i64(SaturatingIntegerVisitor)
}

struct SaturatingIntegerVisitor;

impl<'de> Visitor<'de> for SaturatingIntegerVisitor {
    type Value = i64;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an integer")
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<i64, E> {
        Ok(value)
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<i64, E> {
        Ok(i64::try_from(value).unwrap_or(i64::MAX))
    }

    fn visit_i128<E: de::Error>(self, value: i128) -> Result<i64, E> {
        Ok(i64::try_from(value).unwrap_or(if value < 0 { i64::MIN } else { i64::MAX }))
    }

    fn visit_u128<E: de::Error>(self, value: u128) -> Result<i64, E> {
        Ok(i64::try_from(value).unwrap_or(i64::MAX))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<i64, E> {
        if value.fract() == 0.0 && value >= ABOVE_U64 {
            Ok(i64::MAX)
        } else if value.fract() == 0.0 && value <= I64_MIN {
            Ok(i64::MIN)
        } else {
            Err(E::invalid_type(Unexpected::Float(value), &self))
        }
    }
}
