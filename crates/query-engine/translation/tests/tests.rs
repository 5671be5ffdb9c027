mod common;

use query_engine_metadata::metadata::Dimension;
use query_engine_translation::translation::query::filtering::FilterField;
use query_engine_translation::translation::query::{root, QueryMode};
use query_engine_translation::translation::request::FilterSpec;
use similar_asserts::assert_eq;

fn set_field(filter: &mut FilterSpec, field: FilterField, value: &str) {
    let value = Some(value.to_string());
    match field {
        FilterField::StartDate => filter.start_date = value,
        FilterField::EndDate => filter.end_date = value,
        FilterField::Shipper => filter.shipper = value,
        FilterField::Region => filter.region = value,
        FilterField::Imex => filter.imex = value,
        FilterField::Manager => filter.manager = value,
    }
}

/// The text each filter contributes to the WHERE clause, up to its placeholder number.
fn condition_prefix(field: FilterField) -> &'static str {
    match field {
        FilterField::StartDate => r#"("daily_summary"."work_date" >= CAST($"#,
        FilterField::EndDate => r#"("daily_summary"."work_date" <= CAST($"#,
        FilterField::Shipper => r#"("daily_summary"."shipper" = $"#,
        FilterField::Region => r#"("daily_summary"."region" = $"#,
        FilterField::Imex => r#"("daily_summary"."imex" = $"#,
        FilterField::Manager => r#"("daily_summary"."manager" = $"#,
    }
}

#[test]
fn aggregation_by_shipper_over_a_date_range_and_region() {
    let filter = FilterSpec {
        start_date: Some("2024-01-01".to_string()),
        end_date: Some("2024-01-31".to_string()),
        region: Some("EAST".to_string()),
        group_by: Some(Dimension::Shipper),
        top_n: 5,
        ..FilterSpec::default()
    };

    let result = common::test_translation(&filter);

    assert_eq!(
        result.sql,
        concat!(
            r#"SELECT coalesce(json_agg(row_to_json("rows")), '[]') AS "rows" FROM ("#,
            r#"SELECT "daily_summary"."shipper" AS "group_key", "#,
            r#"sum("daily_summary"."trip_count") AS "trip_count", "#,
            r#"sum("daily_summary"."sales_sum") AS "sales_sum", "#,
            r#"sum("daily_summary"."payment_sum") AS "payment_sum", "#,
            r#"sum("daily_summary"."margin_sum") AS "margin_sum" "#,
            r#"FROM "daily_summary" AS "daily_summary" "#,
            r#"WHERE ((("daily_summary"."work_date" >= CAST($1 AS "date")) "#,
            r#"AND ("daily_summary"."work_date" <= CAST($2 AS "date"))) "#,
            r#"AND ("daily_summary"."region" = $3)) "#,
            r#"GROUP BY "daily_summary"."shipper" "#,
            r#"ORDER BY sum("daily_summary"."sales_sum") DESC LIMIT 5"#,
            r#") AS "rows""#,
        )
    );
    assert_eq!(
        result.params,
        vec![
            common::variable("start_date"),
            common::variable("end_date"),
            common::variable("region"),
        ]
    );
    assert_eq!(
        result
            .arguments
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect::<Vec<_>>(),
        vec![
            ("start_date", "2024-01-01"),
            ("end_date", "2024-01-31"),
            ("region", "EAST"),
        ]
    );
}

#[test]
fn empty_request_selects_latest_rows() {
    let result = common::test_translation(&FilterSpec::default());

    assert_eq!(
        result.sql,
        concat!(
            r#"SELECT coalesce(json_agg(row_to_json("rows")), '[]') AS "rows" FROM ("#,
            r#"SELECT * FROM "daily_summary" AS "daily_summary" "#,
            r#"ORDER BY "daily_summary"."work_date" DESC LIMIT 200"#,
            r#") AS "rows""#,
        )
    );
    assert!(result.params.is_empty());
    assert!(result.arguments.is_empty());
}

#[test]
fn each_filter_adds_exactly_one_bound_condition() {
    let hostile = "x' OR '1'='1'; DROP TABLE daily_summary; --";

    for field in enum_iterator::all::<FilterField>() {
        let mut filter = FilterSpec::default();
        set_field(&mut filter, field, hostile);

        let result = common::test_translation(&filter);

        assert_eq!(result.params, vec![common::variable(field.parameter_name())]);
        assert_eq!(result.arguments.len(), 1);
        assert_eq!(
            result.arguments.get(field.parameter_name()).map(String::as_str),
            Some(hostile)
        );
        assert_eq!(
            result.sql.matches(condition_prefix(field)).count(),
            1,
            "{field:?} in {}",
            result.sql
        );
        assert!(!result.sql.contains(hostile));
        assert!(!result.sql.contains("DROP"));
    }
}

#[test]
fn conditions_follow_declaration_order_for_every_combination() {
    let fields = enum_iterator::all::<FilterField>().collect::<Vec<_>>();

    for mask in 0u32..(1 << fields.len()) {
        let selected = fields
            .iter()
            .enumerate()
            .filter(|(index, _)| mask & (1 << index) != 0)
            .map(|(_, field)| *field)
            .collect::<Vec<_>>();

        let mut filter = FilterSpec::default();
        for field in &selected {
            set_field(&mut filter, *field, "value");
        }

        let result = common::test_translation(&filter);

        assert_eq!(result.params.len(), selected.len());
        assert_eq!(
            result.arguments.keys().map(String::as_str).collect::<Vec<_>>(),
            selected
                .iter()
                .map(FilterField::parameter_name)
                .collect::<Vec<_>>()
        );
        assert_eq!(result.sql.contains(" WHERE "), !selected.is_empty());

        for (index, field) in selected.iter().enumerate() {
            let condition = format!("{}{}", condition_prefix(*field), index + 1);
            assert!(
                result.sql.contains(&condition),
                "missing {condition} in {}",
                result.sql
            );
        }
    }
}

#[test]
fn empty_strings_are_not_filters() {
    let filter = FilterSpec {
        start_date: Some(String::new()),
        shipper: Some(String::new()),
        region: Some("WEST".to_string()),
        ..FilterSpec::default()
    };

    let result = common::test_translation(&filter);

    assert_eq!(result.params, vec![common::variable("region")]);
    assert!(!result.sql.contains("work_date\" >="));
    assert!(!result.sql.contains("shipper"));
}

#[test]
fn group_by_selects_aggregation_mode() {
    for dimension in enum_iterator::all::<Dimension>() {
        let filter = FilterSpec {
            group_by: Some(dimension),
            ..FilterSpec::default()
        };

        assert!(matches!(
            QueryMode::from_filter(&filter),
            QueryMode::Aggregation { plan, top_n: 50 } if plan.dimension == dimension
        ));

        let column = dimension.column().name();
        let sql = common::test_rows_translation(&filter);
        assert!(sql.starts_with(&format!(
            r#"SELECT "daily_summary"."{column}" AS "group_key", "#
        )));
        assert!(sql.contains(&format!(r#" GROUP BY "daily_summary"."{column}" "#)));
        assert!(sql.ends_with(r#" ORDER BY sum("daily_summary"."sales_sum") DESC LIMIT 50"#));
    }
}

#[test]
fn no_group_by_selects_detail_mode() {
    let filter = FilterSpec {
        shipper: Some("ACME".to_string()),
        top_n: 7,
        limit: 20,
        ..FilterSpec::default()
    };

    assert_eq!(
        QueryMode::from_filter(&filter),
        QueryMode::Detail { limit: 20 }
    );
    assert_eq!(
        common::test_rows_translation(&filter),
        concat!(
            r#"SELECT * FROM "daily_summary" AS "daily_summary" "#,
            r#"WHERE ("daily_summary"."shipper" = $1) "#,
            r#"ORDER BY "daily_summary"."work_date" DESC LIMIT 20"#,
        )
    );
}

fn row_cap(filter: &FilterSpec) -> i64 {
    match QueryMode::from_filter(filter) {
        QueryMode::Aggregation { top_n, .. } => i64::from(top_n),
        QueryMode::Detail { limit } => i64::from(limit),
    }
}

#[test]
fn row_caps_are_clamped() {
    let requested = [i64::MIN, -5, 0, 1, 5, 50, 199, 200, 201, 999, 1000, 1001, 10_000, i64::MAX];

    for value in requested {
        let expected_top_n = value.clamp(1, 200);
        let aggregation = FilterSpec {
            group_by: Some(Dimension::Region),
            top_n: value,
            ..FilterSpec::default()
        };
        assert_eq!(row_cap(&aggregation), expected_top_n);
        assert!(common::test_rows_translation(&aggregation)
            .ends_with(&format!(" LIMIT {expected_top_n}")));

        let expected_limit = value.clamp(1, 1000);
        let detail = FilterSpec {
            limit: value,
            ..FilterSpec::default()
        };
        assert_eq!(row_cap(&detail), expected_limit);
        assert!(common::test_rows_translation(&detail)
            .ends_with(&format!(" LIMIT {expected_limit}")));
    }
}

#[test]
fn out_of_range_scenarios() {
    assert_eq!(root::clamp_top_n(10_000), 200);
    assert_eq!(root::clamp_limit(0), 1);
}

#[test]
fn translation_is_idempotent() {
    let filter = FilterSpec {
        end_date: Some("2024-02-29".to_string()),
        imex: Some("IM".to_string()),
        manager: Some("Kim".to_string()),
        group_by: Some(Dimension::WorkDate),
        top_n: 12,
        ..FilterSpec::default()
    };

    let first = common::test_translation(&filter);
    let second = common::test_translation(&filter);

    assert_eq!(first.sql, second.sql);
    assert_eq!(first.params, second.params);
    assert_eq!(first.arguments, second.arguments);
}

#[test]
fn request_defaults_and_aliases() {
    let filter: FilterSpec = serde_json::from_str("{}").unwrap();
    assert_eq!(filter, FilterSpec::default());
    assert_eq!(filter.top_n, 50);
    assert_eq!(filter.limit, 200);

    let filter: FilterSpec = serde_json::from_str(
        r#"{"startDate": "2024-01-01", "groupBy": "imex", "topN": 3, "unknown": true}"#,
    )
    .unwrap();
    assert_eq!(filter.start_date.as_deref(), Some("2024-01-01"));
    assert_eq!(filter.group_by, Some(Dimension::Imex));
    assert_eq!(filter.top_n, 3);

    let filter: FilterSpec =
        serde_json::from_str(r#"{"start_date": null, "group_by": null}"#).unwrap();
    assert_eq!(filter, FilterSpec::default());
}

#[test]
fn integers_beyond_i64_saturate_before_clamping() {
    let cases = [
        (r#"{"group_by": "shipper", "top_n": 100000000000000000000}"#, 200),
        (r#"{"group_by": "shipper", "top_n": 18446744073709551615}"#, 200),
        (r#"{"group_by": "shipper", "top_n": 9223372036854775808}"#, 200),
        (r#"{"group_by": "shipper", "top_n": -100000000000000000000}"#, 1),
        (r#"{"limit": 100000000000000000000}"#, 1000),
        (r#"{"limit": -100000000000000000000}"#, 1),
        (r#"{"limit": -9223372036854775809}"#, 1),
    ];

    for (body, expected) in cases {
        let filter: FilterSpec = serde_json::from_str(body).unwrap();
        assert_eq!(row_cap(&filter), expected, "{body}");
        assert!(
            common::test_rows_translation(&filter).ends_with(&format!(" LIMIT {expected}")),
            "{body}"
        );
    }

    let filter: FilterSpec = serde_json::from_str(r#"{"top_n": 18446744073709551615}"#).unwrap();
    assert_eq!(filter.top_n, i64::MAX);
    let filter: FilterSpec = serde_json::from_str(r#"{"limit": -100000000000000000000}"#).unwrap();
    assert_eq!(filter.limit, i64::MIN);
}

#[test]
fn malformed_requests_are_rejected() {
    for body in [
        r#"{"group_by": "sales_sum"}"#,
        r#"{"group_by": "shipper; DROP TABLE daily_summary"}"#,
        r#"{"top_n": "ten"}"#,
        r#"{"top_n": 5.5}"#,
        r#"{"top_n": 5.0}"#,
        r#"{"limit": 2.5e3}"#,
        r#"{"limit": null}"#,
        r#"{"shipper": 42}"#,
    ] {
        assert!(
            serde_json::from_str::<FilterSpec>(body).is_err(),
            "accepted {body}"
        );
    }
}
