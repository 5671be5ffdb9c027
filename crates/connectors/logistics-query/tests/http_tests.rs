mod common;

use axum::http::StatusCode;
use logistics_query::error::{JsonErrorResponse, EXECUTION_ERROR_MESSAGE};
use logistics_query::routes::HealthResponse;
use similar_asserts::assert_eq;

#[tokio::test]
async fn health_is_ok() {
    let client = common::create_client();

    let res = client.get("/health").send().await;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<HealthResponse>().await, HealthResponse { ok: true });
}

#[tokio::test]
async fn invalid_requests_are_unprocessable() {
    let client = common::create_client();

    for body in [
        r#"{"group_by": "sales_sum"}"#,
        r#"{"group_by": "region; DROP TABLE daily_summary"}"#,
        r#"{"top_n": "ten"}"#,
        r#"{"top_n": 2.5}"#,
        r#"{"limit": "all"}"#,
        r#"{"start_date": "2024-01-01""#,
        "not json",
    ] {
        for path in ["/query", "/query/explain"] {
            let res = client
                .post(path)
                .header("Content-Type", "application/json")
                .body(body)
                .send()
                .await;

            assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY, "{path} {body}");
            let error = res.json::<JsonErrorResponse>().await;
            assert!(!error.message.is_empty());
        }
    }
}

#[tokio::test]
async fn missing_content_type_is_unprocessable() {
    let client = common::create_client();

    let res = client.post("/query").body("{}").send().await;

    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn execution_failures_are_opaque() {
    let client = common::create_client();

    let res = client
        .post("/query")
        .header("Content-Type", "application/json")
        .body(r#"{"group_by": "shipper", "top_n": 5}"#)
        .send()
        .await;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let error = res.json::<JsonErrorResponse>().await;
    assert_eq!(error.message, EXECUTION_ERROR_MESSAGE);
}

#[tokio::test]
async fn metrics_are_exposed() {
    let client = common::create_client();

    // a rejected request is neither a query nor an error
    client
        .post("/query")
        .header("Content-Type", "application/json")
        .body(r#"{"group_by": "nope"}"#)
        .send()
        .await;

    let res = client.get("/metrics").send().await;

    assert_eq!(res.status(), StatusCode::OK);
    let body = res.text().await;
    assert!(body.contains("logistics_query_query_total 0"), "{body}");
    assert!(body.contains("logistics_query_error_total 0"), "{body}");
    assert!(
        body.contains("logistics_query_pool_max_connections 50"),
        "{body}"
    );
    assert!(body.contains("logistics_query_query_execution_seconds_count 0"), "{body}");
}

#[tokio::test]
async fn failed_executions_are_counted() {
    let client = common::create_client();

    client
        .post("/query")
        .header("Content-Type", "application/json")
        .body("{}")
        .send()
        .await;

    let body = client.get("/metrics").send().await.text().await;

    assert!(body.contains("logistics_query_error_total 1"), "{body}");
    assert!(body.contains("logistics_query_query_total 0"), "{body}");
}

mod database {
    //! These need a PostgreSQL database with a populated `daily_summary`,
    //! reachable through `DATABASE_URL`.

    use super::*;
    use similar_asserts::assert_eq;

    #[tokio::test]
    #[ignore = "needs a database"]
    async fn query_returns_an_envelope() {
        let client = common::create_database_client().await;

        let res = client
            .post("/query")
            .header("Content-Type", "application/json")
            .body(r#"{"groupBy": "region", "topN": 3}"#)
            .send()
            .await;

        assert_eq!(res.status(), StatusCode::OK);
        let body = res.json::<serde_json::Value>().await;
        let rows = body["rows"].as_array().unwrap();
        assert!(rows.len() <= 3);
        assert_eq!(body["count"], serde_json::json!(rows.len()));
    }

    #[tokio::test]
    #[ignore = "needs a database"]
    async fn explain_returns_the_plan() {
        let client = common::create_database_client().await;

        let res = client
            .post("/query/explain")
            .header("Content-Type", "application/json")
            .body(r#"{"shipper": "ACME"}"#)
            .send()
            .await;

        assert_eq!(res.status(), StatusCode::OK);
        let body = res.json::<serde_json::Value>().await;
        assert_eq!(body["arguments"], serde_json::json!({ "shipper": "ACME" }));
        assert!(!body["plan"].as_str().unwrap().is_empty());
    }
}
