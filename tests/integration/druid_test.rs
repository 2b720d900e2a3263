//! Druid client tests against an in-process fake of the SQL API.

use std::sync::{Arc, Mutex};

use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use pretty_assertions::assert_eq;
use taxi_glance::config::DruidConfig;
use taxi_glance::db::{BackendClient, DruidClient, Value};
use taxi_glance::error::GlanceError;
use taxi_glance::query::QueryExecutor;
use tokio::net::TcpListener;

type Received = Arc<Mutex<Vec<serde_json::Value>>>;

/// Starts a fake Druid that answers every SQL request with `status` and `body`.
async fn spawn_fake_druid(status: StatusCode, body: &'static str) -> (String, Received) {
    let received: Received = Arc::new(Mutex::new(Vec::new()));
    let seen = received.clone();

    let app = Router::new().route(
        "/druid/v2/sql",
        post(move |Json(request): Json<serde_json::Value>| {
            let seen = seen.clone();
            async move {
                seen.lock().unwrap().push(request);
                (status, body)
            }
        }),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), received)
}

fn druid_executor(url: &str) -> QueryExecutor {
    let client = DruidClient::new(DruidConfig::new(url)).unwrap();
    QueryExecutor::for_backend(Arc::new(client))
}

#[tokio::test]
async fn test_busiest_hours_through_druid() {
    let (url, received) = spawn_fake_druid(
        StatusCode::OK,
        r#"[
            {"Year": 2023, "Month": 1, "day_of_week": "Tue", "hour_of_day": 18, "total_trips": 31245},
            {"Year": 2023, "Month": 1, "day_of_week": "Wed", "hour_of_day": 17, "total_trips": 30112}
        ]"#,
    )
    .await;
    let executor = druid_executor(&url);

    let model = executor.run("Busiest Hours").await;

    assert_eq!(model.error, None);
    assert_eq!(
        model.column_names,
        vec!["Year", "Month", "day_of_week", "hour_of_day", "total_trips"]
    );
    assert_eq!(model.rows[0][4], Value::Int(31245));
    assert!(model.elapsed_seconds.is_some());
    let chart = model.chart.expect("busiest hours chart");
    assert_eq!(chart.x, vec![Value::Int(18), Value::Int(17)]);

    let requests = received.lock().unwrap();
    assert_eq!(requests.len(), 1);
    let expected_sql = executor.registry().get("Busiest Hours").unwrap().sql.trim();
    assert_eq!(requests[0]["query"], expected_sql);
    assert_eq!(requests[0]["context"]["enableWindowing"], true);
}

#[tokio::test]
async fn test_windowing_context_can_be_disabled() {
    let (url, received) = spawn_fake_druid(StatusCode::OK, "[]").await;
    let config = DruidConfig {
        enable_windowing: false,
        ..DruidConfig::new(url)
    };
    let client = DruidClient::new(config).unwrap();

    client.execute("SELECT 1").await.unwrap();

    let requests = received.lock().unwrap();
    assert_eq!(requests[0]["query"], "SELECT 1");
    assert!(requests[0]["context"].get("enableWindowing").is_none());
}

#[tokio::test]
async fn test_ragged_and_nested_records_are_normalized() {
    let (url, _) = spawn_fake_druid(
        StatusCode::OK,
        r#"[
            {"payment_type": 1, "avg_tip": 3.37},
            {"payment_type": 2, "stats": {"trips": 10, "share": 0.5}},
            {"avg_tip": null, "payment_type": 3}
        ]"#,
    )
    .await;
    let client = DruidClient::new(DruidConfig::new(url)).unwrap();

    let result = client.execute("SELECT *").await.unwrap();

    assert_eq!(
        result.column_names(),
        vec!["payment_type", "avg_tip", "stats.trips", "stats.share"]
    );
    assert_eq!(
        result.rows,
        vec![
            vec![Value::Int(1), Value::Float(3.37), Value::Null, Value::Null],
            vec![Value::Int(2), Value::Null, Value::Int(10), Value::Float(0.5)],
            vec![Value::Int(3), Value::Null, Value::Null, Value::Null],
        ]
    );
}

#[tokio::test]
async fn test_empty_response_renders_empty_table() {
    let (url, _) = spawn_fake_druid(StatusCode::OK, "[]").await;

    let model = druid_executor(&url).run("Top 10% Earnings").await;

    assert_eq!(model.error, None);
    assert!(model.rows.is_empty());
    assert!(model.column_names.is_empty());
    assert_eq!(model.chart, None);
}

#[tokio::test]
async fn test_bad_request_is_query_error() {
    let (url, _) = spawn_fake_druid(
        StatusCode::BAD_REQUEST,
        r#"{"error":"SQL parse failed","errorMessage":"Encountered \"FROM\""}"#,
    )
    .await;

    let model = druid_executor(&url).run("Busiest Hours").await;

    let error = model.error.unwrap();
    assert!(error.starts_with("An error occurred: Query error: Error with query: 400 - "));
    assert!(error.contains("SQL parse failed"));
    assert_eq!(model.error_category.as_deref(), Some("Query Error"));
    assert!(model.rows.is_empty());
    assert!(model.sql.is_some());
}

#[tokio::test]
async fn test_server_error_is_backend_error() {
    let (url, _) = spawn_fake_druid(StatusCode::INTERNAL_SERVER_ERROR, "broker down").await;
    let client = DruidClient::new(DruidConfig::new(url)).unwrap();

    let err = client.execute("SELECT 1").await.unwrap_err();

    assert_eq!(
        err,
        GlanceError::backend("Error with query: 500 - broker down")
    );
}

#[tokio::test]
async fn test_malformed_body_is_query_error() {
    let (url, _) = spawn_fake_druid(StatusCode::OK, "not json").await;
    let client = DruidClient::new(DruidConfig::new(url)).unwrap();

    let err = client.execute("SELECT 1").await.unwrap_err();

    assert!(matches!(err, GlanceError::Query(_)));
}

#[tokio::test]
async fn test_unreachable_druid_is_connection_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let model = druid_executor(&format!("http://{addr}")).run("Busiest Hours").await;

    assert_eq!(model.error_category.as_deref(), Some("Connection Error"));
    assert!(model.error.unwrap().contains("Failed to connect to Druid"));
}

#[tokio::test]
async fn test_shortest_path_is_not_offered_on_druid() {
    let (url, received) = spawn_fake_druid(StatusCode::OK, "[]").await;
    let executor = druid_executor(&url);

    assert!(!executor.registry().contains("Shortest Path"));
    let model = executor.run("Shortest Path").await;

    assert!(matches!(model.failure, Some(GlanceError::InvalidSelection(_))));
    assert!(received.lock().unwrap().is_empty());
}
