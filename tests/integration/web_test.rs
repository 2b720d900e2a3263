//! Web dashboard tests over a real socket.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use reqwest::StatusCode;
use taxi_glance::db::{BackendClient, FailingBackendClient, MockBackendClient};
use taxi_glance::query::QueryExecutor;
use taxi_glance::web;
use tokio::net::TcpListener;

/// Serves the dashboard on an ephemeral port and returns its base URL.
async fn spawn_dashboard(backend: Arc<dyn BackendClient>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = web::router(QueryExecutor::for_backend(backend));
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

async fn sample_dashboard() -> String {
    spawn_dashboard(Arc::new(MockBackendClient::taxi_sample())).await
}

async fn post_query(base: &str, form: &[(&str, &str)]) -> (StatusCode, String) {
    let response = reqwest::Client::new()
        .post(format!("{base}/query"))
        .form(form)
        .send()
        .await
        .unwrap();
    let status = response.status();
    (status, response.text().await.unwrap())
}

#[tokio::test]
async fn test_index_lists_queries() {
    let base = sample_dashboard().await;

    let response = reqwest::get(format!("{base}/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = response.text().await.unwrap();

    assert!(html.contains("<option value=\"Top 10% Earnings\">"));
    assert!(html.contains("<option value=\"Shortest Path\">"));
    assert!(!html.contains("<table>"));
    assert!(!html.contains("class=\"error\""));
}

#[tokio::test]
async fn test_form_submission_renders_results_and_chart() {
    let base = sample_dashboard().await;

    let (status, html) = post_query(&base, &[("query", "Busiest Hours")]).await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("<option value=\"Busiest Hours\" selected>"));
    assert!(html.contains("<h2>Busiest Hours</h2>"));
    assert!(html.contains("<th>hour_of_day</th>"));
    assert!(html.contains("<td>31245</td>"));
    assert!(html.contains("Execution time: 0.52 seconds"));
    assert!(html.contains("Plotly.newPlot('chart'"));
    assert!(html.contains("Busiest Hours of the Week"));
}

#[tokio::test]
async fn test_form_submission_without_chart() {
    let base = sample_dashboard().await;

    let (_, html) = post_query(&base, &[("query", "Shortest Path")]).await;

    assert!(html.contains("<td>10</td><td>20</td><td>0.1</td><td>0.5</td><td>3</td>"));
    assert!(!html.contains("id=\"chart\""));
}

#[tokio::test]
async fn test_invalid_and_missing_selection() {
    let base = sample_dashboard().await;

    let (status, html) = post_query(&base, &[("query", "unknown-query")]).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Invalid or missing query selection: &#39;unknown-query&#39;"));
    assert!(!html.contains("<table>"));

    let (_, html) = post_query(&base, &[]).await;
    assert!(html.contains("<div class=\"error\">Invalid or missing query selection</div>"));
}

#[tokio::test]
async fn test_backend_failure_renders_error_block() {
    let base = spawn_dashboard(Arc::new(FailingBackendClient::unreachable())).await;

    let (status, html) = post_query(&base, &[("query", "Busiest Hours")]).await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("An error occurred: Connection error: Cannot connect to localhost:3306"));
    assert!(html.contains("<pre class=\"sql\">"));
    assert!(!html.contains("<table>"));
    assert!(!html.contains("Execution time"));
}

#[tokio::test]
async fn test_api_lists_definitions() {
    let base = sample_dashboard().await;

    let queries: Vec<serde_json::Value> = reqwest::get(format!("{base}/api/queries"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(queries.len(), 5);
    assert_eq!(queries[0]["name"], "Top 10% Earnings");
    assert!(queries[0]["sql"].as_str().unwrap().contains("earnings_rank"));
    assert!(queries[0]["explanation"].is_string());
}

#[tokio::test]
async fn test_api_runs_query() {
    let base = sample_dashboard().await;

    let response = reqwest::get(format!("{base}/api/queries/Shortest%20Path"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let model: serde_json::Value = response.json().await.unwrap();

    assert_eq!(model["query_name"], "Shortest Path");
    assert_eq!(model["column_names"][2], "shortest_distance");
    assert_eq!(model["rows"][0][0], 10);
    assert_eq!(model["elapsed_seconds"], 0.27);
    assert!(model["error"].is_null());
}

#[tokio::test]
async fn test_api_status_codes_for_failures() {
    let base = sample_dashboard().await;
    let response = reqwest::get(format!("{base}/api/queries/unknown-query"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let model: serde_json::Value = response.json().await.unwrap();
    assert_eq!(model["error_category"], "Invalid Selection");

    let base = spawn_dashboard(Arc::new(FailingBackendClient::unreachable())).await;
    let response = reqwest::get(format!("{base}/api/queries/Busiest%20Hours"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_healthz() {
    let base = sample_dashboard().await;

    let response = reqwest::get(format!("{base}/healthz")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "OK");
}
