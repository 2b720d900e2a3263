//! End-to-end pipeline tests over the in-memory sample backend.
//!
//! Registry lookup, backend execution, chart derivation and error shaping.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use taxi_glance::catalog::{Dialect, QueryRegistry};
use taxi_glance::db::{FailingBackendClient, MockBackendClient};
use taxi_glance::error::GlanceError;
use taxi_glance::query::QueryExecutor;

fn sample_executor() -> QueryExecutor {
    QueryExecutor::for_backend(Arc::new(MockBackendClient::taxi_sample()))
}

#[tokio::test]
async fn test_every_catalog_query_renders() {
    let executor = sample_executor();
    let names: Vec<String> = executor
        .registry()
        .keys()
        .into_iter()
        .map(String::from)
        .collect();

    assert_eq!(
        names,
        vec![
            "Top 10% Earnings",
            "Payment Type Dynamics",
            "Dynamic Pricing Analysis",
            "Busiest Hours",
            "Shortest Path",
        ]
    );

    for name in &names {
        let model = executor.run(name).await;
        assert!(!model.is_error(), "{name} failed: {:?}", model.error);
        assert!(!model.rows.is_empty(), "{name} returned no rows");
        assert!(model.rows.iter().all(|row| row.len() == model.column_names.len()));
        assert!(model.elapsed_seconds.is_some());
    }
}

#[tokio::test]
async fn test_charts_only_for_charted_queries() {
    let executor = sample_executor();

    let payment = executor.run("Payment Type Dynamics").await;
    let chart = payment.chart.expect("payment chart");
    assert_eq!(chart.title, "Average Tip by Payment Type");
    assert_eq!(chart.x_field, "payment_type");
    assert_eq!(chart.y_field, "avg_tip");
    assert_eq!(chart.x.len(), payment.rows.len());

    let busiest = executor.run("Busiest Hours").await;
    let chart = busiest.chart.expect("busiest hours chart");
    assert_eq!(chart.title, "Busiest Hours of the Week");
    assert_eq!(chart.y.len(), busiest.rows.len());

    for name in ["Top 10% Earnings", "Dynamic Pricing Analysis", "Shortest Path"] {
        assert_eq!(executor.run(name).await.chart, None, "{name} should not chart");
    }
}

#[tokio::test]
async fn test_sample_timing_is_rounded() {
    let model = sample_executor().run("Busiest Hours").await;
    assert_eq!(model.elapsed_seconds, Some(0.52));
}

#[tokio::test]
async fn test_unknown_selection_never_reaches_backend() {
    let backend = Arc::new(MockBackendClient::taxi_sample());
    let executor = QueryExecutor::for_backend(backend.clone());

    for name in ["unknown-query", "", "busiest hours"] {
        let model = executor.run(name).await;
        assert!(matches!(model.failure, Some(GlanceError::InvalidSelection(_))));
        assert!(model.sql.is_none());
    }

    assert_eq!(backend.call_count(), 0);
}

#[tokio::test]
async fn test_backend_failure_keeps_query_text() {
    let backend = Arc::new(FailingBackendClient::new(GlanceError::query(
        "ERROR 1146 (42S02): Table 'nyc_taxi.yellow_tripdata_pl_new' doesn't exist",
    )));
    let executor = QueryExecutor::new(
        Arc::new(QueryRegistry::for_dialect(Dialect::SingleStore)),
        backend.clone(),
    );

    let model = executor.run("Top 10% Earnings").await;

    assert_eq!(
        model.error.as_deref(),
        Some("An error occurred: Query error: ERROR 1146 (42S02): Table 'nyc_taxi.yellow_tripdata_pl_new' doesn't exist")
    );
    assert_eq!(model.error_category.as_deref(), Some("Query Error"));
    assert!(model.sql.unwrap().contains("yellow_tripdata_pl_new"));
    assert!(model.rows.is_empty());
    assert_eq!(backend.call_count(), 1);
}

#[tokio::test]
async fn test_concurrent_runs_share_one_executor() {
    let executor = sample_executor();

    let handles: Vec<_> = ["Busiest Hours", "Shortest Path", "Top 10% Earnings"]
        .into_iter()
        .map(|name| {
            let executor = executor.clone();
            tokio::spawn(async move { executor.run(name).await })
        })
        .collect();

    for handle in handles {
        let model = handle.await.unwrap();
        assert!(!model.is_error());
    }
}
