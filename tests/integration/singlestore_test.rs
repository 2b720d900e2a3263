//! SingleStore client tests.
//!
//! These need a reachable server; set SINGLESTORE_URL to run them.

use taxi_glance::config::ConnectionConfig;
use taxi_glance::db::{BackendClient, SingleStoreClient, Value};

/// Helper to create a test client.
fn get_test_client() -> Option<SingleStoreClient> {
    let url = std::env::var("SINGLESTORE_URL").ok()?;
    let config = ConnectionConfig::from_connection_string(&url).ok()?;
    SingleStoreClient::new(config).ok()
}

#[tokio::test]
async fn test_execute_simple_select() {
    let Some(client) = get_test_client() else {
        eprintln!("Skipping test: SINGLESTORE_URL not set");
        return;
    };

    let result = client
        .execute("SELECT 1 AS num, 'hello' AS greeting")
        .await
        .unwrap();

    assert_eq!(result.column_names(), vec!["num", "greeting"]);
    assert_eq!(result.rows, vec![vec![Value::Int(1), Value::from("hello")]]);
}

#[tokio::test]
async fn test_empty_result_keeps_columns() {
    let Some(client) = get_test_client() else {
        eprintln!("Skipping test: SINGLESTORE_URL not set");
        return;
    };

    let result = client
        .execute("SELECT 1 AS num FROM (SELECT 1) AS t WHERE 1 = 0")
        .await
        .unwrap();

    assert_eq!(result.column_names(), vec!["num"]);
    assert!(result.is_empty());
}

#[tokio::test]
async fn test_sql_error_is_query_error() {
    let Some(client) = get_test_client() else {
        eprintln!("Skipping test: SINGLESTORE_URL not set");
        return;
    };

    let err = client
        .execute("SELECT * FROM table_that_does_not_exist")
        .await
        .unwrap_err();
    assert!(err.to_string().starts_with("Query error: ERROR "));

    // Each call opens its own connection, so a failure leaves nothing behind.
    let result = client.execute("SELECT 2 AS num").await.unwrap();
    assert_eq!(result.rows, vec![vec![Value::Int(2)]]);
}
