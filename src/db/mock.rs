//! Mock backend clients for testing.
//!
//! Provides in-memory backend implementations for tests and for running the
//! dashboard without a database (`--mock-db`).

use super::{BackendClient, BackendKind, ColumnInfo, QueryResult, Value};
use crate::catalog::{Dialect, QueryRegistry};
use crate::error::{GlanceError, Result};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// A mock backend client that returns predefined results.
///
/// Responses are keyed by the trimmed SQL text; anything else gets the fallback result.
#[derive(Debug, Default)]
pub struct MockBackendClient {
    responses: Vec<(String, QueryResult)>,
    fallback: QueryResult,
    calls: AtomicUsize,
    executed: Mutex<Vec<String>>,
}

impl MockBackendClient {
    /// Creates a mock that answers every query with an empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock that answers every query with the given result.
    pub fn with_result(result: QueryResult) -> Self {
        Self {
            fallback: result,
            ..Self::default()
        }
    }

    /// Adds a response for one specific SQL text.
    pub fn with_response(mut self, sql: &str, result: QueryResult) -> Self {
        self.responses.push((sql.trim().to_string(), result));
        self
    }

    /// Creates a mock pre-loaded with small taxi results for every catalog query.
    pub fn taxi_sample() -> Self {
        let registry = QueryRegistry::for_dialect(Dialect::SingleStore);
        let mut mock = Self::new();

        for (name, result) in sample_results() {
            if let Ok(definition) = registry.get(name) {
                mock = mock.with_response(&definition.sql, result);
            }
        }

        mock
    }

    /// Returns how many times `execute` was called.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Returns the SQL texts executed so far, in order.
    pub fn executed(&self) -> Vec<String> {
        self.executed
            .lock()
            .map(|executed| executed.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl BackendClient for MockBackendClient {
    async fn execute(&self, sql: &str) -> Result<QueryResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.executed
            .lock()
            .map_err(|_| GlanceError::internal("mock call log poisoned"))?
            .push(sql.to_string());

        let trimmed = sql.trim();
        let result = self
            .responses
            .iter()
            .find(|(key, _)| key == trimmed)
            .map(|(_, result)| result)
            .unwrap_or(&self.fallback);

        Ok(result.clone())
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Mock
    }
}

/// A backend client that always fails with the configured error.
#[derive(Debug)]
pub struct FailingBackendClient {
    error: GlanceError,
    calls: AtomicUsize,
}

impl FailingBackendClient {
    /// Creates a client failing with the given error.
    pub fn new(error: GlanceError) -> Self {
        Self {
            error,
            calls: AtomicUsize::new(0),
        }
    }

    /// Creates a client that behaves like an unreachable server.
    pub fn unreachable() -> Self {
        Self::new(GlanceError::connection(
            "Cannot connect to localhost:3306. Check that the server is running.",
        ))
    }

    /// Returns how many times `execute` was called.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BackendClient for FailingBackendClient {
    async fn execute(&self, _sql: &str) -> Result<QueryResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(self.error.clone())
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Mock
    }
}

fn columns(names: &[&str]) -> Vec<ColumnInfo> {
    names
        .iter()
        .map(|name| ColumnInfo::new(*name, "mock"))
        .collect()
}

fn sample(names: &[&str], rows: Vec<Vec<Value>>, millis: u64) -> QueryResult {
    QueryResult {
        columns: columns(names),
        rows,
        execution_time: Duration::from_millis(millis),
    }
}

fn sample_results() -> Vec<(&'static str, QueryResult)> {
    vec![
        (
            "Top 10% Earnings",
            sample(
                &["total_earnings", "earnings_rank", "total_count"],
                vec![
                    vec![Value::Float(512.5), Value::Int(1), Value::Int(3_000_000)],
                    vec![Value::Float(498.0), Value::Int(2), Value::Int(3_000_000)],
                    vec![Value::Float(476.25), Value::Int(3), Value::Int(3_000_000)],
                ],
                840,
            ),
        ),
        (
            "Payment Type Dynamics",
            sample(
                &[
                    "payment_type",
                    "avg_tip",
                    "trip_count",
                    "difference",
                    "percent_change",
                ],
                vec![
                    vec![
                        Value::from("Credit card"),
                        Value::Float(3.37),
                        Value::Int(2_210_000),
                        Value::Float(0.0),
                        Value::Float(0.0),
                    ],
                    vec![
                        Value::from("Dispute"),
                        Value::Float(0.06),
                        Value::Int(15_000),
                        Value::Float(-3.31),
                        Value::Float(-98.22),
                    ],
                    vec![
                        Value::from("Cash"),
                        Value::Float(0.0),
                        Value::Int(540_000),
                        Value::Float(-3.37),
                        Value::Float(-100.0),
                    ],
                ],
                310,
            ),
        ),
        (
            "Dynamic Pricing Analysis",
            sample(
                &["RatecodeID", "day_of_week", "hour_of_day", "avg_fare_per_mile"],
                vec![
                    vec![Value::Int(1), Value::from("Fri"), Value::Int(0), Value::Float(6.91)],
                    vec![Value::Int(1), Value::from("Fri"), Value::Int(1), Value::Float(6.54)],
                ],
                450,
            ),
        ),
        (
            "Busiest Hours",
            sample(
                &["Year", "Month", "day_of_week", "hour_of_day", "total_trips"],
                vec![
                    vec![
                        Value::Int(2023),
                        Value::Int(1),
                        Value::from("Tue"),
                        Value::Int(18),
                        Value::Int(31_245),
                    ],
                    vec![
                        Value::Int(2023),
                        Value::Int(1),
                        Value::from("Wed"),
                        Value::Int(18),
                        Value::Int(30_112),
                    ],
                ],
                520,
            ),
        ),
        (
            "Shortest Path",
            sample(
                &[
                    "PULocationID",
                    "DOLocationID",
                    "shortest_distance",
                    "avg_distance",
                    "trip_count",
                ],
                vec![vec![
                    Value::Int(10),
                    Value::Int(20),
                    Value::Float(0.1),
                    Value::Float(0.5),
                    Value::Int(3),
                ]],
                270,
            ),
        ),
    ]
}
