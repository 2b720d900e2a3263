//! Catalog query execution.
//!
//! Looks a query up in the registry, runs it on the configured backend and
//! shapes the outcome into a [`RenderModel`]. Every failure ends up in the
//! model's `error` field; nothing escapes to the presentation layer.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::catalog::{QueryDefinition, QueryRegistry};
use crate::db::{BackendClient, BackendKind, QueryResult, Row};
use crate::error::GlanceError;
use crate::query::chart::{derive_chart, ChartSpec};

/// Everything the presentation layer needs for one query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderModel {
    /// Requested query name (absent when none was selected).
    pub query_name: Option<String>,
    pub sql: Option<String>,
    pub explanation: Option<String>,
    pub column_names: Vec<String>,
    pub rows: Vec<Row>,
    /// Backend time in seconds, rounded to two decimals.
    pub elapsed_seconds: Option<f64>,
    pub chart: Option<ChartSpec>,
    /// User-facing error message.
    pub error: Option<String>,
    /// Error category label, set together with `error`.
    pub error_category: Option<String>,
    /// The failure behind `error`, for callers that branch on it.
    #[serde(skip)]
    pub failure: Option<GlanceError>,
}

impl RenderModel {
    /// Model for a name that is not in the registry.
    fn invalid_selection(query_name: &str, err: &GlanceError) -> Self {
        Self {
            query_name: (!query_name.is_empty()).then(|| query_name.to_string()),
            error: Some(err.to_string()),
            error_category: Some(err.category().to_string()),
            failure: Some(err.clone()),
            ..Self::default()
        }
    }

    /// Model for a backend failure: keeps the query text, drops the rows.
    fn execution_failed(definition: &QueryDefinition, err: &GlanceError) -> Self {
        Self {
            query_name: Some(definition.name.clone()),
            sql: Some(definition.sql.clone()),
            explanation: Some(definition.explanation.clone()),
            error: Some(format!("An error occurred: {err}")),
            error_category: Some(err.category().to_string()),
            failure: Some(err.clone()),
            ..Self::default()
        }
    }

    /// Model for a successful execution.
    fn succeeded(definition: &QueryDefinition, result: QueryResult) -> Self {
        let chart = derive_chart(&definition.name, &result);
        if chart.is_none() {
            debug!(query = %definition.name, "No chart for result");
        }

        Self {
            query_name: Some(definition.name.clone()),
            sql: Some(definition.sql.clone()),
            explanation: Some(definition.explanation.clone()),
            column_names: result.column_names(),
            elapsed_seconds: Some(result.elapsed_seconds()),
            rows: result.rows,
            chart,
            error: None,
            error_category: None,
            failure: None,
        }
    }

    /// Returns true if the model carries an error.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Runs catalog queries against one backend.
///
/// Holds only shared, immutable state, so one executor serves concurrent requests.
#[derive(Clone)]
pub struct QueryExecutor {
    registry: Arc<QueryRegistry>,
    backend: Arc<dyn BackendClient>,
}

impl std::fmt::Debug for QueryExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryExecutor")
            .field("queries", &self.registry.keys())
            .field("backend", &self.backend.kind())
            .finish()
    }
}

impl QueryExecutor {
    /// Creates a new query executor.
    pub fn new(registry: Arc<QueryRegistry>, backend: Arc<dyn BackendClient>) -> Self {
        Self { registry, backend }
    }

    /// Creates an executor using the catalog in the backend's own dialect.
    pub fn for_backend(backend: Arc<dyn BackendClient>) -> Self {
        let registry = QueryRegistry::for_dialect(backend.kind().dialect());
        Self::new(Arc::new(registry), backend)
    }

    pub fn registry(&self) -> &QueryRegistry {
        &self.registry
    }

    pub fn backend_kind(&self) -> BackendKind {
        self.backend.kind()
    }

    /// Runs the named query and shapes the outcome for display.
    pub async fn run(&self, query_name: &str) -> RenderModel {
        let definition = match self.registry.get(query_name) {
            Ok(definition) => definition,
            Err(e) => {
                warn!(query = query_name, "Rejected query selection");
                return RenderModel::invalid_selection(query_name, &e);
            }
        };

        info!(query = query_name, backend = self.backend.kind().as_str(), "Running query");

        match self.backend.execute(&definition.sql).await {
            Ok(result) => {
                info!(
                    query = query_name,
                    rows = result.row_count(),
                    elapsed = ?result.execution_time,
                    "Query finished"
                );
                RenderModel::succeeded(definition, result)
            }
            Err(e) => {
                warn!(query = query_name, "{}: {}", e.category(), e);
                RenderModel::execution_failed(definition, &e)
            }
        }
    }
}
