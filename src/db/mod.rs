//! Backend abstraction layer for taxi-glance.
//!
//! Provides a trait-based interface for executing catalog queries, allowing
//! the SingleStore driver, the Druid SQL API and the in-memory mock to be
//! used interchangeably.

mod druid;
mod mock;
mod singlestore;
mod types;

pub use druid::DruidClient;
pub use mock::{FailingBackendClient, MockBackendClient};
pub use singlestore::SingleStoreClient;
pub use types::{round_seconds, ColumnInfo, QueryResult, Row, Value};

use crate::catalog::Dialect;
use crate::config::Config;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Supported backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    SingleStore,
    Druid,
    Mock,
}

impl BackendKind {
    /// Returns the backend as a string for logs and config.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SingleStore => "singlestore",
            Self::Druid => "druid",
            Self::Mock => "mock",
        }
    }

    /// Parses a backend from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "singlestore" | "mysql" => Some(Self::SingleStore),
            "druid" => Some(Self::Druid),
            "mock" => Some(Self::Mock),
            _ => None,
        }
    }

    /// Returns the SQL dialect the catalog must be rendered in for this backend.
    pub fn dialect(&self) -> Dialect {
        match self {
            Self::SingleStore | Self::Mock => Dialect::SingleStore,
            Self::Druid => Dialect::Druid,
        }
    }
}

impl std::str::FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| {
            format!("Invalid backend: {s}. Expected: singlestore, druid, or mock")
        })
    }
}

/// Creates the backend client selected by the configuration.
///
/// This is the only place that branches on the backend kind.
pub fn create_client(config: &Config) -> Result<Arc<dyn BackendClient>> {
    match config.backend.kind {
        BackendKind::SingleStore => Ok(Arc::new(SingleStoreClient::new(
            config.singlestore.clone(),
        )?)),
        BackendKind::Druid => Ok(Arc::new(DruidClient::new(config.druid.clone())?)),
        BackendKind::Mock => Ok(Arc::new(MockBackendClient::taxi_sample())),
    }
}

/// Trait defining the interface for backend clients.
///
/// Implementations acquire their connection (or HTTP exchange) per call and
/// release it before returning, on success and on failure.
#[async_trait]
pub trait BackendClient: Send + Sync {
    /// Executes a SQL query and returns the results with the elapsed time.
    async fn execute(&self, sql: &str) -> Result<QueryResult>;

    /// Returns which backend this client talks to.
    fn kind(&self) -> BackendKind;
}
