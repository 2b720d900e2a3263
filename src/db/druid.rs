//! Apache Druid backend client.
//!
//! Implements the BackendClient trait on top of Druid's SQL API
//! (`POST /druid/v2/sql`), which answers with a JSON array of row objects.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::config::DruidConfig;
use crate::db::{BackendClient, BackendKind, ColumnInfo, QueryResult, Row, Value};
use crate::error::{GlanceError, Result};

/// Separator used when flattening nested objects into column names.
const NESTED_SEPARATOR: char = '.';

/// Druid SQL API client.
#[derive(Debug, Clone)]
pub struct DruidClient {
    config: DruidConfig,
    client: Client,
}

impl DruidClient {
    /// Creates a new Druid client with the given configuration.
    pub fn new(config: DruidConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| GlanceError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Builds the JSON request body for a query.
    fn build_request<'a>(&self, sql: &'a str) -> DruidRequest<'a> {
        DruidRequest {
            query: sql.trim(),
            context: DruidContext {
                enable_windowing: self.config.enable_windowing.then_some(true),
            },
        }
    }

    /// Sends the request and returns the status and raw body.
    async fn post(&self, request: &DruidRequest<'_>) -> Result<(StatusCode, String)> {
        let url = self.config.sql_endpoint();
        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GlanceError::connection(format!("Request to {url} timed out"))
                } else if e.is_connect() {
                    GlanceError::connection(format!(
                        "Failed to connect to Druid at {url}. Is it running? ({e})"
                    ))
                } else {
                    GlanceError::connection(format!("Request failed: {}", e))
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GlanceError::connection(format!("Failed to read response: {}", e)))?;

        Ok((status, body))
    }
}

#[async_trait]
impl BackendClient for DruidClient {
    async fn execute(&self, sql: &str) -> Result<QueryResult> {
        let request = self.build_request(sql);

        let start = Instant::now();
        let (status, body) = self.post(&request).await?;
        let execution_time = start.elapsed();

        debug!(%status, elapsed = ?execution_time, "Druid responded");

        if status != StatusCode::OK {
            let msg = format!("Error with query: {} - {}", status.as_u16(), body);
            return Err(if status == StatusCode::BAD_REQUEST {
                GlanceError::query(msg)
            } else {
                GlanceError::backend(msg)
            });
        }

        let records: Vec<serde_json::Value> = serde_json::from_str(&body)
            .map_err(|e| GlanceError::query(format!("Failed to parse response: {}", e)))?;

        Ok(normalize_records(&records)?.with_execution_time(execution_time))
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Druid
    }
}

/// Druid SQL API request body.
#[derive(Debug, Serialize)]
struct DruidRequest<'a> {
    query: &'a str,
    context: DruidContext,
}

#[derive(Debug, Serialize)]
struct DruidContext {
    #[serde(rename = "enableWindowing", skip_serializing_if = "Option::is_none")]
    enable_windowing: Option<bool>,
}

/// Turns a JSON array of row objects into a positional result.
///
/// Columns are the union of keys in order of first appearance, nested objects
/// become dotted column names, and keys missing from a record are NULL.
pub(crate) fn normalize_records(records: &[serde_json::Value]) -> Result<QueryResult> {
    let mut flattened = Vec::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        let serde_json::Value::Object(object) = record else {
            return Err(GlanceError::query(format!(
                "Failed to parse response: row {index} is not a JSON object"
            )));
        };
        let mut fields = Vec::with_capacity(object.len());
        flatten_object("", object, &mut fields);
        flattened.push(fields);
    }

    let mut columns: Vec<ColumnInfo> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();
    for fields in &flattened {
        for (name, _) in fields {
            if !positions.contains_key(name) {
                positions.insert(name.clone(), columns.len());
                columns.push(ColumnInfo::new(name.clone(), "json"));
            }
        }
    }

    let rows: Vec<Row> = flattened
        .into_iter()
        .map(|fields| {
            let mut row = vec![Value::Null; columns.len()];
            for (name, value) in fields {
                row[positions[&name]] = Value::from_json(value);
            }
            row
        })
        .collect();

    QueryResult::with_data(columns, rows)
}

fn flatten_object<'a>(
    prefix: &str,
    object: &'a serde_json::Map<String, serde_json::Value>,
    out: &mut Vec<(String, &'a serde_json::Value)>,
) {
    for (key, value) in object {
        let name = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}{NESTED_SEPARATOR}{key}")
        };
        match value {
            serde_json::Value::Object(nested) if !nested.is_empty() => {
                flatten_object(&name, nested, out)
            }
            other => out.push((name, other)),
        }
    }
}
