//! SingleStore backend client implementation.
//!
//! Provides the `SingleStoreClient` struct that implements the `BackendClient` trait
//! over the MySQL wire protocol using sqlx. Every execution opens its own
//! connection and closes it before returning.

use crate::config::ConnectionConfig;
use crate::db::{BackendClient, BackendKind, ColumnInfo, QueryResult, Row, Value};
use crate::error::{GlanceError, Result};
use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection, MySqlRow};
use sqlx::{
    Column as SqlxColumn, ConnectOptions, Connection, Executor, Row as SqlxRow, Statement,
    TypeInfo,
};
use std::time::Instant;
use tracing::{debug, warn};

/// SingleStore database client.
#[derive(Debug, Clone)]
pub struct SingleStoreClient {
    config: ConnectionConfig,
    options: MySqlConnectOptions,
}

impl SingleStoreClient {
    /// Creates a client for the given connection settings.
    ///
    /// No connection is opened until a query runs.
    pub fn new(config: ConnectionConfig) -> Result<Self> {
        let database = config.require_database()?;

        let mut options = MySqlConnectOptions::new()
            .host(config.host.as_deref().unwrap_or("localhost"))
            .port(config.effective_port())
            .database(database);
        if let Some(user) = &config.user {
            options = options.username(user);
        }
        if let Some(password) = &config.password {
            options = options.password(password);
        }

        Ok(Self { config, options })
    }

    /// Opens a fresh connection.
    async fn open(&self) -> Result<MySqlConnection> {
        debug!("Connecting to {}", self.config.display_string());
        self.options
            .connect()
            .await
            .map_err(|e| map_connection_error(e, &self.config))
    }

    /// Fetches column metadata for a statement that returned no rows.
    async fn describe_columns(conn: &mut MySqlConnection, sql: &str) -> Vec<ColumnInfo> {
        match conn.prepare(sql).await {
            Ok(statement) => statement
                .columns()
                .iter()
                .map(|col| ColumnInfo::new(col.name(), col.type_info().name()))
                .collect(),
            Err(e) => {
                debug!("Could not describe empty result: {e}");
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl BackendClient for SingleStoreClient {
    async fn execute(&self, sql: &str) -> Result<QueryResult> {
        let mut conn = self.open().await?;

        let start = Instant::now();
        let fetched = sqlx::query(sql).fetch_all(&mut conn).await;
        let execution_time = start.elapsed();

        let outcome = match fetched {
            Ok(rows) => {
                let columns: Vec<ColumnInfo> = match rows.first() {
                    Some(first_row) => first_row
                        .columns()
                        .iter()
                        .map(|col| ColumnInfo::new(col.name(), col.type_info().name()))
                        .collect(),
                    None => Self::describe_columns(&mut conn, sql).await,
                };
                let rows: Vec<Row> = rows.iter().map(convert_row).collect();
                QueryResult::with_data(columns, rows)
            }
            Err(e) => Err(GlanceError::query(format_query_error(e))),
        };

        // Released on both paths; a failed close does not mask the query outcome.
        if let Err(e) = conn.close().await {
            warn!("Failed to close SingleStore connection: {e}");
        }

        Ok(outcome?.with_execution_time(execution_time))
    }

    fn kind(&self) -> BackendKind {
        BackendKind::SingleStore
    }
}

/// Converts a sqlx MySqlRow to our Row type.
fn convert_row(row: &MySqlRow) -> Row {
    row.columns()
        .iter()
        .enumerate()
        .map(|(i, col)| convert_value(row, i, col.type_info().name()))
        .collect()
}

/// Converts a single column value from a MySqlRow to our Value type.
fn convert_value(row: &MySqlRow, index: usize, type_name: &str) -> Value {
    let type_name = type_name.to_uppercase();

    if type_name.ends_with("UNSIGNED") {
        return row
            .try_get::<Option<u64>, _>(index)
            .ok()
            .flatten()
            .map(|v| match i64::try_from(v) {
                Ok(i) => Value::Int(i),
                Err(_) => Value::Float(v as f64),
            })
            .unwrap_or(Value::Null);
    }

    match type_name.as_str() {
        "NULL" => Value::Null,

        "BOOLEAN" => row
            .try_get::<Option<bool>, _>(index)
            .ok()
            .flatten()
            .map(Value::Bool)
            .unwrap_or(Value::Null),

        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => row
            .try_get::<Option<i64>, _>(index)
            .ok()
            .flatten()
            .map(Value::Int)
            .unwrap_or(Value::Null),

        "FLOAT" => row
            .try_get::<Option<f32>, _>(index)
            .ok()
            .flatten()
            .map(|v| Value::Float(v as f64))
            .unwrap_or(Value::Null),

        "DOUBLE" => row
            .try_get::<Option<f64>, _>(index)
            .ok()
            .flatten()
            .map(Value::Float)
            .unwrap_or(Value::Null),

        // AVG() and friends come back as DECIMAL, which travels as text.
        "DECIMAL" => row
            .try_get_unchecked::<Option<String>, _>(index)
            .ok()
            .flatten()
            .map(|s| match s.parse::<f64>() {
                Ok(f) => Value::Float(f),
                Err(_) => Value::String(s),
            })
            .unwrap_or(Value::Null),

        "DATETIME" | "TIMESTAMP" => row
            .try_get::<Option<chrono::NaiveDateTime>, _>(index)
            .ok()
            .flatten()
            .map(|v| Value::String(v.to_string()))
            .unwrap_or(Value::Null),

        "DATE" => row
            .try_get::<Option<chrono::NaiveDate>, _>(index)
            .ok()
            .flatten()
            .map(|v| Value::String(v.to_string()))
            .unwrap_or(Value::Null),

        "TIME" => row
            .try_get::<Option<chrono::NaiveTime>, _>(index)
            .ok()
            .flatten()
            .map(|v| Value::String(v.to_string()))
            .unwrap_or(Value::Null),

        "BINARY" | "VARBINARY" | "BLOB" | "TINYBLOB" | "MEDIUMBLOB" | "LONGBLOB" => row
            .try_get::<Option<Vec<u8>>, _>(index)
            .ok()
            .flatten()
            .map(Value::Bytes)
            .unwrap_or(Value::Null),

        // For all other types, try to get as string
        _ => row
            .try_get_unchecked::<Option<String>, _>(index)
            .ok()
            .flatten()
            .map(Value::String)
            .unwrap_or(Value::Null),
    }
}

/// Maps sqlx connection errors to user-friendly messages, keeping the driver text.
fn map_connection_error(error: sqlx::Error, config: &ConnectionConfig) -> GlanceError {
    let host = config.host.as_deref().unwrap_or("localhost");
    let port = config.effective_port();
    let user = config.user.as_deref().unwrap_or("unknown");
    let database = config.database.as_deref().unwrap_or("unknown");

    let error_str = error.to_string().to_lowercase();

    if error_str.contains("connection refused") || error_str.contains("could not connect") {
        GlanceError::connection(format!(
            "Cannot connect to {host}:{port}. Check that the server is running. ({error})"
        ))
    } else if error_str.contains("access denied") {
        GlanceError::connection(format!(
            "Authentication failed for user '{user}'. Check your credentials. ({error})"
        ))
    } else if error_str.contains("unknown database") {
        GlanceError::connection(format!("Database '{database}' does not exist. ({error})"))
    } else if error_str.contains("timed out") || error_str.contains("timeout") {
        GlanceError::connection(format!(
            "Connection to {host}:{port} timed out. The server may be overloaded or unreachable. ({error})"
        ))
    } else {
        GlanceError::connection(error.to_string())
    }
}

/// Formats a query error with the MySQL error number and SQLSTATE when available.
fn format_query_error(error: sqlx::Error) -> String {
    let Some(db_error) = error.as_database_error() else {
        return error.to_string();
    };

    match db_error.try_downcast_ref::<sqlx::mysql::MySqlDatabaseError>() {
        Some(mysql_error) => match mysql_error.code() {
            Some(state) => format!(
                "ERROR {} ({}): {}",
                mysql_error.number(),
                state,
                mysql_error.message()
            ),
            None => format!("ERROR {}: {}", mysql_error.number(), mysql_error.message()),
        },
        None => format!("ERROR: {}", db_error.message()),
    }
}
