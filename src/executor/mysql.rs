//! sqlx-backed executor opening one MySQL connection per call.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::{Map, Value};
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection, MySqlRow};
use sqlx::{Column, Connection, Row};
use tokio::time::timeout;

use crate::classify::{classify, QueryKind};
use crate::config::DbSettings;

use super::{ExecutorError, QueryExecutor, QueryOutput};

/// Bound on the connection attempt so one hung worker cannot stall the whole
/// request path.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(3);

pub struct MySqlExecutor {
    db: DbSettings,
}

impl MySqlExecutor {
    pub fn new(db: DbSettings) -> Self {
        Self { db }
    }

    fn connect_options(&self, host: &str) -> MySqlConnectOptions {
        MySqlConnectOptions::new()
            .host(host)
            .port(self.db.port)
            .username(&self.db.user)
            .password(&self.db.password)
            .database(&self.db.database)
    }
}

#[async_trait]
impl QueryExecutor for MySqlExecutor {
    async fn execute(&self, host: &str, query: &str) -> Result<QueryOutput, ExecutorError> {
        let options = self.connect_options(host);
        let mut conn = match timeout(CONNECT_TIMEOUT, MySqlConnection::connect_with(&options)).await
        {
            Ok(Ok(conn)) => conn,
            Ok(Err(source)) => {
                return Err(ExecutorError::Connection {
                    host: host.to_string(),
                    source,
                })
            }
            Err(_) => {
                return Err(ExecutorError::ConnectTimeout {
                    host: host.to_string(),
                    seconds: CONNECT_TIMEOUT.as_secs(),
                })
            }
        };

        let outcome = run_statement(&mut conn, query).await;

        // Release the connection before interpreting the outcome; failed
        // statements must not leak it.
        if let Err(err) = conn.close().await {
            tracing::debug!(host, %err, "error closing connection");
        }

        outcome.map_err(|source| ExecutorError::Query {
            host: host.to_string(),
            source,
        })
    }
}

async fn run_statement(
    conn: &mut MySqlConnection,
    query: &str,
) -> Result<QueryOutput, sqlx::Error> {
    match classify(query) {
        QueryKind::Read => {
            let rows = sqlx::query(query).fetch_all(&mut *conn).await?;
            tracing::info!(row_count = rows.len(), "read returned rows");
            Ok(QueryOutput::Rows {
                rows: rows.iter().map(row_to_map).collect(),
            })
        }
        QueryKind::Write => {
            let result = sqlx::query(query).execute(&mut *conn).await?;
            tracing::info!(affected = result.rows_affected(), "write applied");
            Ok(QueryOutput::Affected {
                affected_rows: result.rows_affected(),
            })
        }
    }
}

fn row_to_map(row: &MySqlRow) -> Map<String, Value> {
    let mut map = Map::new();
    for (index, column) in row.columns().iter().enumerate() {
        map.insert(column.name().to_string(), decode_column(row, index));
    }
    map
}

/// Decode a column to JSON by trying progressively looser representations.
/// Columns with no JSON-friendly decoding (exotic or unsupported types) come
/// back as null rather than failing the whole row.
fn decode_column(row: &MySqlRow, index: usize) -> Value {
    if let Ok(value) = row.try_get::<Option<i64>, _>(index) {
        return value.map(Value::from).unwrap_or(Value::Null);
    }
    if let Ok(value) = row.try_get::<Option<u64>, _>(index) {
        return value.map(Value::from).unwrap_or(Value::Null);
    }
    if let Ok(value) = row.try_get::<Option<f64>, _>(index) {
        return value.map(Value::from).unwrap_or(Value::Null);
    }
    if let Ok(value) = row.try_get::<Option<String>, _>(index) {
        return value.map(Value::from).unwrap_or(Value::Null);
    }
    if let Ok(value) = row.try_get::<Option<NaiveDateTime>, _>(index) {
        return value
            .map(|dt| Value::from(dt.to_string()))
            .unwrap_or(Value::Null);
    }
    if let Ok(value) = row.try_get::<Option<NaiveDate>, _>(index) {
        return value
            .map(|d| Value::from(d.to_string()))
            .unwrap_or(Value::Null);
    }
    if let Ok(value) = row.try_get::<Option<Vec<u8>>, _>(index) {
        return value
            .map(|bytes| Value::from(String::from_utf8_lossy(&bytes).into_owned()))
            .unwrap_or(Value::Null);
    }
    Value::Null
}
