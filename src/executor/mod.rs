//! Query execution against a chosen database host.
//!
//! The executor is a trait seam so the HTTP layer and the replication fan-out
//! can be exercised in tests with a scripted double instead of a live MySQL.

mod mysql;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

pub use mysql::MySqlExecutor;

/// Normalized result shape: reads produce rows, writes an affected count.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QueryOutput {
    Rows { rows: Vec<Map<String, Value>> },
    Affected { affected_rows: u64 },
}

/// Errors surfaced by an executor. Connection problems are kept apart from
/// query problems so the HTTP layer can name the unreachable host.
#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error("MySQL connection error on '{host}'")]
    Connection {
        host: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("MySQL connection to '{host}' timed out after {seconds}s")]
    ConnectTimeout { host: String, seconds: u64 },

    #[error("MySQL query error on '{host}'")]
    Query {
        host: String,
        #[source]
        source: sqlx::Error,
    },
}

impl ExecutorError {
    pub fn host(&self) -> &str {
        match self {
            ExecutorError::Connection { host, .. }
            | ExecutorError::ConnectTimeout { host, .. }
            | ExecutorError::Query { host, .. } => host,
        }
    }

    /// Driver-level detail for error responses.
    pub fn detail(&self) -> String {
        match self {
            ExecutorError::Connection { source, .. } | ExecutorError::Query { source, .. } => {
                source.to_string()
            }
            ExecutorError::ConnectTimeout { seconds, .. } => {
                format!("connect timed out after {seconds}s")
            }
        }
    }
}

/// Executes a statement on a specific host.
///
/// Implementations open a fresh connection per call and guarantee it is
/// released on every exit path, success or failure.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    async fn execute(&self, host: &str, query: &str) -> Result<QueryOutput, ExecutorError>;
}
