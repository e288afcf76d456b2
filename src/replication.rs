//! Best-effort fan-out of committed writes to every worker.
//!
//! This is the app-level alternative to database-native binlog replication:
//! after the manager commit succeeds, the same statement is replayed on each
//! worker and the per-worker outcome rides along in the response. Partial
//! failure is informational, never a request failure. Deployments using
//! binlog replication must leave this disabled or writes apply twice.

use serde::Serialize;

use crate::executor::QueryExecutor;

/// Outcome of replaying a write on one worker.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ReplicaStatus {
    pub host: String,
    pub status: String,
}

/// Replay `query` on every worker, collecting per-worker outcomes.
pub async fn replicate_to_workers(
    executor: &dyn QueryExecutor,
    workers: &[String],
    query: &str,
) -> Vec<ReplicaStatus> {
    let mut results = Vec::with_capacity(workers.len());
    for worker in workers {
        let status = match executor.execute(worker, query).await {
            Ok(_) => "OK".to_string(),
            Err(err) => {
                tracing::warn!(host = %worker, %err, "replication to worker failed");
                format!("ERROR: {}", err.detail())
            }
        };
        results.push(ReplicaStatus {
            host: worker.clone(),
            status,
        });
    }
    results
}
