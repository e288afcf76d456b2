//! Request handlers for the `/sql` and `/health` endpoints.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::classify::QueryKind;
use crate::executor::{QueryExecutor, QueryOutput};
use crate::replication::{replicate_to_workers, ReplicaStatus};
use crate::router::Router;

use super::error::ProxyError;
use super::guard;

/// Shared per-process state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<Router>,
    pub executor: Arc<dyn QueryExecutor>,
    pub replicate_writes: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct SqlRequest {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub strategy: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SqlResponse {
    pub target_host: String,
    pub strategy: &'static str,
    pub message: String,
    pub result: QueryOutput,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replication: Option<Vec<ReplicaStatus>>,
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub role: &'static str,
}

pub async fn handle_health() -> Json<HealthStatus> {
    tracing::debug!("health check");
    Json(HealthStatus {
        status: "ok",
        role: "proxy",
    })
}

pub async fn handle_sql(
    State(state): State<AppState>,
    body: Result<Json<SqlRequest>, JsonRejection>,
) -> Result<Json<SqlResponse>, ProxyError> {
    // A missing or malformed body is handled like an empty one, so the
    // error the client sees is always about the absent query.
    let request = body.map(|Json(body)| body).unwrap_or_default();

    let query = match request.query {
        Some(query) if !query.trim().is_empty() => query,
        _ => return Err(ProxyError::MissingQuery),
    };

    tracing::info!(query = %query, strategy = ?request.strategy, "received /sql request");

    guard::check_statement(&query)?;

    let decision = state
        .router
        .choose_target(&query, request.strategy.as_deref())
        .await;
    tracing::info!(target_host = %decision.target_host, strategy = decision.strategy, "chosen target host");

    let result = state
        .executor
        .execute(&decision.target_host, &query)
        .await?;

    let replication = if decision.kind == QueryKind::Write && state.replicate_writes {
        let workers = &state.router.topology().workers;
        Some(replicate_to_workers(state.executor.as_ref(), workers, &query).await)
    } else {
        None
    };

    let message = format!(
        "Executed {} on {}",
        if decision.kind.is_read() { "READ" } else { "WRITE" },
        decision.target_host
    );

    Ok(Json(SqlResponse {
        target_host: decision.target_host,
        strategy: decision.strategy,
        message,
        result,
        replication,
    }))
}
