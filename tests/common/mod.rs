//! Shared test utilities and mock infrastructure.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::Mutex;

use sqlsplit::classify::{classify, QueryKind};
use sqlsplit::config::{Config, DbSettings, ProxySettings};
use sqlsplit::executor::{ExecutorError, QueryExecutor, QueryOutput};
use sqlsplit::probe::Prober;
use sqlsplit::router::Router;
use sqlsplit::server::ProxyServer;
use sqlsplit::strategy::StrategyName;

/// Config for a server bound to an ephemeral local port.
pub fn test_config(manager: &str, workers: &[&str], default_strategy: StrategyName) -> Config {
    Config {
        manager_host: manager.to_string(),
        worker_hosts: workers.iter().map(|w| w.to_string()).collect(),
        db: DbSettings {
            user: "test".to_string(),
            password: "test".to_string(),
            ..DbSettings::default()
        },
        proxy: ProxySettings {
            bind_addr: "127.0.0.1:0".to_string(),
            default_strategy,
            ..ProxySettings::default()
        },
    }
}

/// Executor double: returns scripted shapes, records calls, and tracks the
/// open/close balance of its pretend connections.
pub struct MockExecutor {
    pub rows: Vec<Map<String, Value>>,
    pub affected_rows: u64,
    /// Hosts that fail with a connection error.
    pub failing_hosts: Vec<String>,
    pub calls: Mutex<Vec<(String, String)>>,
    opened: AtomicUsize,
    closed: AtomicUsize,
}

impl MockExecutor {
    pub fn new() -> Self {
        let mut row = Map::new();
        row.insert("actor_id".to_string(), Value::from(1));
        row.insert("first_name".to_string(), Value::from("PENELOPE"));
        Self {
            rows: vec![row],
            affected_rows: 1,
            failing_hosts: Vec::new(),
            calls: Mutex::new(Vec::new()),
            opened: AtomicUsize::new(0),
            closed: AtomicUsize::new(0),
        }
    }

    pub fn failing_on(hosts: &[&str]) -> Self {
        Self {
            failing_hosts: hosts.iter().map(|h| h.to_string()).collect(),
            ..Self::new()
        }
    }

    pub async fn call_count(&self) -> usize {
        self.calls.lock().await.len()
    }

    pub async fn hosts_called(&self) -> Vec<String> {
        self.calls.lock().await.iter().map(|(h, _)| h.clone()).collect()
    }

    /// True when every pretend connection opened was also closed.
    pub fn connections_balanced(&self) -> bool {
        self.opened.load(Ordering::SeqCst) == self.closed.load(Ordering::SeqCst)
    }
}

impl Default for MockExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QueryExecutor for MockExecutor {
    async fn execute(&self, host: &str, query: &str) -> Result<QueryOutput, ExecutorError> {
        self.calls
            .lock()
            .await
            .push((host.to_string(), query.to_string()));

        self.opened.fetch_add(1, Ordering::SeqCst);
        let outcome = if self.failing_hosts.iter().any(|h| h == host) {
            Err(ExecutorError::Connection {
                host: host.to_string(),
                source: sqlx::Error::Io(std::io::Error::new(
                    std::io::ErrorKind::ConnectionRefused,
                    "connection refused",
                )),
            })
        } else {
            match classify(query) {
                QueryKind::Read => Ok(QueryOutput::Rows {
                    rows: self.rows.clone(),
                }),
                QueryKind::Write => Ok(QueryOutput::Affected {
                    affected_rows: self.affected_rows,
                }),
            }
        };
        self.closed.fetch_add(1, Ordering::SeqCst);

        outcome
    }
}

/// Prober returning scripted latencies.
pub struct StaticProber {
    latencies: HashMap<String, f64>,
}

impl StaticProber {
    pub fn new(entries: &[(&str, f64)]) -> Self {
        Self {
            latencies: entries
                .iter()
                .map(|(host, latency)| (host.to_string(), *latency))
                .collect(),
        }
    }

    pub fn unreachable() -> Self {
        Self::new(&[])
    }
}

#[async_trait]
impl Prober for StaticProber {
    async fn probe(&self, host: &str) -> Option<f64> {
        self.latencies.get(host).copied()
    }
}

/// Bind an ephemeral port, spawn the server, and wait for it to serve.
pub async fn spawn_proxy(
    config: &Config,
    executor: Arc<dyn QueryExecutor>,
    prober: Arc<dyn Prober>,
) -> SocketAddr {
    let router = Arc::new(Router::new(
        config.topology(),
        config.proxy.default_strategy,
        prober,
    ));
    let mut server = ProxyServer::with_parts(config, router, executor);
    let addr = server.try_bind().await.expect("failed to bind");

    tokio::spawn(async move {
        let _ = server.run().await;
    });
    tokio::time::sleep(Duration::from_millis(100)).await;

    addr
}
