//! Query routing: topology, shared routing state, and strategy dispatch.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::classify::{classify, QueryKind};
use crate::probe::Prober;
use crate::strategy::{build_registry, Strategy, StrategyName};

/// The cluster shape: one writable manager and zero or more read replicas.
/// Immutable for the process lifetime, set at startup from configuration.
#[derive(Debug, Clone)]
pub struct Topology {
    pub manager: String,
    pub workers: Vec<String>,
}

impl Topology {
    pub fn new(manager: impl Into<String>, workers: &[String]) -> Self {
        Self {
            manager: manager.into(),
            workers: workers.to_vec(),
        }
    }

    /// Every host a query may legally land on.
    pub fn all_hosts(&self) -> Vec<String> {
        let mut hosts = vec![self.manager.clone()];
        hosts.extend(self.workers.iter().cloned());
        hosts
    }
}

/// Mutable state shared across routing decisions.
///
/// Holds the worker latency cache consumed by the latency-based strategy. The
/// cache is populated lazily on the first latency-routed read and reused for
/// the process lifetime; there is no TTL. [`RoutingState::reset`] exists as an
/// explicit invalidation hook.
pub struct RoutingState {
    worker_latencies: Mutex<HashMap<String, f64>>,
}

impl RoutingState {
    pub fn new() -> Self {
        Self {
            worker_latencies: Mutex::new(HashMap::new()),
        }
    }

    /// Return the cached latencies, probing every worker first if the cache is
    /// empty. The lock is held across the probing pass, so concurrent cold
    /// starts collapse into a single probe sweep.
    pub async fn latencies_or_probe(
        &self,
        workers: &[String],
        prober: &dyn Prober,
    ) -> HashMap<String, f64> {
        let mut cache = self.worker_latencies.lock().await;
        if cache.is_empty() {
            for worker in workers {
                if let Some(latency) = prober.probe(worker).await {
                    cache.insert(worker.clone(), latency);
                }
            }
            if !cache.is_empty() {
                tracing::info!(latencies = ?*cache, "measured worker latencies");
            }
        }
        cache.clone()
    }

    /// Snapshot of the cache without triggering a probe.
    pub async fn snapshot(&self) -> HashMap<String, f64> {
        self.worker_latencies.lock().await.clone()
    }

    /// Drop all cached latencies; the next latency-routed read re-probes.
    pub async fn reset(&self) {
        self.worker_latencies.lock().await.clear();
    }
}

impl Default for RoutingState {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of a routing decision.
#[derive(Debug, Clone)]
pub struct RouteDecision {
    pub target_host: String,
    /// Resolved strategy name, after default fallback.
    pub strategy: &'static str,
    pub kind: QueryKind,
}

/// Owns the topology, the strategy registry, and the shared routing state.
pub struct Router {
    topology: Topology,
    state: RoutingState,
    strategies: HashMap<StrategyName, Box<dyn Strategy>>,
    default_strategy: StrategyName,
}

impl Router {
    pub fn new(topology: Topology, default_strategy: StrategyName, prober: Arc<dyn Prober>) -> Self {
        Self {
            topology,
            state: RoutingState::new(),
            strategies: build_registry(prober),
            default_strategy,
        }
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn state(&self) -> &RoutingState {
        &self.state
    }

    /// Resolve a client-supplied strategy name. Unknown or absent names fall
    /// back to the configured default — availability over strictness, so a
    /// typo in a request degrades service selection instead of failing it.
    fn resolve(&self, name: Option<&str>) -> &dyn Strategy {
        let resolved = name
            .and_then(StrategyName::parse)
            .unwrap_or(self.default_strategy);
        self.strategies[&resolved].as_ref()
    }

    /// Classify the query, resolve the strategy, and pick the target host.
    pub async fn choose_target(&self, query: &str, strategy_name: Option<&str>) -> RouteDecision {
        let kind = classify(query);
        let strategy = self.resolve(strategy_name);
        let target_host = strategy
            .choose_target(kind, &self.topology, &self.state)
            .await;

        tracing::debug!(
            strategy = strategy.name(),
            kind = kind.as_str(),
            %target_host,
            "routing decision"
        );

        RouteDecision {
            target_host,
            strategy: strategy.name(),
            kind,
        }
    }
}
