//! Latency-based read routing (the `custom` strategy).

use std::sync::Arc;

use async_trait::async_trait;

use crate::classify::QueryKind;
use crate::probe::Prober;
use crate::router::{RoutingState, Topology};

use super::Strategy;

/// Writes go to the manager; reads go to the worker with the lowest measured
/// round-trip latency.
///
/// Latencies are measured once per process, on the first read routed through
/// this strategy, and cached in [`RoutingState`] for the process lifetime.
/// [`RoutingState::reset`] is the hook for forcing a re-measure.
pub struct LatencyStrategy {
    prober: Arc<dyn Prober>,
}

impl LatencyStrategy {
    pub fn new(prober: Arc<dyn Prober>) -> Self {
        Self { prober }
    }
}

#[async_trait]
impl Strategy for LatencyStrategy {
    fn name(&self) -> &'static str {
        "custom"
    }

    async fn choose_target(
        &self,
        kind: QueryKind,
        topology: &Topology,
        state: &RoutingState,
    ) -> String {
        if kind == QueryKind::Write || topology.workers.is_empty() {
            return topology.manager.clone();
        }

        let latencies = state
            .latencies_or_probe(&topology.workers, self.prober.as_ref())
            .await;

        if latencies.is_empty() {
            tracing::warn!("no worker responded to probing, falling back to manager");
            return topology.manager.clone();
        }

        // Strictly-lowest latency wins; ties go to the worker listed first.
        let mut best: Option<(&str, f64)> = None;
        for worker in &topology.workers {
            if let Some(&latency) = latencies.get(worker.as_str()) {
                match best {
                    Some((_, current)) if latency >= current => {}
                    _ => best = Some((worker, latency)),
                }
            }
        }

        match best {
            Some((worker, _)) => worker.to_string(),
            None => topology.manager.clone(),
        }
    }
}
