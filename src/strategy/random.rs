//! Uniform-random read distribution across workers.

use async_trait::async_trait;
use rand::seq::SliceRandom;

use crate::classify::QueryKind;
use crate::router::{RoutingState, Topology};

use super::Strategy;

/// Writes go to the manager; reads are spread uniformly over the workers.
/// Each call draws fresh — no affinity to the previous choice.
pub struct RandomStrategy;

#[async_trait]
impl Strategy for RandomStrategy {
    fn name(&self) -> &'static str {
        "random"
    }

    async fn choose_target(
        &self,
        kind: QueryKind,
        topology: &Topology,
        _state: &RoutingState,
    ) -> String {
        if kind == QueryKind::Write || topology.workers.is_empty() {
            return topology.manager.clone();
        }

        topology
            .workers
            .choose(&mut rand::thread_rng())
            .cloned()
            .unwrap_or_else(|| topology.manager.clone())
    }
}
