//! Baseline strategy: everything goes to the manager.

use async_trait::async_trait;

use crate::classify::QueryKind;
use crate::router::{RoutingState, Topology};

use super::Strategy;

/// Forwards every query to the manager regardless of kind. No read scaling;
/// useful as a baseline when comparing strategies.
pub struct DirectStrategy;

#[async_trait]
impl Strategy for DirectStrategy {
    fn name(&self) -> &'static str {
        "direct"
    }

    async fn choose_target(
        &self,
        _kind: QueryKind,
        topology: &Topology,
        _state: &RoutingState,
    ) -> String {
        topology.manager.clone()
    }
}
