//! Pluggable host-selection strategies.
//!
//! A strategy maps a classified query plus the cluster topology to a single
//! target host. Strategies are total: every failure path (no workers, no
//! reachable workers) degrades to the manager host instead of erroring, so the
//! router can always dispatch.

mod direct;
mod latency;
mod random;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::classify::QueryKind;
use crate::probe::Prober;
use crate::router::{RoutingState, Topology};

pub use direct::DirectStrategy;
pub use latency::LatencyStrategy;
pub use random::RandomStrategy;

/// A named policy mapping a classified query to a target host.
#[async_trait]
pub trait Strategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Pick the host the query should execute on. Never fails.
    async fn choose_target(
        &self,
        kind: QueryKind,
        topology: &Topology,
        state: &RoutingState,
    ) -> String;
}

/// Enumerated strategy identifiers. The registry is keyed by this rather than
/// by raw strings so an unknown name is decided once, at resolution time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyName {
    Direct,
    Random,
    Custom,
}

impl StrategyName {
    /// Parse a client-supplied strategy name. `latency` is accepted as an
    /// alias for `custom`, the wire name of the latency-based strategy.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "direct" => Some(StrategyName::Direct),
            "random" => Some(StrategyName::Random),
            "custom" | "latency" => Some(StrategyName::Custom),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StrategyName::Direct => "direct",
            StrategyName::Random => "random",
            StrategyName::Custom => "custom",
        }
    }
}

/// Build the full strategy registry.
pub fn build_registry(prober: Arc<dyn Prober>) -> HashMap<StrategyName, Box<dyn Strategy>> {
    let mut registry: HashMap<StrategyName, Box<dyn Strategy>> = HashMap::new();
    registry.insert(StrategyName::Direct, Box::new(DirectStrategy));
    registry.insert(StrategyName::Random, Box::new(RandomStrategy));
    registry.insert(StrategyName::Custom, Box::new(LatencyStrategy::new(prober)));
    registry
}
