//! Round-trip liveness probing of candidate database hosts.
//!
//! A probe is a single timed TCP connect to the host's database port. Probe
//! failure is a normal outcome (`None`), never an error: the strategies that
//! consume probe results are required to degrade to the manager host when no
//! worker can be reached.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::net::TcpStream;
use tokio::time::timeout;

/// Default bound on a single probe.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

#[async_trait]
pub trait Prober: Send + Sync {
    /// Measure round-trip latency to `host` in milliseconds.
    ///
    /// Returns `None` when the host is unreachable or the probe times out.
    async fn probe(&self, host: &str) -> Option<f64>;
}

/// Probes by timing a TCP connect to `host:port`.
pub struct TcpProber {
    port: u16,
    timeout: Duration,
}

impl TcpProber {
    pub fn new(port: u16) -> Self {
        Self {
            port,
            timeout: PROBE_TIMEOUT,
        }
    }

    #[cfg(test)]
    fn with_timeout(port: u16, timeout: Duration) -> Self {
        Self { port, timeout }
    }
}

#[async_trait]
impl Prober for TcpProber {
    async fn probe(&self, host: &str) -> Option<f64> {
        let start = Instant::now();
        match timeout(self.timeout, TcpStream::connect((host, self.port))).await {
            Ok(Ok(stream)) => {
                let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
                drop(stream);
                tracing::debug!(host, elapsed_ms, "probe succeeded");
                Some(elapsed_ms)
            }
            Ok(Err(err)) => {
                tracing::debug!(host, %err, "probe failed");
                None
            }
            Err(_) => {
                tracing::debug!(host, timeout_secs = self.timeout.as_secs(), "probe timed out");
                None
            }
        }
    }
}
