//! HTTP surface of the proxy: server lifecycle, routes, and error mapping.

pub mod error;
pub mod guard;
pub mod handlers;
pub mod shutdown;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{get, post};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::executor::{MySqlExecutor, QueryExecutor};
use crate::probe::{Prober, TcpProber};
use crate::router::Router;
use crate::server::handlers::AppState;
use crate::server::shutdown::ShutdownManager;

pub fn init_tracing(debug: bool) {
    let default_filter = if debug { "sqlsplit=debug,info" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();
}

/// Assemble the axum application around shared state.
pub fn build_router(state: AppState) -> axum::Router {
    axum::Router::new()
        .route("/sql", post(handlers::handle_sql))
        .route("/health", get(handlers::handle_health))
        .with_state(state)
}

pub struct ProxyServer {
    pub addr: SocketAddr,
    bind_addr: String,
    /// The bound listener, kept alive between try_bind() and run() so the
    /// reported address stays valid.
    listener: Option<TcpListener>,
    state: AppState,
    shutdown: Arc<ShutdownManager>,
}

impl ProxyServer {
    /// Build the production wiring: TCP probing on the database port and a
    /// fresh-connection MySQL executor.
    pub fn new(config: &Config) -> Self {
        let prober: Arc<dyn Prober> = Arc::new(TcpProber::new(config.db.port));
        let router = Arc::new(Router::new(
            config.topology(),
            config.proxy.default_strategy,
            prober,
        ));
        let executor: Arc<dyn QueryExecutor> = Arc::new(MySqlExecutor::new(config.db.clone()));
        Self::with_parts(config, router, executor)
    }

    /// Build with injected router and executor. Tests use this to swap in
    /// scripted doubles without a live database.
    pub fn with_parts(
        config: &Config,
        router: Arc<Router>,
        executor: Arc<dyn QueryExecutor>,
    ) -> Self {
        let state = AppState {
            router,
            executor,
            replicate_writes: config.proxy.replicate_writes,
        };
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 0)),
            bind_addr: config.proxy.bind_addr.clone(),
            listener: None,
            state,
            shutdown: Arc::new(ShutdownManager::new()),
        }
    }

    /// Bind the configured address and report the actual socket address.
    /// Binding port 0 (tests) yields an ephemeral port readable here before
    /// the server is spawned.
    pub async fn try_bind(&mut self) -> Result<SocketAddr, Box<dyn std::error::Error>> {
        let listener = TcpListener::bind(&self.bind_addr).await?;
        self.addr = listener.local_addr()?;
        self.listener = Some(listener);
        tracing::info!("proxy bound to {}", self.addr);
        Ok(self.addr)
    }

    pub fn shutdown_handle(&self) -> Arc<ShutdownManager> {
        self.shutdown.clone()
    }

    /// Run until a shutdown signal arrives.
    ///
    /// Consumes self to take ownership of the pre-bound listener; call
    /// [`ProxyServer::try_bind`] first.
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        let listener = self
            .listener
            .ok_or("try_bind() must be called before run()")?;

        tracing::info!("starting proxy server on {}", self.addr);

        let app = build_router(self.state.clone());
        let shutdown = self.shutdown.clone();
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.wait_for_shutdown().await;
            })
            .await?;

        tracing::info!("proxy server stopped");
        Ok(())
    }
}
