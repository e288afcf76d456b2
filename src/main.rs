use anyhow::anyhow;
use clap::Parser;

use sqlsplit::config::Config;
use sqlsplit::server::{self, ProxyServer};
use sqlsplit::strategy::StrategyName;

/// Read/write-splitting SQL proxy for a MySQL manager/worker cluster.
#[derive(Debug, Parser)]
#[command(name = "sqlsplit", version, about)]
struct Args {
    /// Bind address for the HTTP server (overrides BIND_ADDR).
    #[arg(long)]
    bind: Option<String>,

    /// Default routing strategy: direct, random or custom (overrides PROXY_STRATEGY).
    #[arg(long)]
    strategy: Option<String>,

    /// Fan committed writes out to every worker (overrides REPLICATE_WRITES).
    #[arg(long)]
    replicate_writes: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = Config::from_env()?;
    if let Some(bind) = args.bind {
        config.proxy.bind_addr = bind;
    }
    if let Some(strategy) = args.strategy {
        config.proxy.default_strategy = StrategyName::parse(&strategy)
            .ok_or_else(|| anyhow!("unknown strategy '{strategy}'"))?;
    }
    if args.replicate_writes {
        config.proxy.replicate_writes = true;
    }

    server::init_tracing(config.proxy.debug);
    tracing::info!(
        manager = %config.manager_host,
        workers = ?config.worker_hosts,
        strategy = config.proxy.default_strategy.as_str(),
        replicate_writes = config.proxy.replicate_writes,
        "starting sqlsplit"
    );

    let mut server = ProxyServer::new(&config);
    server.try_bind().await.map_err(|err| anyhow!("{err}"))?;
    server.run().await.map_err(|err| anyhow!("{err}"))?;
    Ok(())
}
