use crate::router::Topology;
use crate::strategy::StrategyName;

/// Root configuration container.
#[derive(Debug, Clone)]
pub struct Config {
    /// Writable primary host, replication source.
    pub manager_host: String,
    /// Read-replica hosts. May be empty; every strategy degrades to
    /// manager-only routing in that case.
    pub worker_hosts: Vec<String>,
    pub db: DbSettings,
    pub proxy: ProxySettings,
}

/// Credentials and target database shared by every host.
#[derive(Debug, Clone)]
pub struct DbSettings {
    pub user: String,
    pub password: String,
    pub database: String,
    pub port: u16,
}

/// Settings of the proxy process itself.
#[derive(Debug, Clone)]
pub struct ProxySettings {
    /// Bind address for the HTTP server (host:port).
    pub bind_addr: String,
    /// Strategy used when a request names none, or an unknown one.
    pub default_strategy: StrategyName,
    /// Fan committed writes out to every worker (app-level replication).
    pub replicate_writes: bool,
    /// Verbose logging.
    pub debug: bool,
}

impl Config {
    pub fn topology(&self) -> Topology {
        Topology::new(self.manager_host.clone(), &self.worker_hosts)
    }
}

impl Default for DbSettings {
    fn default() -> Self {
        Self {
            user: String::new(),
            password: String::new(),
            database: "sakila".to_string(),
            port: 3306,
        }
    }
}

impl Default for ProxySettings {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:5000".to_string(),
            default_strategy: StrategyName::Direct,
            replicate_writes: false,
            debug: false,
        }
    }
}
