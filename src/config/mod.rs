//! Environment-driven configuration.
//!
//! The topology and credentials are read once at startup and are immutable for
//! the process lifetime; there is no reload path.

mod loader;
mod types;

pub use loader::ConfigError;
pub use types::{Config, DbSettings, ProxySettings};
