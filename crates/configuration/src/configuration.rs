//! Configuration for the query service.

use std::net::{SocketAddr, ToSocketAddrs};

use clap::Parser;

use crate::error::ConfigurationError;
use crate::values::{ConnectionUri, PoolSettings};

/// Options for the query service, read from the command line or the environment.
#[derive(Debug, Clone, Parser)]
#[command(about = "Filtered and aggregated queries over the daily logistics summary.")]
pub struct ServerOptions {
    /// Connection string for the PostgreSQL database
    #[arg(long, env = "DATABASE_URL", hide_env_values = true, value_parser = parse_connection_uri)]
    pub database_url: ConnectionUri,
    /// Host to listen on
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,
    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 8000)]
    pub port: u16,
    #[command(flatten)]
    pub pool_settings: PoolSettings,
}

/// The configuration the service runs with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    pub connection_uri: ConnectionUri,
    pub pool_settings: PoolSettings,
    pub address: SocketAddr,
}

/// Resolve the listen address and gather everything the service needs to start.
pub fn make_runtime_configuration(
    options: ServerOptions,
) -> Result<Configuration, ConfigurationError> {
    let address = resolve_address(&options.host, options.port)?;
    Ok(Configuration {
        connection_uri: options.database_url,
        pool_settings: options.pool_settings,
        address,
    })
}

fn resolve_address(host: &str, port: u16) -> Result<SocketAddr, ConfigurationError> {
    let invalid = |reason: String| ConfigurationError::InvalidAddress {
        address: format!("{host}:{port}"),
        reason,
    };

    (host, port)
        .to_socket_addrs()
        .map_err(|err| invalid(err.to_string()))?
        .next()
        .ok_or_else(|| invalid("no address found".to_string()))
}

fn parse_connection_uri(value: &str) -> Result<ConnectionUri, String> {
    if value.trim().is_empty() {
        Err("the connection string must not be empty".to_string())
    } else {
        Ok(ConnectionUri::from(value))
    }
}
