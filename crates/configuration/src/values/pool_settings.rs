use std::time::Duration;

use clap::Args;

const DEFAULT_MAX_CONNECTIONS: u32 = 50;
const DEFAULT_POOL_TIMEOUT: u64 = 600;
const DEFAULT_IDLE_TIMEOUT: u64 = 180;
const DEFAULT_CONNECTION_LIFETIME: u64 = 600;

/// Settings for the PostgreSQL connection pool
#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct PoolSettings {
    /// maximum number of pool connections
    #[arg(
        long = "max-connections",
        env = "POOL_MAX_CONNECTIONS",
        default_value_t = DEFAULT_MAX_CONNECTIONS,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub max_connections: u32,
    /// timeout for acquiring a connection from the pool (seconds)
    #[arg(long = "pool-timeout", env = "POOL_TIMEOUT", default_value_t = DEFAULT_POOL_TIMEOUT)]
    pub pool_timeout: u64,
    /// idle timeout for releasing a connection from the pool (seconds, 0 disables)
    #[arg(long = "idle-timeout", env = "POOL_IDLE_TIMEOUT", default_value_t = DEFAULT_IDLE_TIMEOUT)]
    pub idle_timeout: u64,
    /// maximum lifetime for an individual connection (seconds, 0 disables)
    #[arg(
        long = "connection-lifetime",
        env = "POOL_CONNECTION_LIFETIME",
        default_value_t = DEFAULT_CONNECTION_LIFETIME
    )]
    pub connection_lifetime: u64,
}

impl PoolSettings {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.pool_timeout)
    }

    pub fn idle_timeout(&self) -> Option<Duration> {
        enabled_duration(self.idle_timeout)
    }

    pub fn max_lifetime(&self) -> Option<Duration> {
        enabled_duration(self.connection_lifetime)
    }
}

impl Default for PoolSettings {
    fn default() -> PoolSettings {
        PoolSettings {
            max_connections: DEFAULT_MAX_CONNECTIONS,
            pool_timeout: DEFAULT_POOL_TIMEOUT,
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
            connection_lifetime: DEFAULT_CONNECTION_LIFETIME,
        }
    }
}

fn enabled_duration(seconds: u64) -> Option<Duration> {
    (seconds > 0).then(|| Duration::from_secs(seconds))
}
