//! Errors that can be thrown when turning options into a configuration.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("invalid listen address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },
}
