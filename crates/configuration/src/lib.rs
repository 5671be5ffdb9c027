pub mod configuration;
pub mod error;
pub mod values;

pub use configuration::{make_runtime_configuration, Configuration, ServerOptions};
pub use error::ConfigurationError;
pub use values::{ConnectionUri, PoolSettings};
