mod pool_settings;
pub mod uri;

pub use pool_settings::PoolSettings;
pub use uri::ConnectionUri;
