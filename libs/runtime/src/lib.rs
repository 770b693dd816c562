pub mod config;
pub mod logging;

pub use config::{
    AppConfig, AuthConfig, CliArgs, DatabaseConfig, LoggingConfig, PaygateConfig, Section,
    ServerConfig,
};
