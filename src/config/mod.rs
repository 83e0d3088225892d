#[cfg(feature = "cli")]
pub mod cli;
pub mod lambda;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::{CliConfig, Command, OutputFormat};
pub use lambda::LambdaConfig;
pub use toml_config::{AppConfig, DEFAULT_CONFIG_FILE};
