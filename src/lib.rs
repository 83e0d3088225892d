pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{AppConfig, LambdaConfig};

pub use adapters::{Backend, ChatClient, MemoryStore, RestStore};
pub use app::{server, AppState};
pub use utils::error::{CatalystError, Result};
