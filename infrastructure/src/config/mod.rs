//! Configuration file loading for panel-consult
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `CONSULT_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./consult.toml` or `./.consult.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/panel-consult/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    FileConfig, FileEngineConfig, FileLoggingConfig, FileOutputConfig, FileServerConfig,
};
pub use loader::ConfigLoader;
