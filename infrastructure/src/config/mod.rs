//! Configuration file loading for arkcutt
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `ARKCUTT_*` environment variables (`__` separates sections)
//! 2. `--config <path>` specified file
//! 3. Project root: `./arkcutt.toml` or `./.arkcutt.toml`
//! 4. Global: `$XDG_CONFIG_HOME/arkcutt/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    CatalogSource, ConfigValidationError, FileCatalogConfig, FileConfig, FileLoggingConfig,
    FileModelConfig, FileServicesConfig, FileTurnConfig,
};
pub use loader::ConfigLoader;
