//! Configuration file loading for eunomia
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `EUNOMIA_*` environment variables (`__` separates sections)
//! 2. `--config <path>` specified file
//! 3. Project root: `./eunomia.toml` or `./.eunomia.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/eunomia/config.toml`
//! 5. Default values

mod file_config;
mod loader;
mod rules_source;

pub use file_config::{
    ConfigValidationError, FileConfig, FileIdentConfig, FileIrcConfig, FileLegislationConfig,
    FileLoggingConfig,
};
pub use loader::ConfigLoader;
pub use rules_source::ConfigRulesSource;
