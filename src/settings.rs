//! Layered run settings.
//!
//! Flags and environment variables (merged by clap) take precedence over the
//! config file, which takes precedence over built-in defaults.

use std::path::{Path, PathBuf};

use bdaycal_core::{ConfigError, RawConfig, SyncConfig};
use config::{Config, File, FileFormat};

/// Default config file at ~/.config/bdaycal/config.toml
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("bdaycal").join("config.toml"))
}

/// Merge `overrides` over the config file and validate the result.
///
/// An explicitly given config file must exist. The default one is optional.
pub fn load(overrides: RawConfig, config_file: Option<&Path>) -> Result<SyncConfig, ConfigError> {
    let from_file = match config_file {
        Some(path) => read_config_file(path, true)?,
        None => match default_config_path() {
            Some(path) => read_config_file(&path, false)?,
            None => RawConfig::default(),
        },
    };

    overrides.or(from_file).validate()
}

fn read_config_file(path: &Path, required: bool) -> Result<RawConfig, ConfigError> {
    let file_error = |e: config::ConfigError| ConfigError::File(format!("{}: {}", path.display(), e));

    Config::builder()
        .add_source(File::new(&path.to_string_lossy(), FileFormat::Toml).required(required))
        .build()
        .map_err(file_error)?
        .try_deserialize()
        .map_err(file_error)
}
