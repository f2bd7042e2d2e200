// src/config/loader.rs

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::model::ConfigFile;
use crate::config::validate::validate_config;

/// Load a configuration file from a given path and return the raw
/// `ConfigFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_or_default`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .with_context(|| format!("reading config file at {:?}", path))?;

    let config: ConfigFile = toml::from_str(&contents)
        .with_context(|| format!("parsing TOML config from {:?}", path))?;

    Ok(config)
}

/// Load and validate a configuration file, falling back to built-in defaults
/// when the file does not exist.
///
/// The fallback keeps the zero-config invocation working: running `devloop`
/// with no `Devloop.toml` behaves like the classic build-serve-watch loop.
pub fn load_or_default(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let path = path.as_ref();

    let config = if path.exists() {
        load_from_path(path)?
    } else {
        info!("no config file at {:?}; using built-in defaults", path);
        ConfigFile::default()
    };

    validate_config(&config)?;
    Ok(config)
}
