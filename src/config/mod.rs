// src/config/mod.rs

//! Configuration loading and validation for devloop.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk, or fall back to defaults (`loader.rs`).
//! - Validate commands, modes, durations and patterns (`validate.rs`).
//! - Parse simple duration strings like `"1s"` (`duration.rs`).

pub mod duration;
pub mod loader;
pub mod model;
pub mod validate;

pub use duration::parse_duration;
pub use loader::{load_from_path, load_or_default};
pub use model::{AssetOverride, BuildSection, ConfigFile, ServeSection, WatchSection};
pub use validate::validate_config;
