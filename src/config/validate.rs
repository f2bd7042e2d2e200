// src/config/validate.rs

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use regex::Regex;

use crate::config::duration::parse_duration;
use crate::config::model::ConfigFile;
use crate::watch::WatchProfile;

/// Run basic semantic validation against a loaded configuration.
///
/// This checks:
/// - `build.cmd` and every `[build.modes]` command are non-empty
/// - `build.mode` (if set) names an entry in `[build.modes]`
/// - `build.cooldown` parses as a duration
/// - `serve.cmd` is non-empty and `serve.ready_pattern` compiles
/// - `watch.path` is a non-empty relative path and exclude globs compile
/// - every `[[override]]` has a non-empty target and source
///
/// It does **not** check that watched or override paths exist; the watcher
/// and the override step report those at runtime with proper context.
pub fn validate_config(cfg: &ConfigFile) -> Result<()> {
    validate_build(cfg)?;
    validate_serve(cfg)?;
    validate_watch(cfg)?;
    validate_overrides(cfg)?;
    Ok(())
}

fn validate_build(cfg: &ConfigFile) -> Result<()> {
    if cfg.build.cmd.trim().is_empty() {
        return Err(anyhow!("[build].cmd must not be empty"));
    }

    for (name, cmd) in cfg.build.modes.iter() {
        if cmd.trim().is_empty() {
            return Err(anyhow!("[build.modes].{} must not be empty", name));
        }
    }

    if let Some(ref mode) = cfg.build.mode {
        if !cfg.build.modes.contains_key(mode) {
            return Err(anyhow!(
                "[build].mode = \"{}\" has no matching entry under [build.modes]",
                mode
            ));
        }
    }

    parse_duration(&cfg.build.cooldown)
        .map_err(|e| anyhow!(e))
        .context("invalid [build].cooldown")?;

    Ok(())
}

fn validate_serve(cfg: &ConfigFile) -> Result<()> {
    if cfg.serve.cmd.trim().is_empty() {
        return Err(anyhow!("[serve].cmd must not be empty"));
    }

    if let Some(ref pattern) = cfg.serve.ready_pattern {
        Regex::new(pattern)
            .with_context(|| format!("invalid [serve].ready_pattern regex: {pattern}"))?;
    }

    Ok(())
}

fn validate_watch(cfg: &ConfigFile) -> Result<()> {
    if cfg.watch.path.trim().is_empty() {
        return Err(anyhow!("[watch].path must not be empty"));
    }
    if Path::new(&cfg.watch.path).is_absolute() {
        return Err(anyhow!(
            "[watch].path must be relative to the config file (got {:?})",
            cfg.watch.path
        ));
    }

    // Compiles the exclude globs; errors here carry the offending pattern.
    WatchProfile::new(&cfg.watch.path, &cfg.watch.exclude)?;

    Ok(())
}

fn validate_overrides(cfg: &ConfigFile) -> Result<()> {
    for (i, o) in cfg.overrides.iter().enumerate() {
        if o.target.trim().is_empty() {
            return Err(anyhow!("[[override]] entry {} has an empty target", i));
        }
        if o.source.trim().is_empty() {
            return Err(anyhow!("[[override]] entry {} has an empty source", i));
        }
    }
    Ok(())
}
