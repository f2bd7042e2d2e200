// src/postbuild.rs

//! Post-build asset overrides.
//!
//! After the initial build, configured `[[override]]` entries replace a
//! generated file in the build output with a fixed development asset (e.g.
//! swap a release `zjb_extract.js` for the dev variant under `static/dev`).

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::AssetOverride;

/// Apply every override: delete `target` if present, then copy `source` into
/// its place. Paths are resolved against `root` (the config file's
/// directory).
///
/// A missing source is an error; a missing target is not (the build may
/// simply not have produced it).
pub fn apply_overrides(root: &Path, overrides: &[AssetOverride]) -> Result<()> {
    for o in overrides {
        let target = root.join(&o.target);
        let source = root.join(&o.source);

        if target.exists() {
            fs::remove_file(&target)
                .with_context(|| format!("removing build output {:?}", target))?;
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating directory {:?}", parent))?;
        }

        fs::copy(&source, &target).with_context(|| {
            format!("copying dev asset {:?} over {:?}", source, target)
        })?;

        info!(
            target = %o.target,
            source = %o.source,
            "replaced build output with development asset"
        );
    }

    Ok(())
}
