// src/watch/patterns.rs

use std::fmt;

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};

/// The path filter for change events: a watched-subtree prefix plus optional
/// exclude globs.
///
/// Paths are evaluated as strings relative to the project root with forward
/// slashes (e.g. `"src/main.zig"`). A path is relevant when it lies under the
/// watched subtree and matches no exclude pattern.
#[derive(Clone)]
pub struct WatchProfile {
    subtree: String,
    exclude_set: Option<GlobSet>,
}

impl fmt::Debug for WatchProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchProfile")
            .field("subtree", &self.subtree)
            .finish_non_exhaustive()
    }
}

impl WatchProfile {
    /// Compile a profile from the watched directory (relative to project
    /// root) and a list of exclude glob patterns.
    pub fn new(subtree: &str, exclude: &[String]) -> Result<Self> {
        let subtree = subtree.trim_matches('/').to_string();

        let exclude_set = if exclude.is_empty() {
            None
        } else {
            Some(build_globset(exclude).context("building exclude globset")?)
        };

        Ok(Self {
            subtree,
            exclude_set,
        })
    }

    /// The watched subtree, e.g. `"src"`.
    pub fn subtree(&self) -> &str {
        &self.subtree
    }

    /// Returns true if the given root-relative path should trigger a rebuild
    /// check.
    ///
    /// Prefix matching is component-aware: `"srcfoo/a.zig"` is not under
    /// `"src"`.
    pub fn matches(&self, rel_path: &str) -> bool {
        let under_subtree = rel_path
            .strip_prefix(&self.subtree)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'));
        if !under_subtree {
            return false;
        }

        if let Some(exclude) = &self.exclude_set {
            if exclude.is_match(rel_path) {
                return false;
            }
        }
        true
    }
}

/// Build a GlobSet from simple string patterns.
fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let glob = Glob::new(pat)
            .with_context(|| format!("invalid glob pattern: {pat}"))?;
        builder.add(glob);
    }
    Ok(builder.build()?)
}
