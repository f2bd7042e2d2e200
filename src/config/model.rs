// src/config/model.rs

use std::collections::BTreeMap;

use serde::Deserialize;

/// Top-level configuration as read from a TOML file.
///
/// Typical file:
///
/// ```toml
/// [build]
/// cmd = "zig build"
/// mode = "dev"
/// cooldown = "1s"
///
/// [build.modes]
/// dev = "zig build -Ddev=true"
/// update = "zig build -Dupdate=true"
///
/// [serve]
/// cmd = "python3 -m http.server -d zig-out"
///
/// [watch]
/// path = "src"
///
/// [[override]]
/// target = "zig-out/zjb_extract.js"
/// source = "static/dev/zjb_extract.js"
/// ```
///
/// All sections are optional; the defaults reproduce the classic
/// build-serve-watch loop for a Zig project served over `http.server`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ConfigFile {
    /// Build command and rebuild modes from `[build]`.
    #[serde(default)]
    pub build: BuildSection,

    /// File server command from `[serve]`.
    #[serde(default)]
    pub serve: ServeSection,

    /// Watched subtree and exclude patterns from `[watch]`.
    #[serde(default)]
    pub watch: WatchSection,

    /// Post-build asset replacements from `[[override]]` entries.
    #[serde(default, rename = "override")]
    pub overrides: Vec<AssetOverride>,
}

/// `[build]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct BuildSection {
    /// The full build command, run once at startup (and on changes when no
    /// rebuild mode is selected).
    #[serde(default = "default_build_cmd")]
    pub cmd: String,

    /// Name of the rebuild mode used for file-change builds.
    ///
    /// Must be a key of `modes`. `--mode` on the CLI takes precedence. If
    /// neither is set, `cmd` is re-run on changes.
    #[serde(default)]
    pub mode: Option<String>,

    /// Named rebuild commands, e.g. `dev = "zig build -Ddev=true"`.
    #[serde(default)]
    pub modes: BTreeMap<String, String>,

    /// Minimum interval between accepted change triggers, e.g. `"1s"`,
    /// `"250ms"`.
    #[serde(default = "default_cooldown")]
    pub cooldown: String,
}

fn default_build_cmd() -> String {
    "zig build".to_string()
}

fn default_cooldown() -> String {
    "1s".to_string()
}

impl Default for BuildSection {
    fn default() -> Self {
        Self {
            cmd: default_build_cmd(),
            mode: None,
            modes: BTreeMap::new(),
            cooldown: default_cooldown(),
        }
    }
}

/// `[serve]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ServeSection {
    /// Long-running file server command, started as a background process and
    /// terminated on shutdown.
    #[serde(default = "default_serve_cmd")]
    pub cmd: String,

    /// Optional regex matched against the server's output; the first matching
    /// line is reported as "server ready" at info level.
    #[serde(default)]
    pub ready_pattern: Option<String>,
}

fn default_serve_cmd() -> String {
    "python3 -m http.server -d zig-out".to_string()
}

impl Default for ServeSection {
    fn default() -> Self {
        Self {
            cmd: default_serve_cmd(),
            ready_pattern: None,
        }
    }
}

/// `[watch]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct WatchSection {
    /// Directory (relative to the config file) whose changes trigger
    /// rebuilds. Watched recursively.
    #[serde(default = "default_watch_path")]
    pub path: String,

    /// Glob patterns for paths to ignore even inside the watched subtree,
    /// e.g. `["**/*.tmp"]`. Evaluated against paths relative to the project
    /// root.
    #[serde(default)]
    pub exclude: Vec<String>,
}

fn default_watch_path() -> String {
    "src".to_string()
}

impl Default for WatchSection {
    fn default() -> Self {
        Self {
            path: default_watch_path(),
            exclude: Vec::new(),
        }
    }
}

/// One `[[override]]` entry: after the initial build, delete `target` and
/// replace it with a copy of `source`. Both paths are relative to the config
/// file.
#[derive(Debug, Clone, Deserialize)]
pub struct AssetOverride {
    pub target: String,
    pub source: String,
}
