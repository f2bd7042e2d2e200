// src/cli.rs

//! CLI argument parsing using `clap`.
//!
//! NOTE: this expects `clap` to be built with the `derive` feature, e.g.:
//! `clap = { version = "4.5.53", features = ["derive"] }` in `Cargo.toml`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `devloop`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "devloop",
    version,
    about = "Watch sources, rebuild on change, and serve the build output.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Devloop.toml` in the current working directory. A missing
    /// file is not an error; built-in defaults are used instead.
    #[arg(long, value_name = "PATH", default_value = "Devloop.toml")]
    pub config: String,

    /// Rebuild mode to use for file-change builds.
    ///
    /// Must name an entry under `[build.modes]` in the config. Overrides
    /// `build.mode` from the config file. When neither is set, the full
    /// `build.cmd` is re-run on changes.
    #[arg(long, value_name = "NAME")]
    pub mode: Option<String>,

    /// Run the build (and asset overrides) once, then exit. No server, no
    /// watching.
    #[arg(long)]
    pub once: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `DEVLOOP_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Print the resolved build/serve/watch plan, but don't execute anything.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
