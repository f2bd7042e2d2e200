// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod postbuild;
pub mod watch;

use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Result};
use regex::Regex;
use tokio::sync::mpsc;
use tracing::info;

use crate::cli::CliArgs;
use crate::config::loader::load_or_default;
use crate::config::model::{BuildSection, ConfigFile};
use crate::config::parse_duration;
use crate::engine::{BuildOutcome, DebouncedTrigger, Runtime, RuntimeEvent};
use crate::exec::ServerProcess;
use crate::watch::WatchProfile;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - the initial build (+ asset overrides)
/// - the background file server
/// - the file watcher + debounced trigger + runtime loop
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let cfg = load_or_default(&config_path)?;

    let rebuild_cmd = resolve_rebuild_cmd(&cfg.build, args.mode.as_deref())?;

    if args.dry_run {
        print_dry_run(&cfg, &rebuild_cmd);
        return Ok(());
    }

    let root = config_root_dir(&config_path);

    // Initial build, synchronous and fatal on failure.
    info!(cmd = %cfg.build.cmd, "running initial build");
    match exec::run_build(&cfg.build.cmd).await? {
        BuildOutcome::Success => info!("initial build succeeded"),
        BuildOutcome::Failed(code) => {
            bail!("initial build failed with exit code {code}");
        }
    }

    postbuild::apply_overrides(&root, &cfg.overrides)?;

    if args.once {
        info!("--once: build complete, exiting");
        return Ok(());
    }

    // Runtime event channel.
    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(64);

    // Build executor.
    let exec_tx = exec::spawn_executor(rt_tx.clone());

    // Background file server.
    let ready_pattern = cfg
        .serve
        .ready_pattern
        .as_deref()
        .map(Regex::new)
        .transpose()?; // already validated; this just compiles it
    let server = ServerProcess::start(&cfg.serve.cmd, ready_pattern.as_ref())?;

    // File watcher on the configured subtree.
    let watcher = watch::spawn_watcher(root.clone(), &cfg.watch.path, rt_tx.clone())?;

    // Ctrl-C → graceful shutdown.
    {
        let tx = rt_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            let _ = tx.send(RuntimeEvent::ShutdownRequested).await;
        });
    }

    let profile = WatchProfile::new(&cfg.watch.path, &cfg.watch.exclude)?;
    let cooldown = parse_duration(&cfg.build.cooldown).map_err(|e| anyhow!(e))?;
    let trigger = DebouncedTrigger::new(profile, cooldown);

    let runtime = Runtime::new(
        trigger,
        rebuild_cmd,
        Some(server),
        Some(watcher),
        rt_rx,
        exec_tx,
    );
    runtime.run().await
}

/// Pick the command used for file-change rebuilds.
///
/// A `--mode` CLI override wins over `[build].mode`; when neither is set, the
/// full `[build].cmd` is reused. An unknown mode name is an error listing the
/// defined modes.
pub fn resolve_rebuild_cmd(build: &BuildSection, cli_mode: Option<&str>) -> Result<String> {
    let mode = cli_mode.or(build.mode.as_deref());

    match mode {
        Some(name) => build.modes.get(name).cloned().ok_or_else(|| {
            let defined: Vec<&str> = build.modes.keys().map(|s| s.as_str()).collect();
            anyhow!("unknown build mode '{name}' (defined modes: {defined:?})")
        }),
        None => Ok(build.cmd.clone()),
    }
}

/// Figure out a sensible project root for watching and overrides.
/// Currently: directory containing the config file, or `.`.
fn config_root_dir(config_path: &Path) -> PathBuf {
    config_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Simple dry-run output: print the resolved plan.
fn print_dry_run(cfg: &ConfigFile, rebuild_cmd: &str) {
    println!("devloop dry-run");
    println!("  build.cmd = {}", cfg.build.cmd);
    println!("  rebuild cmd = {}", rebuild_cmd);
    if !cfg.build.modes.is_empty() {
        println!("  build.modes:");
        for (name, cmd) in cfg.build.modes.iter() {
            println!("    {name}: {cmd}");
        }
    }
    println!("  build.cooldown = {}", cfg.build.cooldown);
    println!("  serve.cmd = {}", cfg.serve.cmd);
    if let Some(ref pat) = cfg.serve.ready_pattern {
        println!("  serve.ready_pattern = {pat}");
    }
    println!("  watch.path = {}", cfg.watch.path);
    if !cfg.watch.exclude.is_empty() {
        println!("  watch.exclude = {:?}", cfg.watch.exclude);
    }
    for o in cfg.overrides.iter() {
        println!("  override: {} <- {}", o.target, o.source);
    }
}
