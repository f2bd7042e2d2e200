// src/watch/watcher.rs

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::engine::RuntimeEvent;

/// Handle for the filesystem watcher.
///
/// This exists mainly so the underlying `RecommendedWatcher` is kept alive
/// for as long as needed. Dropping this handle stops file watching; the
/// runtime does exactly that during shutdown.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle").finish()
    }
}

/// Spawn a filesystem watcher on `root`/`subtree` (recursively) that forwards
/// modification events into the runtime as `RuntimeEvent::FileChanged`.
///
/// Paths are relativized against `root` before forwarding, so the runtime's
/// trigger sees the same root-relative strings its `WatchProfile` was built
/// for. Events whose path cannot be relativized are forwarded as-is; they
/// fail the subtree prefix match and are ignored downstream.
pub fn spawn_watcher(
    root: impl Into<PathBuf>,
    subtree: &str,
    runtime_tx: mpsc::Sender<RuntimeEvent>,
) -> Result<WatcherHandle> {
    let root = root.into();
    let root = root
        .canonicalize()
        .unwrap_or_else(|_| root.clone()); // best-effort

    let watch_dir = root.join(subtree);

    // Channel from the blocking notify callback into the async world.
    let (event_tx, mut event_rx) = tokio::sync::mpsc::unbounded_channel::<Event>();

    // Closure called synchronously by notify whenever an event arrives.
    let mut watcher = RecommendedWatcher::new(
        {
            let event_tx = event_tx.clone();
            move |res: notify::Result<Event>| {
                match res {
                    Ok(event) => {
                        if let Err(err) = event_tx.send(event) {
                            // We can't log via tracing here easily, so fallback to stderr.
                            eprintln!("devloop: failed to forward notify event: {err}");
                        }
                    }
                    Err(err) => {
                        eprintln!("devloop: file watch error: {err}");
                    }
                }
            }
        },
        Config::default(),
    )?;

    watcher
        .watch(&watch_dir, RecursiveMode::Recursive)
        .with_context(|| format!("watching directory {:?}", watch_dir))?;

    info!("file watcher started on {:?}", watch_dir);

    // Async task that consumes notify events and forwards them to the runtime.
    let async_root = root.clone();
    tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            debug!("received notify event: {:?}", event);

            // Only modification events are relevant; file creation is
            // followed by a write, which is what triggers the rebuild.
            if !event.kind.is_modify() {
                continue;
            }

            for path in &event.paths {
                let rel = match relative_str(&async_root, path) {
                    Some(rel) => rel,
                    None => {
                        warn!(
                            "could not relativize path {:?} against root {:?}",
                            path, async_root
                        );
                        path.to_string_lossy().replace('\\', "/")
                    }
                };

                let change = RuntimeEvent::FileChanged {
                    path: rel,
                    is_dir: path.is_dir(),
                };

                if let Err(err) = runtime_tx.send(change).await {
                    warn!("failed to send RuntimeEvent::FileChanged: {err}");
                    // If the runtime channel is closed, there's no point
                    // keeping the watcher loop alive.
                    return;
                }
            }
        }

        debug!("file watcher loop ended");
    });

    Ok(WatcherHandle { _inner: watcher })
}

/// Convert a path into a string relative to `root`, with forward slashes.
///
/// Returns `None` if the path is not under `root` and cannot be relativized.
fn relative_str(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let s = rel.to_string_lossy().replace('\\', "/");
    Some(s)
}
