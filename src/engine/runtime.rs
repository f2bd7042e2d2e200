// src/engine/runtime.rs

use std::time::{Duration, Instant};

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::engine::trigger::{DebouncedTrigger, TriggerDecision};
use crate::exec::server::ServerProcess;
use crate::watch::WatcherHandle;

/// How long shutdown waits for the file server to exit before giving up and
/// relying on kill-on-drop.
const SERVER_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Result of a build process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildOutcome {
    Success,
    Failed(i32), // exit code
}

/// A build the runtime wants the executor to run.
#[derive(Debug, Clone)]
pub struct BuildRequest {
    pub cmd: String,
}

/// Events sent into the runtime from the watcher, the executor, or external
/// signals.
///
/// The idea is that:
/// - the watcher sends `FileChanged`
/// - the executor sends `BuildCompleted`
/// - Ctrl-C handling (or a test) sends `ShutdownRequested`
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    FileChanged {
        /// Path relative to the project root, forward slashes.
        path: String,
        is_dir: bool,
    },
    BuildCompleted {
        outcome: BuildOutcome,
    },
    ShutdownRequested,
}

/// Lifecycle phase of the runtime. Linear, no branching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Starting,
    Watching,
    Stopping,
    Stopped,
}

/// The main orchestration runtime.
///
/// Responsibilities:
/// - Consume `RuntimeEvent`s from the watcher / executor / ctrl-c.
/// - Apply debounce semantics via `DebouncedTrigger`.
/// - Dispatch rebuilds to the executor, at most one in flight.
/// - On shutdown, stop the watcher and terminate the file server, waiting
///   with a bounded timeout.
pub struct Runtime {
    trigger: DebouncedTrigger,
    rebuild_cmd: String,
    phase: Phase,
    build_in_flight: bool,

    /// Set when an accepted trigger arrives during a rebuild; consumed on
    /// build completion. Mirrors the original loop, where events arriving
    /// during the synchronous build were delivered (and rebuilt) afterwards.
    pending_rebuild: bool,

    /// Background file server; `None` in tests that exercise the loop alone.
    server: Option<ServerProcess>,

    /// Keeps the notify watcher alive; dropped during shutdown.
    watcher: Option<WatcherHandle>,

    /// Unified event stream from all producers.
    events_rx: mpsc::Receiver<RuntimeEvent>,

    /// Channel to the executor: accepted triggers become build requests.
    exec_tx: mpsc::Sender<BuildRequest>,
}

impl Runtime {
    pub fn new(
        trigger: DebouncedTrigger,
        rebuild_cmd: String,
        server: Option<ServerProcess>,
        watcher: Option<WatcherHandle>,
        events_rx: mpsc::Receiver<RuntimeEvent>,
        exec_tx: mpsc::Sender<BuildRequest>,
    ) -> Self {
        Self {
            trigger,
            rebuild_cmd,
            phase: Phase::Starting,
            build_in_flight: false,
            pending_rebuild: false,
            server,
            watcher,
            events_rx,
            exec_tx,
        }
    }

    /// Main event loop.
    ///
    /// Blocks until a `ShutdownRequested` event arrives (or every sender is
    /// dropped), then tears down the watcher and the server before returning.
    /// Teardown also runs when the loop itself errors, so the server is
    /// terminated and waited for on every exit path.
    pub async fn run(mut self) -> Result<()> {
        let result = self.event_loop().await;
        self.shutdown().await;
        result
    }

    async fn event_loop(&mut self) -> Result<()> {
        self.phase = Phase::Watching;
        info!(subtree = %self.trigger.profile().subtree(), "watching for changes");

        while let Some(event) = self.events_rx.recv().await {
            debug!(?event, "runtime received event");

            let keep_running = match event {
                RuntimeEvent::FileChanged { path, is_dir } => {
                    self.handle_file_changed(path, is_dir).await?
                }
                RuntimeEvent::BuildCompleted { outcome } => {
                    self.handle_build_completed(outcome).await?
                }
                RuntimeEvent::ShutdownRequested => {
                    info!("shutdown requested, stopping runtime");
                    false
                }
            };

            if !keep_running {
                break;
            }
        }

        Ok(())
    }

    /// Handle a change event from the watcher.
    async fn handle_file_changed(&mut self, path: String, is_dir: bool) -> Result<bool> {
        let now = Instant::now();

        match self.trigger.evaluate(&path, is_dir, now) {
            TriggerDecision::Ignored => {
                debug!(path = %path, is_dir, "change ignored");
            }
            TriggerDecision::Cooldown => {
                debug!(path = %path, "change within cooldown window; skipping");
            }
            TriggerDecision::Fire => {
                if self.build_in_flight {
                    // At most one build runs at a time. A change accepted
                    // during a build must still produce a rebuild, or the
                    // server keeps serving stale output; it is queued and
                    // dispatched once the current build completes.
                    debug!(path = %path, "rebuild already in flight; queueing another");
                    self.pending_rebuild = true;
                    return Ok(true);
                }

                info!(path = %path, cmd = %self.rebuild_cmd, "change detected; rebuilding");
                self.dispatch_rebuild(now).await?;
            }
        }

        Ok(true)
    }

    /// Handle completion of a rebuild. Failures are logged and the loop
    /// continues; only the initial build (outside this loop) is fatal.
    ///
    /// A trigger queued while this build ran is dispatched now, success or
    /// not.
    async fn handle_build_completed(&mut self, outcome: BuildOutcome) -> Result<bool> {
        self.build_in_flight = false;

        match outcome {
            BuildOutcome::Success => info!("build successful"),
            BuildOutcome::Failed(code) => {
                warn!(exit_code = code, "build failed; continuing to watch");
            }
        }

        if self.pending_rebuild {
            self.pending_rebuild = false;
            info!(cmd = %self.rebuild_cmd, "running rebuild queued during the last build");
            self.dispatch_rebuild(Instant::now()).await?;
        }

        Ok(true)
    }

    /// Send a build request to the executor and start the cooldown.
    ///
    /// The timestamp is updated regardless of how the build ends, so a
    /// failing build is not immediately retried either.
    async fn dispatch_rebuild(&mut self, now: Instant) -> Result<()> {
        if let Err(err) = self
            .exec_tx
            .send(BuildRequest {
                cmd: self.rebuild_cmd.clone(),
            })
            .await
        {
            error!(error = %err, "failed to send build request to executor");
            return Err(err.into());
        }

        self.build_in_flight = true;
        self.trigger.mark_fired(now);
        Ok(())
    }

    /// Stop the watcher, terminate the file server, and wait for it with a
    /// bounded timeout.
    async fn shutdown(&mut self) {
        self.phase = Phase::Stopping;
        info!(phase = ?self.phase, "shutting down");

        // Dropping the handle stops the notify watcher.
        if let Some(watcher) = self.watcher.take() {
            drop(watcher);
            debug!("file watcher stopped");
        }

        if let Some(server) = self.server.take() {
            server.shutdown(SERVER_SHUTDOWN_TIMEOUT).await;
        }

        self.phase = Phase::Stopped;
        info!(phase = ?self.phase, "runtime exited");
    }
}
