// src/exec/build.rs

use anyhow::{Context, Result};
use tokio::process::Command;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::engine::{BuildOutcome, BuildRequest, RuntimeEvent};

/// Build a shell command appropriate for the platform.
pub fn shell_command(cmd: &str) -> Command {
    if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(cmd);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(cmd);
        c
    }
}

/// Run a build command to completion.
///
/// Stdio is inherited so compiler output lands on the developer's console
/// unmangled. Returns `Err` only when the process could not be spawned or
/// waited on; a nonzero exit is a normal `BuildOutcome::Failed`.
pub async fn run_build(cmd: &str) -> Result<BuildOutcome> {
    debug!(cmd = %cmd, "spawning build process");

    let status = shell_command(cmd)
        .status()
        .await
        .with_context(|| format!("running build command '{cmd}'"))?;

    let outcome = if status.success() {
        BuildOutcome::Success
    } else {
        BuildOutcome::Failed(status.code().unwrap_or(-1))
    };

    debug!(cmd = %cmd, ?outcome, "build process exited");
    Ok(outcome)
}

/// Spawn the background build executor loop.
///
/// The returned `mpsc::Sender<BuildRequest>` is what the runtime uses as
/// `exec_tx`. Requests are executed strictly one at a time; the runtime
/// guarantees at most one is outstanding anyway, so there is no queue to
/// speak of.
///
/// Execution errors (spawn failures etc.) are logged and reported to the
/// runtime as `BuildOutcome::Failed(-1)`.
pub fn spawn_executor(runtime_tx: mpsc::Sender<RuntimeEvent>) -> mpsc::Sender<BuildRequest> {
    let (tx, mut rx) = mpsc::channel::<BuildRequest>(32);

    tokio::spawn(async move {
        info!("build executor started");

        while let Some(request) = rx.recv().await {
            let outcome = match run_build(&request.cmd).await {
                Ok(outcome) => outcome,
                Err(err) => {
                    error!(cmd = %request.cmd, error = %err, "build execution error");
                    BuildOutcome::Failed(-1)
                }
            };

            if runtime_tx
                .send(RuntimeEvent::BuildCompleted { outcome })
                .await
                .is_err()
            {
                // Runtime is gone; nothing left to report to.
                break;
            }
        }

        info!("build executor finished (channel closed)");
    });

    tx
}
