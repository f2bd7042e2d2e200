// src/exec/server.rs

use std::process::Stdio;
use std::time::Duration;

use anyhow::{Context, Result};
use regex::Regex;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Child;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::exec::build::shell_command;

/// Handle for the background static file server process.
///
/// The runtime owns this and calls [`ServerProcess::shutdown`] on teardown.
/// The child is spawned with `kill_on_drop(true)`, so even an error path that
/// drops the handle without an explicit shutdown reaps the process.
pub struct ServerProcess {
    child: Child,
    cmd: String,
}

impl std::fmt::Debug for ServerProcess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerProcess")
            .field("cmd", &self.cmd)
            .finish_non_exhaustive()
    }
}

impl ServerProcess {
    /// Start the file server as a background process.
    ///
    /// Stdout and stderr are consumed and logged at debug level so OS pipe
    /// buffers never fill. If `ready_pattern` is given, the first output line
    /// matching it is reported at info level (`python -m http.server` prints
    /// its "Serving HTTP on ..." banner to stderr, so both streams are
    /// checked).
    pub fn start(cmd: &str, ready_pattern: Option<&Regex>) -> Result<Self> {
        let mut command = shell_command(cmd);
        command
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = command
            .spawn()
            .with_context(|| format!("spawning file server '{cmd}'"))?;

        if let Some(stdout) = child.stdout.take() {
            spawn_output_monitor("stdout", stdout, ready_pattern.cloned());
        }
        if let Some(stderr) = child.stderr.take() {
            spawn_output_monitor("stderr", stderr, ready_pattern.cloned());
        }

        info!(cmd = %cmd, "file server started");

        Ok(Self {
            child,
            cmd: cmd.to_string(),
        })
    }

    /// Terminate the server and wait for it to exit, up to `wait_timeout`.
    ///
    /// Never fails: a server that refuses to die within the timeout is logged
    /// and left to the kill-on-drop backstop.
    pub async fn shutdown(mut self, wait_timeout: Duration) {
        info!(cmd = %self.cmd, "stopping file server");

        if let Err(err) = self.child.start_kill() {
            // Most likely the process already exited on its own.
            debug!(error = %err, "file server termination signal not delivered");
        }

        match timeout(wait_timeout, self.child.wait()).await {
            Ok(Ok(status)) => {
                info!(exit_code = ?status.code(), "file server stopped");
            }
            Ok(Err(err)) => {
                warn!(error = %err, "error waiting for file server to exit");
            }
            Err(_) => {
                warn!(
                    timeout = ?wait_timeout,
                    "file server did not exit in time; abandoning wait"
                );
            }
        }
    }
}

/// Consume one output stream of the server, logging lines at debug and
/// announcing readiness on the first `ready_pattern` match.
fn spawn_output_monitor<R>(stream: &'static str, reader: R, ready_pattern: Option<Regex>)
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let reader = BufReader::new(reader);
        let mut lines = reader.lines();
        let mut announced = false;

        while let Ok(Some(line)) = lines.next_line().await {
            debug!(stream, "server: {}", line);

            if !announced {
                if let Some(re) = &ready_pattern {
                    if re.is_match(&line) {
                        info!(stream, "file server ready: {}", line);
                        announced = true;
                    }
                }
            }
        }

        debug!(stream, "server output monitor ended");
    });
}
