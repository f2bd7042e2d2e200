use std::error::Error;
use std::time::{Duration, Instant};

use devloop::exec::ServerProcess;

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn shutdown_terminates_a_long_running_server() -> TestResult {
    let server = ServerProcess::start("sleep 30", None)?;

    // Termination must not wait out the child's natural lifetime; the child
    // is signalled, reaped, and shutdown returns well inside the timeout.
    let started = Instant::now();
    server.shutdown(Duration::from_secs(5)).await;
    assert!(started.elapsed() < Duration::from_secs(5));
    Ok(())
}

#[tokio::test]
async fn shutdown_after_the_server_exited_on_its_own() -> TestResult {
    let server = ServerProcess::start("true", None)?;

    // Give the process time to exit by itself; shutdown must still reap it
    // without error.
    tokio::time::sleep(Duration::from_millis(200)).await;
    server.shutdown(Duration::from_secs(5)).await;
    Ok(())
}
