// src/exec/mod.rs

//! Process execution layer.
//!
//! This module is responsible for actually running the external commands,
//! using `tokio::process::Command`:
//!
//! - [`build`] owns the build executor loop which consumes `BuildRequest`s,
//!   runs the build command, and reports outcomes back to the runtime.
//! - [`server`] owns the long-lived file server process and its explicit
//!   start/terminate/wait handle.

pub mod build;
pub mod server;

pub use build::{run_build, shell_command, spawn_executor};
pub use server::ServerProcess;
