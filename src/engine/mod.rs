// src/engine/mod.rs

//! Orchestration engine for devloop.
//!
//! This module ties together:
//! - the debounced trigger (which change events become rebuilds)
//! - the main runtime event loop that reacts to:
//!   - file-change events from the watcher
//!   - build completion events from the executor
//!   - shutdown signals
//! - teardown of the background file server and the watcher

pub mod runtime;
pub mod trigger;

pub use runtime::{BuildOutcome, BuildRequest, Phase, Runtime, RuntimeEvent};
pub use trigger::{DebouncedTrigger, TriggerDecision};
