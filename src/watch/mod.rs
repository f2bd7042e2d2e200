// src/watch/mod.rs

//! File watching and change detection.
//!
//! This module is responsible for:
//! - Compiling the watched-subtree / exclude filter (`patterns.rs`).
//! - Wiring up a cross-platform filesystem watcher (`notify`).
//!
//! It does **not** decide when to rebuild; it only turns filesystem changes
//! into `RuntimeEvent::FileChanged` messages for the runtime, which owns the
//! debounce logic.

pub mod patterns;
pub mod watcher;

pub use patterns::WatchProfile;
pub use watcher::{spawn_watcher, WatcherHandle};
