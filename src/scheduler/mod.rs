// src/scheduler/mod.rs
// =============================================================================
// This module contains the bounded-concurrency core.
//
// Submodules:
// - store: TaskResult and the thread-safe ResultStore accumulator
// - run: the admission loop that fans URLs out and drains them back in
//
// This file (mod.rs) is the module root - it re-exports the public API so
// callers write `scheduler::run(...)` and `scheduler::TaskResult` without
// knowing the internal file layout.
// =============================================================================

// Declare submodules (tells Rust to include these files)
mod run;
mod store;

// Re-export public items from submodules
pub use run::run;
pub use store::{ResultStore, TaskResult};
