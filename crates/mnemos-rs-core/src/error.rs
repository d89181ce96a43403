//! Error types for the core orchestrator crate.

use mnemos_rs_memory::MemoryError;
use thiserror::Error;

/// Errors returned by orchestrator operations.
#[derive(Debug, Error)]
pub enum MnemosCoreError {
    /// Memory store call failed.
    #[error("memory error: {0}")]
    Memory(#[from] MemoryError),
    /// A spawned lookup task panicked or was aborted.
    #[error("task error: {0}")]
    Task(String),
    /// Model inference failed.
    #[error("model error: {0}")]
    Model(String),
}
