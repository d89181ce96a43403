//! Memory store boundary for mnemos.
//!
//! The orchestrator treats the store as an external collaborator: it reads
//! recent events and long-term records, and appends one event per turn.

pub mod error;
pub mod model;
pub mod provider;

/// Memory error type.
pub use error::MemoryError;
/// Raw record aliases and event message types.
pub use model::{EventMessage, EventRecord, EventRole, MemoryRecord};
/// Store interface and default file implementation.
pub use provider::{DEFAULT_RETRIEVE_TOP_K, FileMemoryStore, MemoryStore};
