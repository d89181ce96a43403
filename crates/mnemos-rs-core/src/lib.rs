//! Memory context orchestration for Mnemos.
//!
//! This crate resolves memory addresses, fans out retrieval, composes and
//! injects context into the live user message, and persists each completed
//! turn back to the store.

pub mod agent;
pub mod compose;
pub mod conversation;
pub mod envelope;
pub mod error;
pub mod hooks;
pub mod namespace;
pub mod persist;
pub mod prompt;
pub mod retrieval;
pub mod turn;

pub use agent::{MemoryAgent, TurnReport};
pub use compose::{ComposedContext, ContextSection, MemoryCategory, compose};
pub use conversation::{ContentPart, Message, Role};
pub use envelope::{CLOSE_TAG, InjectOutcome, OPEN_TAG};
pub use error::MnemosCoreError;
/// Pre- and post-inference memory hooks.
pub use hooks::{MemoryHooks, PersistOutcome, RetrievalOutcome};
pub use namespace::{MemoryAddresses, MemoryScope, NamespaceAddress, StmAddress, resolve};
pub use persist::SpeakerLabels;
pub use retrieval::{RetrievedMemory, retrieve_all};
pub use turn::{CompletedTurn, extract_turn};
