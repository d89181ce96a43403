//! Test helpers shared across Mnemos crates.

pub mod llm;
pub mod memory;

pub use llm::{FailingLLM, FixedChatResponse, FixedLLM, RecordingChatLLM};
pub use memory::{AppendedEvent, STM_KEY, StubStore, event_record, memory_record};
