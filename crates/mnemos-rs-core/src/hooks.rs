//! Two-phase memory processing around each model inference.
//!
//! [`MemoryHooks::before_inference`] runs when the latest message is a fresh
//! user utterance and [`MemoryHooks::after_inference`] runs once the model has
//! replied. Neither phase ever fails the surrounding turn: store errors are
//! logged and reported in the outcome, and the history is left as it was.
//!
//! Callers invoke `before_inference` at most once per fresh user message; a
//! second call on the same message would wrap it twice.

use crate::compose::compose;
use crate::conversation::Message;
use crate::envelope::{self, InjectOutcome};
use crate::namespace::{MemoryAddresses, MemoryScope, resolve};
use crate::persist::{SpeakerLabels, persist};
use crate::retrieval::retrieve_all;
use crate::turn::extract_turn;
use log::{debug, error, info};
use mnemos_rs_config::{MemoryConfig, MnemosConfig};
use mnemos_rs_memory::MemoryStore;
use std::sync::Arc;

/// Characters of the query shown in logs.
const QUERY_PREVIEW_CHARS: usize = 30;

/// What the pre-inference phase did to the history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetrievalOutcome {
    /// The last message is not a fresh user utterance.
    NotApplicable,
    /// Context was injected into the last message.
    Injected { lines: usize },
    /// Retrieval succeeded but nothing was worth injecting.
    NoRelevantMemory,
    /// Retrieval failed; the history is untouched.
    Failed { error: String },
}

/// What the post-inference phase wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistOutcome {
    /// No completed turn could be recovered from the history.
    NotApplicable,
    /// One event was appended to the short-term stream.
    Persisted,
    /// The append failed; the event is lost.
    Failed { error: String },
}

/// Memory orchestration for one actor and session.
#[derive(Clone)]
pub struct MemoryHooks {
    store: Arc<dyn MemoryStore>,
    scope: MemoryScope,
    memory: MemoryConfig,
    labels: SpeakerLabels,
}

impl MemoryHooks {
    pub fn new(
        store: Arc<dyn MemoryStore>,
        scope: MemoryScope,
        memory: MemoryConfig,
        labels: SpeakerLabels,
    ) -> Self {
        Self {
            store,
            scope,
            memory,
            labels,
        }
    }

    /// Build hooks for `actor_id`/`session_id` from the loaded config.
    pub fn from_config(
        store: Arc<dyn MemoryStore>,
        config: &MnemosConfig,
        actor_id: impl Into<String>,
        session_id: impl Into<String>,
    ) -> Self {
        let scope = MemoryScope::new(config.memory.memory_id.clone(), actor_id, session_id);
        Self::new(
            store,
            scope,
            config.memory.clone(),
            SpeakerLabels::from_config(config),
        )
    }

    pub fn scope(&self) -> &MemoryScope {
        &self.scope
    }

    /// Lookup addresses for the current scope, derived fresh on every call.
    pub fn addresses(&self) -> MemoryAddresses {
        resolve(&self.scope, &self.memory)
    }

    /// Retrieve memory for the latest user utterance and inject it in place.
    pub async fn before_inference(&self, history: &mut [Message]) -> RetrievalOutcome {
        let Some(query) = history
            .last()
            .filter(|message| message.is_fresh_user_utterance())
            .and_then(Message::text)
            .map(str::to_string)
        else {
            return RetrievalOutcome::NotApplicable;
        };

        debug!(
            "retrieving memory (session_id={}, query={})",
            self.scope.session_id,
            preview(&query)
        );
        let addresses = self.addresses();
        let memory = match retrieve_all(&self.store, &query, &addresses).await {
            Ok(memory) => memory,
            Err(err) => {
                error!(
                    "memory retrieval failed (session_id={}): {err}",
                    self.scope.session_id
                );
                return RetrievalOutcome::Failed {
                    error: err.to_string(),
                };
            }
        };

        let composed = compose(&memory);
        match envelope::inject(history, &composed.render()) {
            InjectOutcome::Injected => {
                let lines = composed.line_count();
                info!(
                    "injected memory context (session_id={}, lines={lines})",
                    self.scope.session_id
                );
                RetrievalOutcome::Injected { lines }
            }
            InjectOutcome::NothingToInject => {
                debug!(
                    "no relevant memory (session_id={})",
                    self.scope.session_id
                );
                RetrievalOutcome::NoRelevantMemory
            }
            InjectOutcome::NoTarget => RetrievalOutcome::NotApplicable,
        }
    }

    /// Persist the turn that just completed, if one can be recovered.
    pub async fn after_inference(&self, history: &[Message]) -> PersistOutcome {
        let Some(turn) = extract_turn(history) else {
            debug!(
                "no completed turn to persist (session_id={}, messages={})",
                self.scope.session_id,
                history.len()
            );
            return PersistOutcome::NotApplicable;
        };

        let addresses = self.addresses();
        match persist(self.store.as_ref(), &addresses.stm, &turn, &self.labels).await {
            Ok(()) => {
                info!("persisted turn (session_id={})", self.scope.session_id);
                PersistOutcome::Persisted
            }
            Err(err) => {
                error!(
                    "turn persistence failed (session_id={}): {err}",
                    self.scope.session_id
                );
                PersistOutcome::Failed {
                    error: err.to_string(),
                }
            }
        }
    }
}

fn preview(query: &str) -> String {
    let mut chars = query.chars();
    let head: String = chars.by_ref().take(QUERY_PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}
