use async_trait::async_trait;
use mnemos_rs_memory::{EventMessage, EventRecord, MemoryError, MemoryRecord, MemoryStore};
use parking_lot::Mutex;
use serde_json::{Value, json};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

/// Key addressing the short-term listing in delays and failures.
pub const STM_KEY: &str = "stm";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppendedEvent {
    pub memory_id: String,
    pub actor_id: String,
    pub session_id: String,
    pub messages: Vec<EventMessage>,
}

/// Short-term event shaped like the store's output.
pub fn event_record(role: &str, text: &str) -> EventRecord {
    json!({
        "payload": [{ "conversational": { "role": role, "content": { "text": text } } }]
    })
}

/// Long-term record shaped like the store's output.
pub fn memory_record(text: &str) -> MemoryRecord {
    json!({ "content": { "text": text } })
}

/// In-memory store with canned results, per-call delays, and injected failures.
///
/// Lookups are keyed by [`STM_KEY`] for the short-term listing and by the
/// namespace string for long-term retrieval. Clones share recorded state.
#[derive(Clone, Default)]
pub struct StubStore {
    events: Vec<EventRecord>,
    records: HashMap<String, Vec<MemoryRecord>>,
    delays: HashMap<String, Duration>,
    failures: HashSet<String>,
    fail_append: bool,
    appended: Arc<Mutex<Vec<AppendedEvent>>>,
    queries: Arc<Mutex<Vec<(String, String)>>>,
    completed: Arc<Mutex<Vec<String>>>,
}

impl StubStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_events(mut self, events: Vec<EventRecord>) -> Self {
        self.events = events;
        self
    }

    pub fn with_records(mut self, namespace: impl Into<String>, records: Vec<Value>) -> Self {
        self.records.insert(namespace.into(), records);
        self
    }

    pub fn with_delay(mut self, key: impl Into<String>, delay: Duration) -> Self {
        self.delays.insert(key.into(), delay);
        self
    }

    pub fn failing(mut self, key: impl Into<String>) -> Self {
        self.failures.insert(key.into());
        self
    }

    pub fn failing_append(mut self) -> Self {
        self.fail_append = true;
        self
    }

    pub fn appended(&self) -> Vec<AppendedEvent> {
        self.appended.lock().clone()
    }

    /// `(namespace, query)` pairs seen by `retrieve_records`.
    pub fn queries(&self) -> Vec<(String, String)> {
        self.queries.lock().clone()
    }

    /// Keys of lookups that ran to completion, in completion order.
    pub fn completed(&self) -> Vec<String> {
        self.completed.lock().clone()
    }

    async fn lookup<T: Clone>(
        &self,
        key: &str,
        found: Option<&Vec<T>>,
    ) -> Result<Vec<T>, MemoryError> {
        if let Some(delay) = self.delays.get(key) {
            tokio::time::sleep(*delay).await;
        }
        self.completed.lock().push(key.to_string());
        if self.failures.contains(key) {
            return Err(MemoryError::Unavailable(format!("stub failure for {key}")));
        }
        Ok(found.cloned().unwrap_or_default())
    }
}

#[async_trait]
impl MemoryStore for StubStore {
    async fn list_events(
        &self,
        _memory_id: &str,
        _actor_id: &str,
        _session_id: &str,
        max_results: usize,
    ) -> Result<Vec<EventRecord>, MemoryError> {
        let mut events = self.lookup(STM_KEY, Some(&self.events)).await?;
        Ok(events.split_off(events.len().saturating_sub(max_results)))
    }

    async fn retrieve_records(
        &self,
        _memory_id: &str,
        namespace: &str,
        query: &str,
    ) -> Result<Vec<MemoryRecord>, MemoryError> {
        self.queries
            .lock()
            .push((namespace.to_string(), query.to_string()));
        self.lookup(namespace, self.records.get(namespace)).await
    }

    async fn append_event(
        &self,
        memory_id: &str,
        actor_id: &str,
        session_id: &str,
        messages: Vec<EventMessage>,
    ) -> Result<(), MemoryError> {
        if self.fail_append {
            return Err(MemoryError::Unavailable("stub append failure".to_string()));
        }
        self.appended.lock().push(AppendedEvent {
            memory_id: memory_id.to_string(),
            actor_id: actor_id.to_string(),
            session_id: session_id.to_string(),
            messages,
        });
        Ok(())
    }
}
