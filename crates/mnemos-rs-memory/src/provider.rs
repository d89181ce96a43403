//! Memory store interface and the file-backed default implementation.

use crate::error::MemoryError;
use crate::model::{EventMessage, EventRecord, MemoryRecord};
use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info};
use regex::Regex;
use serde_json::{Value, json};
use std::collections::HashSet;
use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Default number of long-term records returned per namespace lookup.
pub const DEFAULT_RETRIEVE_TOP_K: usize = 10;

#[async_trait]
/// Read/write API of the durable memory store used by the orchestrator.
///
/// Implementations own storage, background summarization, and retention. The
/// orchestrator only reads recent events, retrieves long-term records, and
/// appends one event per completed turn.
pub trait MemoryStore: Send + Sync {
    /// List the most recent short-term events for an actor's session.
    async fn list_events(
        &self,
        memory_id: &str,
        actor_id: &str,
        session_id: &str,
        max_results: usize,
    ) -> Result<Vec<EventRecord>, MemoryError>;

    /// Retrieve long-term records from a namespace relevant to `query`.
    async fn retrieve_records(
        &self,
        memory_id: &str,
        namespace: &str,
        query: &str,
    ) -> Result<Vec<MemoryRecord>, MemoryError>;

    /// Append a single event made of the given tagged messages.
    async fn append_event(
        &self,
        memory_id: &str,
        actor_id: &str,
        session_id: &str,
        messages: Vec<EventMessage>,
    ) -> Result<(), MemoryError>;
}

/// File-backed store keeping JSONL events and records under a root directory.
///
/// Layout: `<root>/<memory_id>/events/<actor>/<session>.jsonl` for short-term
/// events and `<root>/<memory_id>/records/<namespace>.jsonl` for long-term
/// records. This store has no extraction pipeline of its own; long-term
/// records are written through [`FileMemoryStore::put_record`].
#[derive(Debug, Clone)]
pub struct FileMemoryStore {
    root: PathBuf,
    top_k: usize,
}

impl FileMemoryStore {
    /// Create a new file-backed store under the given root.
    pub fn new(root: impl AsRef<Path>) -> Result<Self, MemoryError> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(&root)?;
        info!("initialized file memory store (root={})", root.display());
        Ok(Self {
            root,
            top_k: DEFAULT_RETRIEVE_TOP_K,
        })
    }

    /// Override the per-namespace retrieval cap.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Store a long-term record under `namespace`.
    pub fn put_record(
        &self,
        memory_id: &str,
        namespace: &str,
        text: &str,
    ) -> Result<MemoryRecord, MemoryError> {
        let path = self.records_path(memory_id, namespace)?;
        let record = json!({
            "memoryRecordId": Uuid::new_v4().to_string(),
            "content": { "text": text },
            "namespaces": [namespace],
            "createdAt": Utc::now().to_rfc3339(),
        });
        append_line(&path, &record)?;
        debug!(
            "stored long-term record (memory_id={}, namespace={}, text_len={})",
            memory_id,
            namespace,
            text.len()
        );
        Ok(record)
    }

    fn memory_root(&self, memory_id: &str) -> Result<PathBuf, MemoryError> {
        Ok(self.root.join(checked_component(memory_id)?))
    }

    fn events_path(
        &self,
        memory_id: &str,
        actor_id: &str,
        session_id: &str,
    ) -> Result<PathBuf, MemoryError> {
        Ok(self
            .memory_root(memory_id)?
            .join("events")
            .join(checked_component(actor_id)?)
            .join(format!("{}.jsonl", checked_component(session_id)?)))
    }

    fn records_path(&self, memory_id: &str, namespace: &str) -> Result<PathBuf, MemoryError> {
        let mut path = self.memory_root(memory_id)?.join("records");
        let segments = namespace
            .trim_matches('/')
            .split('/')
            .map(checked_component)
            .collect::<Result<Vec<_>, _>>()?;
        let Some((last, parents)) = segments.split_last() else {
            return Err(MemoryError::InvalidPath(namespace.to_string()));
        };
        for segment in parents {
            path.push(segment);
        }
        path.push(format!("{last}.jsonl"));
        Ok(path)
    }
}

#[async_trait]
impl MemoryStore for FileMemoryStore {
    async fn list_events(
        &self,
        memory_id: &str,
        actor_id: &str,
        session_id: &str,
        max_results: usize,
    ) -> Result<Vec<EventRecord>, MemoryError> {
        let path = self.events_path(memory_id, actor_id, session_id)?;
        let events = read_lines(&path)?;
        let start = events.len().saturating_sub(max_results);
        debug!(
            "listed events (actor_id={}, session_id={}, returned={})",
            actor_id,
            session_id,
            events.len() - start
        );
        Ok(events[start..].to_vec())
    }

    async fn retrieve_records(
        &self,
        memory_id: &str,
        namespace: &str,
        query: &str,
    ) -> Result<Vec<MemoryRecord>, MemoryError> {
        let path = self.records_path(memory_id, namespace)?;
        let records = read_lines(&path)?;
        let ranked = rank_records(records, query, self.top_k);
        debug!(
            "retrieved records (namespace={}, returned={})",
            namespace,
            ranked.len()
        );
        Ok(ranked)
    }

    async fn append_event(
        &self,
        memory_id: &str,
        actor_id: &str,
        session_id: &str,
        messages: Vec<EventMessage>,
    ) -> Result<(), MemoryError> {
        let path = self.events_path(memory_id, actor_id, session_id)?;
        let payload = messages
            .iter()
            .map(|message| {
                json!({
                    "conversational": {
                        "role": message.role.as_str(),
                        "content": { "text": message.text },
                    }
                })
            })
            .collect::<Vec<_>>();
        let event = json!({
            "eventId": Uuid::new_v4().to_string(),
            "actorId": actor_id,
            "sessionId": session_id,
            "eventTimestamp": Utc::now().to_rfc3339(),
            "payload": payload,
        });
        append_line(&path, &event)?;
        debug!(
            "appended event (actor_id={}, session_id={}, messages={})",
            actor_id,
            session_id,
            messages.len()
        );
        Ok(())
    }
}

/// Reject identifiers that would escape or collapse the storage layout.
fn checked_component(value: &str) -> Result<&str, MemoryError> {
    if value.is_empty()
        || value == "."
        || value == ".."
        || value.contains(['/', '\\'])
        || value.contains('\0')
    {
        return Err(MemoryError::InvalidPath(value.to_string()));
    }
    Ok(value)
}

fn read_lines(path: &Path) -> Result<Vec<Value>, MemoryError> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let file = OpenOptions::new().read(true).open(path)?;
    let reader = BufReader::new(file);
    let mut values = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        values.push(serde_json::from_str(&line)?);
    }
    Ok(values)
}

fn append_line(path: &Path, value: &Value) -> Result<(), MemoryError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    let line = serde_json::to_string(value)?;
    writeln!(file, "{line}")?;
    Ok(())
}

/// Rank records by how many query terms their text contains, newest first on ties.
fn rank_records(records: Vec<Value>, query: &str, top_k: usize) -> Vec<Value> {
    let terms = tokenize(query);
    let mut scored = records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            let text = record
                .get("content")
                .and_then(|content| content.get("text"))
                .and_then(Value::as_str)
                .unwrap_or_default();
            let score = if terms.is_empty() {
                0
            } else {
                let words = tokenize(text);
                terms.iter().filter(|term| words.contains(*term)).count()
            };
            (score, index, record)
        })
        .filter(|(score, _, _)| terms.is_empty() || *score > 0)
        .collect::<Vec<_>>();
    scored.sort_by(|a, b| b.0.cmp(&a.0).then(b.1.cmp(&a.1)));
    scored
        .into_iter()
        .take(top_k)
        .map(|(_, _, record)| record)
        .collect()
}

fn tokenize(text: &str) -> HashSet<String> {
    let Ok(regex) = Regex::new(r"\w+") else {
        return text.split_whitespace().map(str::to_lowercase).collect();
    };
    regex
        .find_iter(text)
        .map(|word| word.as_str().to_lowercase())
        .collect()
}
