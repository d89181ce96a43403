//! Context composition from raw store output.
//!
//! Store records are untyped. Each item goes through a fallible parse that
//! maps any shape mismatch to "skip", so malformed output only thins the
//! context and never aborts a turn.

use crate::retrieval::RetrievedMemory;
use mnemos_rs_memory::{EventRecord, MemoryRecord};
use serde_json::Value;
use std::fmt;

/// Bullet prefix for every context line.
const BULLET: &str = "•";

/// Memory categories in their fixed output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemoryCategory {
    /// Recent raw conversation events.
    RecentConversation,
    /// Summaries of past conversations.
    Summary,
    /// User preferences.
    Preference,
    /// Facts about the user.
    Semantic,
}

impl MemoryCategory {
    /// All categories, in output order.
    pub const ALL: [MemoryCategory; 4] = [
        MemoryCategory::RecentConversation,
        MemoryCategory::Summary,
        MemoryCategory::Preference,
        MemoryCategory::Semantic,
    ];

    /// Section heading placed above the category's lines.
    pub fn heading(&self) -> &'static str {
        match self {
            MemoryCategory::RecentConversation => "=== 최근 대화 (STM) ===",
            MemoryCategory::Summary => "=== 과거 대화 요약 (LTM) ===",
            MemoryCategory::Preference => "=== 사용자 취향 (LTM) ===",
            MemoryCategory::Semantic => "=== 사실 정보 (LTM) ===",
        }
    }

    /// Short label for logs.
    pub fn label(&self) -> &'static str {
        match self {
            MemoryCategory::RecentConversation => "stm",
            MemoryCategory::Summary => "summary",
            MemoryCategory::Preference => "preference",
            MemoryCategory::Semantic => "semantic",
        }
    }
}

/// One `role: text` exchange line recovered from a short-term event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationalLine {
    pub role: String,
    pub text: String,
}

impl fmt::Display for ConversationalLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{BULLET} {}: {}", self.role, self.text)
    }
}

/// A non-empty labelled block of context lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextSection {
    pub category: MemoryCategory,
    pub lines: Vec<String>,
}

impl ContextSection {
    fn render(&self) -> String {
        let mut out = String::from(self.category.heading());
        for line in &self.lines {
            out.push('\n');
            out.push_str(line);
        }
        out
    }
}

/// Composed memory context; sections are always in [`MemoryCategory::ALL`] order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComposedContext {
    sections: Vec<ContextSection>,
}

impl ComposedContext {
    /// Non-empty sections, in output order.
    pub fn sections(&self) -> &[ContextSection] {
        &self.sections
    }

    /// True when no category produced a line.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Total number of context lines across sections.
    pub fn line_count(&self) -> usize {
        self.sections.iter().map(|section| section.lines.len()).sum()
    }

    /// Sections joined by a blank line; empty when nothing was composed.
    pub fn render(&self) -> String {
        self.sections
            .iter()
            .map(ContextSection::render)
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Build the context from the four retrieval results.
///
/// Output order is fixed regardless of which lookup finished first, empty
/// categories are dropped, and duplicate lines are kept.
pub fn compose(memory: &RetrievedMemory) -> ComposedContext {
    let mut sections = Vec::new();
    for category in MemoryCategory::ALL {
        let lines: Vec<String> = match category {
            MemoryCategory::RecentConversation => memory
                .stm_events
                .iter()
                .flat_map(conversational_lines)
                .map(|line| line.to_string())
                .collect(),
            MemoryCategory::Summary => record_lines(&memory.summary),
            MemoryCategory::Preference => record_lines(&memory.preference),
            MemoryCategory::Semantic => record_lines(&memory.semantic),
        };
        if !lines.is_empty() {
            sections.push(ContextSection { category, lines });
        }
    }
    ComposedContext { sections }
}

fn record_lines(records: &[MemoryRecord]) -> Vec<String> {
    records
        .iter()
        .filter_map(memory_text)
        .map(|text| format!("{BULLET} {text}"))
        .collect()
}

/// Exchange lines of one short-term event.
///
/// The event must be an object with a `payload` array; each payload item must
/// carry a `conversational` object. Role defaults to empty, items without
/// non-empty `content.text` are skipped.
pub fn conversational_lines(event: &EventRecord) -> Vec<ConversationalLine> {
    let Some(payload) = event.get("payload").and_then(Value::as_array) else {
        return Vec::new();
    };
    payload
        .iter()
        .filter_map(|item| {
            let conversational = item.get("conversational")?.as_object()?;
            let role = conversational
                .get("role")
                .and_then(Value::as_str)
                .unwrap_or_default();
            let text = conversational
                .get("content")
                .and_then(|content| content.get("text"))
                .and_then(Value::as_str)
                .unwrap_or_default();
            if text.is_empty() {
                return None;
            }
            Some(ConversationalLine {
                role: role.to_string(),
                text: text.to_string(),
            })
        })
        .collect()
}

/// Trimmed `content.text` of a long-term record, if present and non-empty.
pub fn memory_text(record: &MemoryRecord) -> Option<String> {
    let text = record
        .as_object()?
        .get("content")?
        .as_object()?
        .get("text")?
        .as_str()?
        .trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::{ConversationalLine, MemoryCategory, compose, conversational_lines, memory_text};
    use crate::retrieval::RetrievedMemory;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn stm_event(role: &str, text: &str) -> serde_json::Value {
        json!({ "payload": [{ "conversational": { "role": role, "content": { "text": text } } }] })
    }

    fn record(text: &str) -> serde_json::Value {
        json!({ "content": { "text": text } })
    }

    #[test]
    fn empty_inputs_compose_to_empty_string() {
        let composed = compose(&RetrievedMemory::default());
        assert!(composed.is_empty());
        assert_eq!(composed.render(), "");
        assert_eq!(composed.line_count(), 0);
    }

    #[test]
    fn single_stm_line_renders_with_heading() {
        let memory = RetrievedMemory {
            stm_events: vec![stm_event("USER", "hi")],
            ..RetrievedMemory::default()
        };
        assert_eq!(compose(&memory).render(), "=== 최근 대화 (STM) ===\n• USER: hi");
    }

    #[test]
    fn sections_follow_fixed_order_with_blank_separators() {
        let memory = RetrievedMemory {
            stm_events: vec![stm_event("ASSISTANT", "welcome back")],
            summary: vec![record("talked about Chopin")],
            preference: vec![record("  likes slow tempos  ")],
            semantic: vec![record("has a recital in May"), record("has a recital in May")],
        };
        let expected = [
            "=== 최근 대화 (STM) ===\n• ASSISTANT: welcome back",
            "=== 과거 대화 요약 (LTM) ===\n• talked about Chopin",
            "=== 사용자 취향 (LTM) ===\n• likes slow tempos",
            "=== 사실 정보 (LTM) ===\n• has a recital in May\n• has a recital in May",
        ]
        .join("\n\n");
        let composed = compose(&memory);
        assert_eq!(composed.render(), expected);
        assert_eq!(composed.line_count(), 5);
    }

    #[test]
    fn empty_categories_are_dropped() {
        let memory = RetrievedMemory {
            semantic: vec![record("fact")],
            summary: vec![record("   ")],
            ..RetrievedMemory::default()
        };
        let composed = compose(&memory);
        let categories = composed
            .sections()
            .iter()
            .map(|section| section.category)
            .collect::<Vec<_>>();
        assert_eq!(categories, vec![MemoryCategory::Semantic]);
        assert_eq!(composed.render(), "=== 사실 정보 (LTM) ===\n• fact");
    }

    #[test]
    fn malformed_events_are_skipped() {
        let events = vec![
            json!("not an object"),
            json!({ "no_payload": [] }),
            json!({ "payload": "not a list" }),
            json!({ "payload": [
                42,
                { "other": {} },
                { "conversational": "flat" },
                { "conversational": { "role": "USER", "content": "flat" } },
                { "conversational": { "role": "USER", "content": { "text": 7 } } },
                { "conversational": { "role": "USER", "content": { "text": "" } } },
                { "conversational": { "content": { "text": "no role" } } },
                { "conversational": { "role": "USER", "content": { "text": "kept" } } },
            ] }),
        ];
        let lines = events.iter().flat_map(conversational_lines).collect::<Vec<_>>();
        assert_eq!(
            lines,
            vec![
                ConversationalLine {
                    role: String::new(),
                    text: "no role".to_string(),
                },
                ConversationalLine {
                    role: "USER".to_string(),
                    text: "kept".to_string(),
                },
            ]
        );
        assert_eq!(lines[0].to_string(), "• : no role");
    }

    #[test]
    fn malformed_records_are_skipped() {
        let records = [
            json!(null),
            json!(["content"]),
            json!({ "content": "flat text" }),
            json!({ "content": { "text": null } }),
            json!({ "content": { "body": "x" } }),
            json!({ "content": { "text": " padded " } }),
        ];
        let texts = records.iter().filter_map(memory_text).collect::<Vec<_>>();
        assert_eq!(texts, vec!["padded".to_string()]);
    }

    #[test]
    fn well_formed_items_survive_among_malformed_ones() {
        let memory = RetrievedMemory {
            stm_events: vec![json!(1), stm_event("USER", "hello"), json!({})],
            preference: vec![json!("x"), record("tea"), json!({ "content": [] })],
            ..RetrievedMemory::default()
        };
        assert_eq!(
            compose(&memory).render(),
            "=== 최근 대화 (STM) ===\n• USER: hello\n\n=== 사용자 취향 (LTM) ===\n• tea"
        );
    }
}
