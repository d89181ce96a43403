//! Memory agent integration tests with mock LLMs.

use autoagents_llm::LLMProvider;
use autoagents_llm::chat::ChatRole;
use mnemos_rs_config::MnemosConfig;
use mnemos_rs_core::prompt::system_prompt;
use mnemos_rs_core::{
    MemoryAgent, MemoryHooks, MnemosCoreError, PersistOutcome, RetrievalOutcome,
};
use mnemos_rs_memory::{FileMemoryStore, MemoryStore};
use mnemos_rs_test_utils::{FailingLLM, FixedLLM, RecordingChatLLM, StubStore, event_record};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use tempfile::tempdir;

fn agent_with(llm: Arc<dyn LLMProvider>, store: Arc<dyn MemoryStore>) -> MemoryAgent {
    let config = MnemosConfig::default();
    let hooks = MemoryHooks::from_config(store, &config, "user_1", "session_1");
    MemoryAgent::new(llm, hooks, system_prompt(&config.character))
}

/// The second turn sees the first one as recent conversation.
#[tokio::test]
async fn second_turn_recalls_first_from_file_store() {
    let temp = tempdir().expect("tempdir");
    let store: Arc<dyn MemoryStore> =
        Arc::new(FileMemoryStore::new(temp.path()).expect("store"));
    let llm = RecordingChatLLM::new("반가워요.");
    let mut agent = agent_with(Arc::new(llm.clone()), store);

    let first = agent.run("hello").await.expect("first turn");
    assert_eq!(first.response, "반가워요.");
    assert_eq!(first.retrieval, RetrievalOutcome::NoRelevantMemory);
    assert_eq!(first.persistence, PersistOutcome::Persisted);

    let second = agent.run("do you remember me?").await.expect("second turn");
    assert_eq!(second.retrieval, RetrievalOutcome::Injected { lines: 2 });
    assert_eq!(second.persistence, PersistOutcome::Persisted);

    let sent = llm.last_messages();
    assert_eq!(sent.len(), 4);
    assert!(matches!(sent[0].role, ChatRole::System));
    assert!(sent[0].content.starts_with("당신은 한시율입니다."));
    assert_eq!(sent[1].content, "hello");
    assert_eq!(
        sent[3].content,
        "<character_memory>\n=== 최근 대화 (STM) ===\n• USER: 사용자: hello\n• ASSISTANT: 한시율(AI): 반가워요.\n</character_memory>\n\ndo you remember me?"
    );
    assert_eq!(agent.history().len(), 4);
}

/// Persisted events never contain the injected envelope.
#[tokio::test]
async fn persisted_events_hold_bare_text() {
    let store = StubStore::new().with_events(vec![event_record("USER", "earlier")]);
    let mut agent = agent_with(
        Arc::new(FixedLLM::new("기억하고 있어요.")),
        Arc::new(store.clone()),
    );

    let report = agent.run("still there?").await.expect("turn");

    assert_eq!(report.retrieval, RetrievalOutcome::Injected { lines: 1 });
    let appended = store.appended();
    assert_eq!(appended.len(), 1);
    assert_eq!(appended[0].messages[0].text, "사용자: still there?");
    assert_eq!(appended[0].messages[1].text, "한시율(AI): 기억하고 있어요.");
}

/// Store failures never fail the turn.
#[tokio::test]
async fn memory_failures_do_not_abort_turn() {
    let store = StubStore::new().failing("stm").failing_append();
    let mut agent = agent_with(Arc::new(FixedLLM::new("네.")), Arc::new(store.clone()));

    let report = agent.run("hello").await.expect("turn completes");

    assert_eq!(report.response, "네.");
    assert!(matches!(report.retrieval, RetrievalOutcome::Failed { .. }));
    assert!(matches!(report.persistence, PersistOutcome::Failed { .. }));
    assert_eq!(agent.history()[0].text(), Some("hello"));
}

/// A model failure surfaces and drops the pending user message.
#[tokio::test]
async fn model_failure_is_returned() {
    let store = StubStore::new();
    let mut agent = agent_with(Arc::new(FailingLLM::new("boom")), Arc::new(store.clone()));

    let err = agent.run("hello").await.expect_err("model fails");

    assert!(matches!(err, MnemosCoreError::Model(message) if message.contains("boom")));
    assert!(agent.history().is_empty());
    assert!(store.appended().is_empty());
}
