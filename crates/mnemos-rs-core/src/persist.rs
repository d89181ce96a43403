//! Writing a completed turn to the short-term event stream.

use crate::error::MnemosCoreError;
use crate::namespace::StmAddress;
use crate::turn::CompletedTurn;
use log::debug;
use mnemos_rs_config::MnemosConfig;
use mnemos_rs_memory::{EventMessage, EventRole, MemoryStore};

/// Speaker names prefixed to each side of a persisted turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeakerLabels {
    pub user: String,
    pub assistant: String,
}

impl SpeakerLabels {
    pub fn from_config(config: &MnemosConfig) -> Self {
        Self {
            user: config.persistence.user_label.clone(),
            assistant: config.character.assistant_label(),
        }
    }
}

impl Default for SpeakerLabels {
    fn default() -> Self {
        Self::from_config(&MnemosConfig::default())
    }
}

/// The two tagged messages of the event for `turn`, user side first.
pub fn event_messages(turn: &CompletedTurn, labels: &SpeakerLabels) -> Vec<EventMessage> {
    vec![
        EventMessage::new(
            format!("{}: {}", labels.user, turn.user_text),
            EventRole::User,
        ),
        EventMessage::new(
            format!("{}: {}", labels.assistant, turn.assistant_text),
            EventRole::Assistant,
        ),
    ]
}

/// Append `turn` as exactly one event on the session's short-term stream.
///
/// Promotion into long-term memory is the store's business and happens on its
/// own schedule.
pub async fn persist(
    store: &dyn MemoryStore,
    address: &StmAddress,
    turn: &CompletedTurn,
    labels: &SpeakerLabels,
) -> Result<(), MnemosCoreError> {
    let messages = event_messages(turn, labels);
    debug!(
        "persisting turn (session_id={}, user_len={}, assistant_len={})",
        address.session_id,
        turn.user_text.len(),
        turn.assistant_text.len()
    );
    store
        .append_event(
            &address.memory_id,
            &address.actor_id,
            &address.session_id,
            messages,
        )
        .await?;
    Ok(())
}
