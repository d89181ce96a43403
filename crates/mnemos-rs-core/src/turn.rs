//! Recovering the latest user/assistant exchange from history.

use crate::conversation::{Message, Role};
use crate::envelope;

/// The bare exchange of one completed turn, with any envelope removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedTurn {
    pub user_text: String,
    pub assistant_text: String,
}

/// Find the most recent assistant reply and the user utterance that led to it.
///
/// Requires at least two messages with an assistant message last. Scans
/// backward, takes the first assistant text, then stops at the first user
/// message that is not a tool result. Empty text on either side counts as
/// not found.
pub fn extract_turn(history: &[Message]) -> Option<CompletedTurn> {
    if history.len() < 2 || history.last()?.role != Role::Assistant {
        return None;
    }

    let mut assistant_text: Option<&str> = None;
    for message in history.iter().rev() {
        match message.role {
            Role::Assistant => {
                if assistant_text.is_none() {
                    assistant_text = message.text().filter(|text| !text.is_empty());
                }
            }
            Role::User => {
                let Some(text) = message.text() else {
                    continue;
                };
                let user_text = envelope::strip(text);
                if user_text.is_empty() {
                    return None;
                }
                return assistant_text.map(|assistant_text| CompletedTurn {
                    user_text: user_text.to_string(),
                    assistant_text: assistant_text.to_string(),
                });
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::{CompletedTurn, extract_turn};
    use crate::conversation::Message;
    use crate::envelope::wrap;
    use pretty_assertions::assert_eq;

    fn turn(user: &str, assistant: &str) -> Option<CompletedTurn> {
        Some(CompletedTurn {
            user_text: user.to_string(),
            assistant_text: assistant.to_string(),
        })
    }

    #[test]
    fn extracts_plain_pair() {
        let history = vec![Message::user("hello"), Message::assistant("hi there")];
        assert_eq!(extract_turn(&history), turn("hello", "hi there"));
    }

    #[test]
    fn single_message_history_yields_nothing() {
        assert_eq!(extract_turn(&[Message::assistant("hi")]), None);
    }

    #[test]
    fn requires_assistant_last() {
        let history = vec![Message::assistant("hi"), Message::user("hello")];
        assert_eq!(extract_turn(&history), None);
    }

    #[test]
    fn tool_result_is_not_an_eligible_user_message() {
        let history = vec![Message::tool_result("call_1", "42"), Message::assistant("done")];
        assert_eq!(extract_turn(&history), None);
    }

    #[test]
    fn skips_tool_results_to_reach_the_utterance() {
        let history = vec![
            Message::user("old question"),
            Message::assistant("old answer"),
            Message::user("what is 6 times 7?"),
            Message::assistant("let me check"),
            Message::tool_result("call_1", "42"),
            Message::assistant("it is 42"),
        ];
        assert_eq!(extract_turn(&history), turn("what is 6 times 7?", "it is 42"));
    }

    #[test]
    fn strips_injected_envelope() {
        let context = "=== 최근 대화 (STM) ===\n• USER: hi";
        let history = vec![
            Message::user(wrap(context, "do you remember me?")),
            Message::assistant("of course"),
        ];
        assert_eq!(extract_turn(&history), turn("do you remember me?", "of course"));
    }

    #[test]
    fn empty_sides_count_as_missing() {
        let history = vec![Message::user("hello"), Message::assistant("")];
        assert_eq!(extract_turn(&history), None);

        let history = vec![Message::user(wrap("ctx", "   ")), Message::assistant("hi")];
        assert_eq!(extract_turn(&history), None);
    }
}
