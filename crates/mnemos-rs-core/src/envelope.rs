//! The `<character_memory>` envelope carrying context into a user message.
//!
//! A message holds at most one envelope. [`inject`] does not check for an
//! existing one; callers inject once per fresh user message.

use crate::conversation::{ContentPart, Message};

/// Opening delimiter of the envelope.
pub const OPEN_TAG: &str = "<character_memory>";
/// Closing delimiter of the envelope.
pub const CLOSE_TAG: &str = "</character_memory>";

/// Result of an injection attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectOutcome {
    /// The last message now carries the envelope.
    Injected,
    /// Nothing was composed; the message is untouched.
    NothingToInject,
    /// The history has no last message with leading text.
    NoTarget,
}

/// Wrap composed context and the original text into the envelope.
pub fn wrap(context: &str, original: &str) -> String {
    format!("{OPEN_TAG}\n{context}\n{CLOSE_TAG}\n\n{original}")
}

/// Recover the original text from a possibly wrapped message.
///
/// Text without the opening tag is returned as is. Otherwise everything up to
/// and including the last closing tag is dropped and the rest is trimmed.
pub fn strip(text: &str) -> &str {
    if !text.contains(OPEN_TAG) {
        return text;
    }
    match text.rfind(CLOSE_TAG) {
        Some(idx) => text[idx + CLOSE_TAG.len()..].trim(),
        None => text.trim(),
    }
}

/// Rewrite the first text part of the last message in `history`.
///
/// Only that one field is mutated. An empty `context` leaves the history
/// byte-for-byte unchanged and reports [`InjectOutcome::NothingToInject`].
pub fn inject(history: &mut [Message], context: &str) -> InjectOutcome {
    if context.is_empty() {
        return InjectOutcome::NothingToInject;
    }
    let Some(last) = history.last_mut() else {
        return InjectOutcome::NoTarget;
    };
    let Some(ContentPart::Text(text)) = last.content.first_mut() else {
        return InjectOutcome::NoTarget;
    };
    *text = wrap(context, text);
    InjectOutcome::Injected
}

#[cfg(test)]
mod tests {
    use super::{InjectOutcome, inject, strip, wrap};
    use crate::conversation::Message;
    use pretty_assertions::assert_eq;

    #[test]
    fn wrap_places_context_before_original() {
        assert_eq!(
            wrap("ctx", "hello"),
            "<character_memory>\nctx\n</character_memory>\n\nhello"
        );
    }

    #[test]
    fn inject_rewrites_last_message_only() {
        let mut history = vec![Message::user("first"), Message::user("second")];
        let outcome = inject(&mut history, "ctx");
        assert_eq!(outcome, InjectOutcome::Injected);
        assert_eq!(history[0], Message::user("first"));
        assert_eq!(
            history[1].text(),
            Some("<character_memory>\nctx\n</character_memory>\n\nsecond")
        );
    }

    #[test]
    fn inject_with_empty_context_is_distinguishable_noop() {
        let mut history = vec![Message::user("  keep me \n")];
        let before = history.clone();
        assert_eq!(inject(&mut history, ""), InjectOutcome::NothingToInject);
        assert_eq!(history, before);
    }

    #[test]
    fn inject_without_text_target() {
        let mut empty: Vec<Message> = Vec::new();
        assert_eq!(inject(&mut empty, "ctx"), InjectOutcome::NoTarget);

        let mut history = vec![Message::tool_result("call_1", "out")];
        assert_eq!(inject(&mut history, "ctx"), InjectOutcome::NoTarget);
    }

    #[test]
    fn strip_recovers_original_for_any_context() {
        for context in ["", "x", "line\n</character_memory>\nmore", "• USER: hi\n\n=== s ==="] {
            let wrapped = wrap(context, "  what did I say?  ");
            assert_eq!(strip(&wrapped), "what did I say?");
        }
    }

    #[test]
    fn strip_leaves_plain_text_untouched() {
        assert_eq!(strip("  plain  "), "  plain  ");
        assert_eq!(strip("only </character_memory> closing"), "only </character_memory> closing");
        assert_eq!(strip("<character_memory> unterminated "), "<character_memory> unterminated");
    }
}
