//! The chat session state machine.
//!
//! A session is an explicit, owned state object mutated only through two
//! transitions: [`SessionState::send`] and [`SessionState::resolve`]. The
//! session is either `Idle` (no request outstanding) or `Awaiting` (exactly
//! one request outstanding); there are no other states.

use std::collections::VecDeque;

use crate::core::assistant::{AssistantError, ErrorKind, Turn};
use crate::core::constants::{
    AUTH_ERROR_NOTICE, EMPTY_RESPONSE_NOTICE, RATE_LIMIT_NOTICE, TRANSIENT_ERROR_NOTICE,
};
use crate::core::message::{Message, Role};

/// User-facing description of the most recent failure.
///
/// The kind is kept alongside the copy so the UI can render configuration
/// problems as a persistent banner rather than a per-turn error.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionError {
    pub kind: ErrorKind,
    pub message: String,
}

impl SessionError {
    fn from_assistant(err: &AssistantError) -> Self {
        let message = match err.kind() {
            // Configuration copy travels on the error itself: the store
            // composes it before the call is ever attempted.
            ErrorKind::Configuration => err.detail().to_string(),
            ErrorKind::Authentication => AUTH_ERROR_NOTICE.to_string(),
            ErrorKind::RateLimit => RATE_LIMIT_NOTICE.to_string(),
            ErrorKind::Transient => TRANSIENT_ERROR_NOTICE.to_string(),
        };
        Self {
            kind: err.kind(),
            message,
        }
    }
}

/// Everything the collaborator needs for one request: the prompt and the
/// full turn history strictly before it.
#[derive(Debug, Clone, PartialEq)]
pub struct Outbound {
    pub prompt: String,
    pub history: Vec<Turn>,
}

pub struct SessionState {
    messages: VecDeque<Message>,
    pending: bool,
    last_error: Option<SessionError>,
    next_message_id: u64,
}

impl SessionState {
    /// Create a fresh session seeded with one assistant greeting.
    pub fn new(greeting: &str) -> Self {
        let mut state = Self {
            messages: VecDeque::new(),
            pending: false,
            last_error: None,
            next_message_id: 1,
        };
        state.push_message(Role::Assistant, greeting.to_string());
        state
    }

    pub fn messages(&self) -> &VecDeque<Message> {
        &self.messages
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn is_idle(&self) -> bool {
        !self.pending
    }

    pub fn last_error(&self) -> Option<&SessionError> {
        self.last_error.as_ref()
    }

    /// The `Send` transition.
    ///
    /// Appends the user's turn, clears the last error, and moves to
    /// `Awaiting`. Returns what must be dispatched to the assistant, with the
    /// history captured strictly before the appended message.
    ///
    /// A send while already awaiting, or with blank text, is a defensive
    /// no-op: the UI should not allow it, but the session ignores it either
    /// way.
    pub fn send(&mut self, text: &str) -> Option<Outbound> {
        if self.pending || text.trim().is_empty() {
            return None;
        }

        let history: Vec<Turn> = self
            .messages
            .iter()
            .map(|message| Turn {
                role: message.role,
                text: message.text.clone(),
            })
            .collect();

        self.last_error = None;
        self.push_message(Role::User, text.to_string());
        self.pending = true;

        Some(Outbound {
            prompt: text.to_string(),
            history,
        })
    }

    /// The `Resolve` transition: the only legal completion path for an
    /// outstanding request.
    ///
    /// On success the assistant's turn is appended, with a fixed fallback
    /// notice substituted for a blank reply. On failure the user's turn stays
    /// in place and only `last_error` changes, so the user can retry or edit.
    /// Either way the session returns to `Idle`.
    pub fn resolve(&mut self, outcome: Result<String, AssistantError>) {
        if !self.pending {
            tracing::debug!("ignoring resolve while idle");
            return;
        }

        match outcome {
            Ok(text) => {
                let text = if text.trim().is_empty() {
                    EMPTY_RESPONSE_NOTICE.to_string()
                } else {
                    text
                };
                self.push_message(Role::Assistant, text);
            }
            Err(err) => {
                tracing::warn!(kind = ?err.kind(), detail = err.detail(), "assistant call failed");
                self.last_error = Some(SessionError::from_assistant(&err));
            }
        }

        self.pending = false;
    }

    fn push_message(&mut self, role: Role, text: String) {
        let id = self.next_message_id;
        self.next_message_id += 1;
        self.messages.push_back(Message::new(id, role, text));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> SessionState {
        SessionState::new("Konnichiwa!")
    }

    #[test]
    fn new_session_holds_exactly_the_greeting() {
        let state = seeded();
        assert_eq!(state.messages().len(), 1);
        let greeting = state.messages().front().expect("seed greeting");
        assert_eq!(greeting.role, Role::Assistant);
        assert_eq!(greeting.text, "Konnichiwa!");
        assert!(state.is_idle());
        assert!(state.last_error().is_none());
    }

    #[test]
    fn send_appends_user_turn_and_enters_awaiting() {
        let mut state = seeded();
        let outbound = state.send("What is Haki?").expect("send accepted");

        assert_eq!(state.messages().len(), 2);
        let user_turn = state.messages().back().expect("user turn");
        assert_eq!(user_turn.role, Role::User);
        assert_eq!(user_turn.text, "What is Haki?");
        assert!(state.is_pending());

        // History covers every turn strictly before the new user message.
        assert_eq!(outbound.prompt, "What is Haki?");
        assert_eq!(outbound.history.len(), 1);
        assert_eq!(outbound.history[0].role, Role::Assistant);
        assert_eq!(outbound.history[0].text, "Konnichiwa!");
    }

    #[test]
    fn send_while_awaiting_changes_nothing() {
        let mut state = seeded();
        state.send("first").expect("send accepted");

        assert!(state.send("second").is_none());
        assert_eq!(state.messages().len(), 2);
        assert!(state.is_pending());
    }

    #[test]
    fn blank_input_is_rejected() {
        let mut state = seeded();
        assert!(state.send("").is_none());
        assert!(state.send("   \n\t").is_none());
        assert_eq!(state.messages().len(), 1);
        assert!(state.is_idle());
    }

    #[test]
    fn successful_resolve_appends_assistant_turn() {
        let mut state = seeded();
        state.send("hi").expect("send accepted");
        state.resolve(Ok("Hello".to_string()));

        assert_eq!(state.messages().len(), 3);
        let reply = state.messages().back().expect("assistant turn");
        assert_eq!(reply.role, Role::Assistant);
        assert_eq!(reply.text, "Hello");
        assert!(state.is_idle());
        assert!(state.last_error().is_none());
    }

    #[test]
    fn send_clears_previous_error_and_success_leaves_it_cleared() {
        let mut state = seeded();
        state.send("first").expect("send accepted");
        state.resolve(Err(AssistantError::Transient("boom".into())));
        assert!(state.last_error().is_some());

        state.send("second").expect("send accepted");
        assert!(state.last_error().is_none());

        state.resolve(Ok("Hello".to_string()));
        assert!(state.last_error().is_none());
    }

    #[test]
    fn blank_reply_becomes_fallback_notice() {
        for reply in ["", "   ", "\n\n"] {
            let mut state = seeded();
            state.send("hi").expect("send accepted");
            state.resolve(Ok(reply.to_string()));

            let fallback = state.messages().back().expect("assistant turn");
            assert_eq!(fallback.role, Role::Assistant);
            assert!(!fallback.text.trim().is_empty());
            assert_eq!(fallback.text, EMPTY_RESPONSE_NOTICE);
            assert!(state.is_idle());
        }
    }

    #[test]
    fn failure_keeps_user_turn_and_sets_error() {
        let mut state = seeded();
        state.send("ping").expect("send accepted");
        let len_after_send = state.messages().len();

        state.resolve(Err(AssistantError::Authentication("401".into())));

        assert_eq!(state.messages().len(), len_after_send);
        assert_eq!(state.messages().back().expect("user turn").role, Role::User);
        let error = state.last_error().expect("error recorded");
        assert_eq!(error.kind, ErrorKind::Authentication);
        assert!(!error.message.is_empty());
        assert!(state.is_idle());
    }

    #[test]
    fn rate_limit_copy_differs_from_authentication_copy() {
        let mut state = seeded();
        state.send("ping").expect("send accepted");
        state.resolve(Err(AssistantError::RateLimit("429".into())));
        let rate_limited = state.last_error().expect("error recorded").message.clone();

        let mut other = seeded();
        other.send("ping").expect("send accepted");
        other.resolve(Err(AssistantError::Authentication("401".into())));
        let unauthorized = other.last_error().expect("error recorded").message.clone();

        assert_ne!(rate_limited, unauthorized);
    }

    #[test]
    fn resolve_while_idle_is_ignored() {
        let mut state = seeded();
        state.resolve(Ok("stray".to_string()));
        assert_eq!(state.messages().len(), 1);
        assert!(state.last_error().is_none());
    }

    #[test]
    fn message_ids_are_creation_ordered() {
        let mut state = seeded();
        state.send("one").expect("send accepted");
        state.resolve(Ok("two".to_string()));

        let ids: Vec<u64> = state.messages().iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}
