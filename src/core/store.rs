//! The UI-facing session store.
//!
//! `ChatStore` owns the [`SessionState`] exclusively; no other component
//! mutates it. The surface is deliberately small: `submit` runs the send
//! transition and dispatches the assistant call, `resolve` applies a
//! completion, `subscribe`/`snapshot` expose state for rendering.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::core::assistant::{AssistantClient, AssistantError};
use crate::core::chat_request::{CompletionService, RequestOutcome};
use crate::core::message::{Message, Role};
use crate::core::session::{SessionError, SessionState};
use crate::utils::logging::LoggingState;

/// Either a live collaborator or the reason we refuse to dispatch.
///
/// With a missing credential the store still accepts the user's turn and
/// immediately resolves it as a configuration failure; the remote call is
/// never attempted.
pub enum ClientHandle {
    Ready(Arc<dyn AssistantClient>),
    Unconfigured(String),
}

/// Immutable view of the session, cloned out for rendering. Repeated reads
/// without an intervening transition are identical.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreSnapshot {
    pub messages: Vec<Message>,
    pub pending: bool,
    pub last_error: Option<SessionError>,
}

type Listener = Box<dyn FnMut(&StoreSnapshot) + Send>;

/// Handle returned by [`ChatStore::subscribe`]; pass it back to
/// [`ChatStore::unsubscribe`] to stop receiving snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subscription(u64);

pub struct ChatStore {
    state: SessionState,
    client: ClientHandle,
    service: CompletionService,
    listeners: Vec<(u64, Listener)>,
    next_listener_id: u64,
    request_seq: u64,
    logging: LoggingState,
}

impl ChatStore {
    pub fn new(
        greeting: &str,
        client: ClientHandle,
        logging: LoggingState,
    ) -> (Self, mpsc::UnboundedReceiver<(RequestOutcome, u64)>) {
        let (service, rx) = CompletionService::new();
        let store = Self {
            state: SessionState::new(greeting),
            client,
            service,
            listeners: Vec::new(),
            next_listener_id: 0,
            request_seq: 0,
            logging,
        };
        (store, rx)
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            messages: self.state.messages().iter().cloned().collect(),
            pending: self.state.is_pending(),
            last_error: self.state.last_error().cloned(),
        }
    }

    /// Submit user text. Returns `false` when the session refused it (blank
    /// input or a request already outstanding) so the UI can keep the draft.
    ///
    /// The user's turn is appended and published to listeners before the
    /// request is dispatched.
    pub fn submit(&mut self, text: &str) -> bool {
        let Some(outbound) = self.state.send(text) else {
            return false;
        };

        if let Err(err) = self.logging.log_message(&format!("You: {}", outbound.prompt)) {
            tracing::warn!("failed to log message: {err}");
        }
        self.notify();

        match &self.client {
            ClientHandle::Unconfigured(notice) => {
                tracing::warn!("refusing to dispatch: no API credential configured");
                let notice = notice.clone();
                self.state
                    .resolve(Err(AssistantError::Configuration(notice)));
                self.notify();
            }
            ClientHandle::Ready(client) => {
                self.request_seq += 1;
                self.service
                    .spawn_request(Arc::clone(client), outbound, self.request_seq);
            }
        }

        true
    }

    /// Apply a completed assistant call. Outcomes from superseded requests
    /// are dropped; the `Idle`/`Awaiting` guard inside the session handles
    /// the rest.
    pub fn resolve(&mut self, outcome: RequestOutcome, request_id: u64) {
        if request_id != self.request_seq {
            tracing::debug!(request_id, current = self.request_seq, "dropping stale completion");
            return;
        }

        let succeeded = outcome.is_ok();
        self.state.resolve(outcome);

        if succeeded {
            if let Some(reply) = self.state.messages().back() {
                if reply.role == Role::Assistant {
                    if let Err(err) = self.logging.log_message(&reply.text) {
                        tracing::warn!("failed to log response: {err}");
                    }
                }
            }
        }

        self.notify();
    }

    /// Register a listener invoked with a fresh snapshot after every
    /// transition.
    pub fn subscribe(&mut self, listener: impl FnMut(&StoreSnapshot) + Send + 'static) -> Subscription {
        let id = self.next_listener_id;
        self.next_listener_id += 1;
        self.listeners.push((id, Box::new(listener)));
        Subscription(id)
    }

    pub fn unsubscribe(&mut self, subscription: Subscription) {
        self.listeners.retain(|(id, _)| *id != subscription.0);
    }

    fn notify(&mut self) {
        let snapshot = self.snapshot();
        for (_, listener) in &mut self.listeners {
            listener(&snapshot);
        }
    }
}
