//! Dispatch of assistant calls onto the session's single event timeline.
//!
//! The service runs each call on a spawned task and delivers the outcome,
//! tagged with its request id, over an unbounded channel. The store drops
//! outcomes whose id does not match the current request, so a completion can
//! never race a newer send even if a UI misbehaves.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::core::assistant::{AssistantClient, AssistantError};
use crate::core::session::Outbound;

pub type RequestOutcome = Result<String, AssistantError>;

#[derive(Clone)]
pub struct CompletionService {
    tx: mpsc::UnboundedSender<(RequestOutcome, u64)>,
}

impl CompletionService {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<(RequestOutcome, u64)>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Run one assistant call in the background. The receiver half gets the
    /// outcome; a dropped receiver just discards it.
    pub fn spawn_request(
        &self,
        client: Arc<dyn AssistantClient>,
        outbound: Outbound,
        request_id: u64,
    ) {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            tracing::debug!(request_id, "dispatching assistant request");
            let outcome = client.complete(&outbound.prompt, &outbound.history).await;
            let _ = tx.send((outcome, request_id));
        });
    }

    #[cfg(test)]
    pub fn send_for_test(&self, outcome: RequestOutcome, request_id: u64) {
        let _ = self.tx.send((outcome, request_id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use crate::core::assistant::Turn;

    struct EchoClient;

    #[async_trait]
    impl AssistantClient for EchoClient {
        async fn complete(&self, prompt: &str, _history: &[Turn]) -> RequestOutcome {
            Ok(format!("echo: {prompt}"))
        }
    }

    #[tokio::test]
    async fn outcome_arrives_tagged_with_its_request_id() {
        let (service, mut rx) = CompletionService::new();
        let outbound = Outbound {
            prompt: "hi".to_string(),
            history: Vec::new(),
        };

        service.spawn_request(Arc::new(EchoClient), outbound, 7);

        let (outcome, request_id) = rx.recv().await.expect("outcome delivered");
        assert_eq!(request_id, 7);
        assert_eq!(outcome, Ok("echo: hi".to_string()));
    }
}
