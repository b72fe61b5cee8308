//! Reqwest-backed assistant client for OpenAI-compatible chat APIs.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::api::{ChatCompletion, ChatMessage, ChatRequest};
use crate::core::assistant::{AssistantClient, AssistantError, Turn};

pub struct RemoteAssistant {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    system_prompt: String,
}

impl RemoteAssistant {
    pub fn new(
        base_url: String,
        api_key: String,
        model: String,
        system_prompt: String,
        request_timeout: Option<Duration>,
    ) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url,
            api_key,
            model,
            system_prompt,
        })
    }
}

#[async_trait]
impl AssistantClient for RemoteAssistant {
    async fn complete(&self, prompt: &str, history: &[Turn]) -> Result<String, AssistantError> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: build_api_messages(&self.system_prompt, history, prompt),
            stream: false,
        };

        tracing::debug!(model = %self.model, turns = request.messages.len(), "sending chat request");

        let response = self
            .client
            .post(endpoint_url(&self.base_url, "chat/completions"))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|err| AssistantError::Transient(describe_transport_error(&err)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<no body>".to_string());
            return Err(classify_status(status, &body));
        }

        let completion: ChatCompletion = response
            .json()
            .await
            .map_err(|err| AssistantError::Transient(format!("invalid response body: {err}")))?;

        Ok(completion.into_text())
    }
}

/// Assemble the request messages: persona instruction first (when present),
/// then the prior turns in chat order, then the prompt itself.
fn build_api_messages(system_prompt: &str, history: &[Turn], prompt: &str) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(history.len() + 2);

    if !system_prompt.trim().is_empty() {
        messages.push(ChatMessage {
            role: "system".to_string(),
            content: system_prompt.to_string(),
        });
    }

    for turn in history {
        messages.push(ChatMessage {
            role: turn.role.api_role().to_string(),
            content: turn.text.clone(),
        });
    }

    messages.push(ChatMessage {
        role: "user".to_string(),
        content: prompt.to_string(),
    });

    messages
}

fn endpoint_url(base_url: &str, endpoint: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        endpoint.trim_start_matches('/')
    )
}

fn describe_transport_error(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        "request timed out".to_string()
    } else if err.is_connect() {
        format!("connection failed: {err}")
    } else {
        err.to_string()
    }
}

/// Map an HTTP failure onto a typed error kind. The detail string carries the
/// server's own summary when the body exposes one.
fn classify_status(status: StatusCode, body: &str) -> AssistantError {
    let detail =
        extract_error_summary(body).unwrap_or_else(|| format!("HTTP {}", status.as_u16()));

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AssistantError::Authentication(detail),
        StatusCode::TOO_MANY_REQUESTS => AssistantError::RateLimit(detail),
        _ => AssistantError::Transient(detail),
    }
}

/// Pull a human-readable summary out of a JSON error body.
///
/// Servers disagree on shape: `{"error":{"message":...}}`, `{"error":"..."}`,
/// and bare `{"message":...}` are all in the wild.
fn extract_error_summary(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body.trim()).ok()?;

    let summary = value
        .pointer("/error/message")
        .and_then(|v| v.as_str())
        .map(str::to_owned)
        .or_else(|| {
            value.get("error").and_then(|v| match v {
                serde_json::Value::String(s) => Some(s.to_string()),
                _ => None,
            })
        })
        .or_else(|| {
            value
                .get("message")
                .and_then(|v| v.as_str().map(str::to_owned))
        })?;

    let collapsed = summary.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::Role;

    #[test]
    fn api_messages_carry_system_prompt_history_then_prompt() {
        let history = vec![
            Turn {
                role: Role::Assistant,
                text: "Konnichiwa!".to_string(),
            },
            Turn {
                role: Role::User,
                text: "yo".to_string(),
            },
        ];

        let messages = build_api_messages("Be the spirit.", &history, "What is Haki?");
        let roles: Vec<&str> = messages.iter().map(|m| m.role.as_str()).collect();
        assert_eq!(roles, vec!["system", "assistant", "user", "user"]);
        assert_eq!(messages[0].content, "Be the spirit.");
        assert_eq!(messages.last().expect("prompt").content, "What is Haki?");
    }

    #[test]
    fn blank_system_prompt_is_omitted() {
        let messages = build_api_messages("   ", &[], "hi");
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, "user");
    }

    #[test]
    fn status_mapping_covers_the_taxonomy() {
        assert!(matches!(
            classify_status(StatusCode::UNAUTHORIZED, "{}"),
            AssistantError::Authentication(_)
        ));
        assert!(matches!(
            classify_status(StatusCode::FORBIDDEN, "{}"),
            AssistantError::Authentication(_)
        ));
        assert!(matches!(
            classify_status(StatusCode::TOO_MANY_REQUESTS, "{}"),
            AssistantError::RateLimit(_)
        ));
        assert!(matches!(
            classify_status(StatusCode::INTERNAL_SERVER_ERROR, "{}"),
            AssistantError::Transient(_)
        ));
    }

    #[test]
    fn classify_status_prefers_server_summary() {
        let err = classify_status(
            StatusCode::TOO_MANY_REQUESTS,
            r#"{"error":{"message":"slow down"}}"#,
        );
        assert_eq!(err, AssistantError::RateLimit("slow down".to_string()));

        let bare = classify_status(StatusCode::BAD_GATEWAY, "<html>oops</html>");
        assert_eq!(bare, AssistantError::Transient("HTTP 502".to_string()));
    }

    #[test]
    fn error_summary_handles_common_shapes() {
        assert_eq!(
            extract_error_summary(r#"{"error":{"message":"model overloaded"}}"#),
            Some("model overloaded".to_string())
        );
        assert_eq!(
            extract_error_summary(r#"{"error":"quota exceeded"}"#),
            Some("quota exceeded".to_string())
        );
        assert_eq!(
            extract_error_summary(r#"{"message":"  spaced   out  "}"#),
            Some("spaced out".to_string())
        );
        assert_eq!(extract_error_summary("not json"), None);
        assert_eq!(extract_error_summary(r#"{"status":"failed"}"#), None);
    }

    #[test]
    fn endpoint_url_normalizes_slashes() {
        assert_eq!(
            endpoint_url("https://api.example.com/v1/", "chat/completions"),
            "https://api.example.com/v1/chat/completions"
        );
        assert_eq!(
            endpoint_url("https://api.example.com/v1", "/chat/completions"),
            "https://api.example.com/v1/chat/completions"
        );
    }
}
