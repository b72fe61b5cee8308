//! The collaborator boundary: an opaque request/response call to a hosted
//! generative-AI service.
//!
//! The session core only ever sees this trait and its typed error kinds;
//! the vendor, protocol, and model behind it are invisible to the state
//! machine.

use std::error::Error as StdError;
use std::fmt;

use async_trait::async_trait;

use crate::core::message::Role;

/// One prior turn handed to the assistant, already reduced to what the
/// collaborator needs.
#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

/// Coarse failure classification produced at the collaborator boundary.
///
/// Kinds are assigned where the failure is observed (HTTP status, missing
/// credential), never inferred from free-text message contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Credential missing; the remote call was never attempted.
    Configuration,
    /// The remote call rejected our credentials.
    Authentication,
    /// The remote call was throttled.
    RateLimit,
    /// Anything else, including network failures and malformed responses.
    Transient,
}

/// A failed assistant call, carrying the kind plus a human-readable detail.
#[derive(Debug, Clone, PartialEq)]
pub enum AssistantError {
    Configuration(String),
    Authentication(String),
    RateLimit(String),
    Transient(String),
}

impl AssistantError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AssistantError::Configuration(_) => ErrorKind::Configuration,
            AssistantError::Authentication(_) => ErrorKind::Authentication,
            AssistantError::RateLimit(_) => ErrorKind::RateLimit,
            AssistantError::Transient(_) => ErrorKind::Transient,
        }
    }

    pub fn detail(&self) -> &str {
        match self {
            AssistantError::Configuration(detail)
            | AssistantError::Authentication(detail)
            | AssistantError::RateLimit(detail)
            | AssistantError::Transient(detail) => detail,
        }
    }
}

impl fmt::Display for AssistantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssistantError::Configuration(detail) => {
                write!(f, "configuration error: {detail}")
            }
            AssistantError::Authentication(detail) => {
                write!(f, "authentication rejected: {detail}")
            }
            AssistantError::RateLimit(detail) => write!(f, "rate limited: {detail}"),
            AssistantError::Transient(detail) => write!(f, "request failed: {detail}"),
        }
    }
}

impl StdError for AssistantError {}

/// Contract consumed by the session store.
///
/// Implementations are stateless per call, do not retain `history` beyond the
/// call, and return a single complete response (no streaming). The store makes
/// at most one logical call per send.
#[async_trait]
pub trait AssistantClient: Send + Sync {
    /// Request a reply to `prompt`, given every turn strictly before it.
    ///
    /// An empty response string is a legal success; the session decides how to
    /// present it.
    async fn complete(&self, prompt: &str, history: &[Turn]) -> Result<String, AssistantError>;
}
