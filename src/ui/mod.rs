//! Terminal UI layer for the chat session.
//!
//! [`chat_loop`] owns the interaction loop and dispatches input to the
//! session store; [`renderer`] composes frames from store snapshots.
//! Ownership boundary: this layer presents and captures interaction state,
//! while [`crate::core`] owns the session and backend coordination.

pub mod chat_loop;
pub mod renderer;
