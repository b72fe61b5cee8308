//! Nakama is a terminal chat client for talking with an anime-spirited AI
//! assistant over any OpenAI-compatible API.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the session state machine, the collaborator boundary,
//!   request dispatch, configuration, and the UI-facing store.
//! - [`ui`] renders the terminal interface and runs the interactive event
//!   loop that drives user input and display updates.
//! - [`api`] defines the wire payloads used by the remote client.
//! - [`utils`] carries transcript logging.
//!
//! The runtime entrypoint lives in the binary crate (`src/main.rs`), which
//! bootstraps config and credentials and hands a [`core::store::ChatStore`]
//! to [`ui::chat_loop`].

pub mod api;
pub mod core;
pub mod ui;
pub mod utils;
