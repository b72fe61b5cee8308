use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use nakama::core::config::{resolve_env_session, Config};
use nakama::core::constants::{DEFAULT_MODEL, MISSING_KEY_NOTICE, SEED_GREETING, SYSTEM_PROMPT};
use nakama::core::remote::RemoteAssistant;
use nakama::core::store::{ChatStore, ClientHandle};
use nakama::ui::chat_loop::run_chat;
use nakama::utils::logging::LoggingState;

#[derive(Parser)]
#[command(name = "nakama")]
#[command(version)]
#[command(about = "A terminal chat interface for talking with an anime-spirited AI assistant")]
#[command(
    long_about = "Nakama is a full-screen terminal chat interface that channels the Anime \
Spirit Assistant through any OpenAI-compatible API. One question at a time: your message \
is on screen the moment you send it, and the spirit's answer (or the error that got in \
its way) follows.\n\n\
Environment Variables:\n\
  OPENAI_API_KEY    Your API key (required to reach the spirit)\n\
  OPENAI_BASE_URL   Custom API base URL (optional, defaults to https://api.openai.com/v1)\n\n\
Controls:\n\
  Type              Enter your message in the input field\n\
  Enter             Send the message\n\
  Up/Down/Mouse     Scroll through chat history\n\
  Ctrl+C            Quit"
)]
struct Args {
    /// Model to use for chat
    #[arg(short = 'm', long)]
    model: Option<String>,

    /// Enable transcript logging to the specified file
    #[arg(short = 'l', long)]
    log: Option<String>,

    /// API base URL, overriding the environment and config file
    #[arg(short = 'b', long)]
    base_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    // Diagnostics stay quiet unless asked for; stderr would otherwise fight
    // the alternate screen.
    if std::env::var_os("RUST_LOG").is_some() {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init();
    }

    let config = Config::load()?;

    let model = args
        .model
        .or_else(|| config.default_model.clone())
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());
    let greeting = config
        .greeting
        .clone()
        .unwrap_or_else(|| SEED_GREETING.to_string());
    let system_prompt = config
        .system_prompt
        .clone()
        .unwrap_or_else(|| SYSTEM_PROMPT.to_string());
    let request_timeout = config.request_timeout_secs.map(Duration::from_secs);

    let client = match resolve_env_session(&config, args.base_url.as_deref()) {
        Ok(session) => {
            tracing::debug!(base_url = %session.base_url, %model, "assistant client ready");
            ClientHandle::Ready(Arc::new(RemoteAssistant::new(
                session.base_url,
                session.api_key,
                model.clone(),
                system_prompt,
                request_timeout,
            )?))
        }
        Err(err) => {
            tracing::warn!(%err, "starting without an API credential");
            ClientHandle::Unconfigured(MISSING_KEY_NOTICE.to_string())
        }
    };

    let logging = LoggingState::new(args.log)?;
    let (store, completions) = ChatStore::new(&greeting, client, logging);

    run_chat(store, completions, format!("Anime Spirit ({model})")).await
}
