//! chat-demo — sends one fixed multi-turn conversation to the configured
//! chat-completion deployment and prints the reply.

use clap::Parser;
use tracing::info;

use relay_llm::{create_provider, CompletionParams, Message, Role};

// ── CLI ─────────────────────────────────────────────────────────────

/// Single-shot chat completion demo.
#[derive(Parser, Debug)]
#[command(name = "chat-demo", version, about)]
struct Cli {
    /// Maximum completion tokens.
    #[arg(long, env = "CHAT_DEMO_MAX_TOKENS", default_value_t = 800)]
    max_tokens: u32,

    /// Sampling temperature.
    #[arg(long, env = "CHAT_DEMO_TEMPERATURE", default_value_t = 1.0)]
    temperature: f32,
}

// ── Conversation ────────────────────────────────────────────────────

const PARIS_ANSWER: &str = "Paris, the capital of France, is known for its stunning architecture, art museums, historical landmarks, and romantic atmosphere. Here are some of the top attractions to see in Paris:\n \n 1. The Eiffel Tower: The iconic Eiffel Tower is one of the most recognizable landmarks in the world and offers breathtaking views of the city.\n 2. The Louvre Museum: The Louvre is one of the world's largest and most famous museums, housing an impressive collection of art and artifacts, including the Mona Lisa.\n 3. Notre-Dame Cathedral: This beautiful cathedral is one of the most famous landmarks in Paris and is known for its Gothic architecture and stunning stained glass windows.\n \n These are just a few of the many attractions that Paris has to offer. With so much to see and do, it's no wonder that Paris is one of the most popular tourist destinations in the world.";

fn conversation() -> Vec<Message> {
    vec![
        Message { role: Role::System, content: "You are a helpful assistant.".into() },
        Message { role: Role::User, content: "I am going to Paris, what should I see?".into() },
        Message { role: Role::Assistant, content: PARIS_ANSWER.into() },
        Message { role: Role::User, content: "What is so great about #1?".into() },
    ]
}

// ── main ────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    relay_core::config::load_dotenv();
    let config = relay_core::Config::from_env();

    let provider = create_provider(&config.llm)?;
    let params = CompletionParams {
        temperature: Some(cli.temperature),
        max_tokens: Some(cli.max_tokens),
        top_p: Some(1.0),
        frequency_penalty: Some(0.0),
        presence_penalty: Some(0.0),
    };

    info!(provider = %config.llm.provider, "sending demo conversation");
    let reply = provider.complete(conversation(), &params).await?;
    println!("{}", reply);

    Ok(())
}
