//! agent-send — posts one message to an existing agent/thread pair, runs the
//! agent and prints every text message on the thread as a JSON line.

use clap::Parser;
use tracing::info;

use relay_agent::service::send_and_collect;
use relay_agent::{AgentService, FoundryAgentClient};

// ── CLI ─────────────────────────────────────────────────────────────

/// Send a message to an existing agent thread.
#[derive(Parser, Debug)]
#[command(name = "agent-send", version, about)]
struct Cli {
    /// Agent (assistant) id.
    #[arg(long, env = "AGENT_ID")]
    agent_id: String,

    /// Existing thread id.
    #[arg(long, env = "THREAD_ID")]
    thread_id: String,

    /// Message text.
    #[arg(long, default_value = "Hi PowerApps_Agent")]
    message: String,
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

    relay_core::config::load_dotenv();
    let cli = Cli::parse();

    let config = relay_core::Config::from_env();
    let client = FoundryAgentClient::from_config(&config.agents);

    let agent = client.get_agent(&cli.agent_id).await?;
    let thread = client.get_thread(&cli.thread_id).await?;
    info!(agent_id = %agent.id, thread_id = %thread.id, "sending message");

    let messages = send_and_collect(&client, &agent.id, &thread.id, &cli.message).await?;
    for message in &messages {
        println!("{}", serde_json::to_string(message)?);
    }

    Ok(())
}
