use async_trait::async_trait;
use tracing::{info, warn};

use crate::types::{Agent, AgentThread, MessageRole, RunStatus, TextMessage, ThreadMessage, ThreadRun, text_messages};

/// Operations against the hosted agent-conversation service.
#[async_trait]
pub trait AgentService: Send + Sync {
    async fn get_agent(&self, agent_id: &str) -> Result<Agent, AgentServiceError>;

    async fn get_thread(&self, thread_id: &str) -> Result<AgentThread, AgentServiceError>;

    async fn create_thread(&self) -> Result<AgentThread, AgentServiceError>;

    async fn create_message(
        &self,
        thread_id: &str,
        role: MessageRole,
        content: &str,
    ) -> Result<ThreadMessage, AgentServiceError>;

    /// Start a run of `agent_id` on the thread and wait until it stops.
    async fn create_and_process_run(
        &self,
        thread_id: &str,
        agent_id: &str,
    ) -> Result<ThreadRun, AgentServiceError>;

    async fn list_messages(&self, thread_id: &str) -> Result<Vec<ThreadMessage>, AgentServiceError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AgentServiceError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("agent service error: {status} — {body}")]
    Api { status: u16, body: String },
    #[error("failed to parse agent service response: {0}")]
    Parse(String),
    #[error("agent service not configured: {0}")]
    NotConfigured(String),
    #[error("run {run_id} did not finish within {waited_ms}ms")]
    RunTimeout { run_id: String, waited_ms: u64 },
}

/// Post `content` as a user message, run the agent and collect the thread's
/// text messages.
pub async fn send_and_collect(
    service: &dyn AgentService,
    agent_id: &str,
    thread_id: &str,
    content: &str,
) -> Result<Vec<TextMessage>, AgentServiceError> {
    let message = service
        .create_message(thread_id, MessageRole::User, content)
        .await?;
    info!(thread_id, message_id = %message.id, "user message posted");

    let run = service.create_and_process_run(thread_id, agent_id).await?;
    if run.status != RunStatus::Completed {
        warn!(
            thread_id,
            run_id = %run.id,
            status = ?run.status,
            error = run.last_error.as_ref().and_then(|e| e.message.as_deref()).unwrap_or(""),
            "run finished without completing"
        );
    }

    let messages = service.list_messages(thread_id).await?;
    Ok(text_messages(&messages))
}
