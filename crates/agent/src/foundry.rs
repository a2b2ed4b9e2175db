//! REST client for the agents API of an Azure AI Foundry project.
//!
//! Every request carries `api-version` and a bearer token. Missing
//! configuration is reported by the first request, not at construction.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, info, warn};

use relay_core::config::AgentServiceConfig;

use crate::service::{AgentService, AgentServiceError};
use crate::types::{Agent, AgentThread, MessagePage, MessageRole, RunStatus, ThreadMessage, ThreadRun};

const DEFAULT_API_VERSION: &str = "2024-12-01-preview";

pub struct FoundryAgentClient {
    client: reqwest::Client,
    /// Project base URL, or why it could not be derived from config.
    base_url: Result<String, String>,
    access_token: Option<String>,
    api_version: String,
    poll_interval: Duration,
    run_timeout: Option<Duration>,
    message_order: String,
}

impl FoundryAgentClient {
    pub fn new(base_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: Ok(base_url.into().trim_end_matches('/').to_string()),
            access_token: Some(access_token.into()),
            api_version: DEFAULT_API_VERSION.to_string(),
            poll_interval: Duration::from_secs(1),
            run_timeout: None,
            message_order: "desc".to_string(),
        }
    }

    pub fn from_config(config: &AgentServiceConfig) -> Self {
        let base_url = config
            .project_connection()
            .map(|c| c.agents_base_url())
            .map_err(|e| e.to_string());
        if let Err(ref reason) = base_url {
            warn!("Agent service unavailable until configured: {}", reason);
        }
        Self {
            client: reqwest::Client::new(),
            base_url,
            access_token: config.access_token.clone(),
            api_version: config.api_version.clone(),
            poll_interval: config.poll_interval(),
            run_timeout: config.run_timeout(),
            message_order: config.message_order.clone(),
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_run_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.run_timeout = timeout;
        self
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<serde_json::Value>,
    ) -> Result<T, AgentServiceError> {
        let base_url = self
            .base_url
            .as_deref()
            .map_err(|reason| AgentServiceError::NotConfigured(reason.clone()))?;
        let token = self.access_token.as_deref().ok_or_else(|| {
            AgentServiceError::NotConfigured("AZURE_AGENTS_ACCESS_TOKEN is not set".into())
        })?;

        let url = format!("{}{}", base_url, path);
        debug!(%method, "agent service request to {}", url);

        let mut request = self
            .client
            .request(method, &url)
            .bearer_auth(token)
            .query(&[("api-version", self.api_version.as_str())])
            .query(query);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AgentServiceError::Api { status: status.as_u16(), body });
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| AgentServiceError::Parse(e.to_string()))
    }

    async fn get_run(&self, thread_id: &str, run_id: &str) -> Result<ThreadRun, AgentServiceError> {
        self.send(Method::GET, &format!("/threads/{}/runs/{}", thread_id, run_id), &[], None)
            .await
    }

    /// Poll until the run leaves `queued`/`in_progress`. Unbounded; callers
    /// apply the run timeout around it.
    async fn wait_for_run(
        &self,
        thread_id: &str,
        mut run: ThreadRun,
    ) -> Result<ThreadRun, AgentServiceError> {
        while run.status.is_pending() {
            tokio::time::sleep(self.poll_interval).await;
            run = self.get_run(thread_id, &run.id).await?;
            debug!(run_id = %run.id, status = ?run.status, "polled run");
        }
        Ok(run)
    }

    async fn cancel_run(&self, thread_id: &str, run_id: &str) -> Result<ThreadRun, AgentServiceError> {
        self.send(
            Method::POST,
            &format!("/threads/{}/runs/{}/cancel", thread_id, run_id),
            &[],
            None,
        )
        .await
    }
}

#[async_trait]
impl AgentService for FoundryAgentClient {
    async fn get_agent(&self, agent_id: &str) -> Result<Agent, AgentServiceError> {
        self.send(Method::GET, &format!("/assistants/{}", agent_id), &[], None)
            .await
    }

    async fn get_thread(&self, thread_id: &str) -> Result<AgentThread, AgentServiceError> {
        self.send(Method::GET, &format!("/threads/{}", thread_id), &[], None)
            .await
    }

    async fn create_thread(&self) -> Result<AgentThread, AgentServiceError> {
        let thread: AgentThread = self.send(Method::POST, "/threads", &[], Some(json!({}))).await?;
        info!(thread_id = %thread.id, "thread created");
        Ok(thread)
    }

    async fn create_message(
        &self,
        thread_id: &str,
        role: MessageRole,
        content: &str,
    ) -> Result<ThreadMessage, AgentServiceError> {
        self.send(
            Method::POST,
            &format!("/threads/{}/messages", thread_id),
            &[],
            Some(json!({ "role": role.as_str(), "content": content })),
        )
        .await
    }

    async fn create_and_process_run(
        &self,
        thread_id: &str,
        agent_id: &str,
    ) -> Result<ThreadRun, AgentServiceError> {
        let run: ThreadRun = self
            .send(
                Method::POST,
                &format!("/threads/{}/runs", thread_id),
                &[],
                Some(json!({ "assistant_id": agent_id })),
            )
            .await?;
        info!(thread_id, agent_id, run_id = %run.id, "run created");

        let started = Instant::now();
        let run_id = run.id.clone();
        let mut run = match self.run_timeout {
            Some(limit) => tokio::time::timeout(limit, self.wait_for_run(thread_id, run))
                .await
                .map_err(|_| AgentServiceError::RunTimeout {
                    run_id,
                    waited_ms: started.elapsed().as_millis() as u64,
                })??,
            None => self.wait_for_run(thread_id, run).await?,
        };

        // No tools are registered with this client, so a tool-call request
        // can never be satisfied.
        if run.status == RunStatus::RequiresAction {
            warn!(run_id = %run.id, "run requires tool output; cancelling");
            run = self.cancel_run(thread_id, &run.id).await?;
        }

        let elapsed_ms = started.elapsed().as_millis() as u64;
        info!(run_id = %run.id, status = ?run.status, elapsed_ms, "run finished");
        Ok(run)
    }

    async fn list_messages(&self, thread_id: &str) -> Result<Vec<ThreadMessage>, AgentServiceError> {
        let path = format!("/threads/{}/messages", thread_id);
        let mut messages = Vec::new();
        let mut after: Option<String> = None;

        loop {
            let page: MessagePage = {
                let mut query = vec![("order", self.message_order.as_str())];
                if let Some(cursor) = after.as_deref() {
                    query.push(("after", cursor));
                }
                self.send(Method::GET, &path, &query, None).await?
            };
            messages.extend(page.data);
            match (page.has_more, page.last_id) {
                (true, Some(last_id)) => after = Some(last_id),
                _ => break,
            }
        }

        Ok(messages)
    }
}
