use std::sync::Arc;

use tracing::info;

use crate::classifier::{Classification, ToolClassifier};
use crate::routes::AgentRoutes;
use crate::service::{send_and_collect, AgentService, AgentServiceError};
use crate::types::TextMessage;

/// Routes a question to an agent and relays the agent's text replies.
pub struct AgentDispatcher {
    classifier: ToolClassifier,
    routes: AgentRoutes,
    service: Arc<dyn AgentService>,
}

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("No question provided.")]
    EmptyQuestion,
    #[error("Could not determine the correct agent from the question.")]
    NoAgent,
    #[error("{0}")]
    Service(#[from] AgentServiceError),
}

impl AgentDispatcher {
    pub fn new(classifier: ToolClassifier, routes: AgentRoutes, service: Arc<dyn AgentService>) -> Self {
        Self {
            classifier,
            routes,
            service,
        }
    }

    pub fn routes(&self) -> &AgentRoutes {
        &self.routes
    }

    pub fn classifier(&self) -> &ToolClassifier {
        &self.classifier
    }

    /// Classify the question and look up its agent.
    pub async fn determine_agent(&self, question: &str) -> (Classification, Option<String>) {
        let classification = self.classifier.classify(question).await;
        let agent_id = self
            .routes
            .resolve(classification.label())
            .map(str::to_string);
        (classification, agent_id)
    }

    /// Full flow: validate, classify, resolve, then thread/message/run/list.
    pub async fn ask(&self, question: &str) -> Result<Vec<TextMessage>, DispatchError> {
        if question.trim().is_empty() {
            return Err(DispatchError::EmptyQuestion);
        }

        let (classification, agent_id) = self.determine_agent(question).await;
        let Some(agent_id) = agent_id else {
            info!(%classification, "no agent for question");
            return Err(DispatchError::NoAgent);
        };
        info!(%classification, agent_id = %agent_id, "dispatching question");

        let agent = self.service.get_agent(&agent_id).await?;
        let thread = self.service.create_thread().await?;
        let responses = send_and_collect(self.service.as_ref(), &agent.id, &thread.id, question).await?;

        info!(agent_id = %agent.id, thread_id = %thread.id, replies = responses.len(), "agent replied");
        Ok(responses)
    }
}
