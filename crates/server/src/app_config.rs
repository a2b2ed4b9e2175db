//! Application configuration builders.
//!
//! Constructs the classifier, route table, and agent-service client from `Config`.

use std::sync::Arc;

use tracing::info;

use relay_agent::{AgentDispatcher, AgentRoutes, AgentService, FoundryAgentClient, ToolClassifier};

/// Load configuration from `.env` and environment variables.
pub fn load_config() -> relay_core::Config {
    relay_core::config::load_dotenv();
    relay_core::Config::from_env()
}

/// Build the question classifier on top of the configured LLM provider.
pub fn build_classifier(config: &relay_core::Config) -> anyhow::Result<ToolClassifier> {
    let provider = relay_llm::create_provider(&config.llm)?;
    info!(
        "LLM classifier ready (provider: {}, deployment: {})",
        config.llm.provider, config.llm.azure_deployment
    );
    Ok(ToolClassifier::new(provider).with_params(relay_llm::providers::default_params(&config.llm)))
}

/// Build the dispatcher: classifier, route table, and agent-service client.
pub fn build_dispatcher(config: &relay_core::Config) -> anyhow::Result<AgentDispatcher> {
    let classifier = build_classifier(config)?;
    let routes = AgentRoutes::from_config(&config.routes);
    for (label, agent_id) in routes.entries() {
        match agent_id {
            Some(id) => info!("Route {} -> {}", label, id),
            None => tracing::warn!("Route {} has no agent id — questions for it will be rejected", label),
        }
    }

    let service: Arc<dyn AgentService> = Arc::new(FoundryAgentClient::from_config(&config.agents));
    Ok(AgentDispatcher::new(classifier, routes, service))
}
