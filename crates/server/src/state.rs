use relay_agent::AgentDispatcher;

/// Shared, read-only state handed to every request handler.
pub struct AppState {
    pub config: relay_core::Config,
    pub dispatcher: AgentDispatcher,
}
