pub mod classifier;
pub mod dispatch;
pub mod foundry;
pub mod routes;
pub mod service;
pub mod types;

pub use classifier::{Classification, ToolClassifier, ToolLabel};
pub use dispatch::{AgentDispatcher, DispatchError};
pub use foundry::FoundryAgentClient;
pub use routes::AgentRoutes;
pub use service::{AgentService, AgentServiceError};
pub use types::*;
