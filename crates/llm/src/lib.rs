pub mod provider;
pub mod providers;

pub use provider::{CompletionParams, LlmError, LlmProvider, Message, Role};
pub use providers::create_provider;
