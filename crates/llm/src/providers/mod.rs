pub mod azure;
pub mod openai;

use relay_core::config::LlmConfig;

use crate::provider::{CompletionParams, LlmError, LlmProvider};

/// Create the appropriate LLM provider based on config.
///
/// Credentials are not checked here: an unconfigured Azure provider is still
/// returned and fails on its first request.
pub fn create_provider(llm_config: &LlmConfig) -> Result<Box<dyn LlmProvider>, LlmError> {
    match llm_config.provider.as_str() {
        "azure" | "azure_openai" => Ok(Box::new(azure::AzureOpenAiProvider::new(
            llm_config.azure_endpoint.clone(),
            llm_config.azure_api_key.clone(),
            llm_config.azure_api_version.clone(),
            llm_config.azure_deployment.clone(),
        ))),
        "openai" => {
            let api_key = llm_config
                .openai_api_key
                .as_ref()
                .ok_or_else(|| LlmError::NotConfigured("OPENAI_API_KEY not set".into()))?;
            Ok(Box::new(openai::OpenAiProvider::new(
                api_key.clone(),
                llm_config.openai_model.clone(),
                llm_config.openai_base_url.clone(),
            )))
        }
        other => Err(LlmError::NotConfigured(format!(
            "unknown LLM provider: '{}'",
            other
        ))),
    }
}

/// Sampling parameters configured for the service (temperature, token limit).
pub fn default_params(llm_config: &LlmConfig) -> CompletionParams {
    CompletionParams {
        temperature: llm_config.temperature,
        max_tokens: llm_config.max_tokens,
        ..Default::default()
    }
}
