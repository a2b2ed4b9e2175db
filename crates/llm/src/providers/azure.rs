use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use crate::provider::{first_choice_content, to_api_messages, CompletionParams, LlmError, LlmProvider, Message};

/// Azure OpenAI chat completions against a named deployment.
///
/// Endpoint and key may be absent at construction; a missing value is
/// reported by the first `complete` call.
pub struct AzureOpenAiProvider {
    client: reqwest::Client,
    endpoint: Option<String>,
    api_key: Option<String>,
    api_version: String,
    deployment: String,
}

impl AzureOpenAiProvider {
    pub fn new(
        endpoint: Option<String>,
        api_key: Option<String>,
        api_version: String,
        deployment: String,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.map(|e| e.trim_end_matches('/').to_string()),
            api_key,
            api_version,
            deployment,
        }
    }

    fn completions_url(&self, endpoint: &str) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            endpoint, self.deployment, self.api_version
        )
    }
}

#[async_trait]
impl LlmProvider for AzureOpenAiProvider {
    async fn complete(
        &self,
        messages: Vec<Message>,
        params: &CompletionParams,
    ) -> Result<String, LlmError> {
        let endpoint = self
            .endpoint
            .as_deref()
            .ok_or_else(|| LlmError::NotConfigured("AZURE_ENDPOINT not set".into()))?;
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| LlmError::NotConfigured("AZURE_OPENAI_API_KEY not set".into()))?;

        let url = self.completions_url(endpoint);

        let mut body = json!({
            "model": self.deployment,
            "messages": to_api_messages(&messages),
        });
        params.apply(&mut body, "max_completion_tokens");

        debug!(deployment = %self.deployment, "Azure OpenAI request to {}", url);

        let response = self
            .client
            .post(&url)
            .header("api-key", api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status().as_u16();
        if status != 200 {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::ApiError { status, body });
        }

        let resp: serde_json::Value = response.json().await?;
        first_choice_content(&resp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::Role;
    use mockito::{Matcher, Server};

    fn user(content: &str) -> Vec<Message> {
        vec![Message { role: Role::User, content: content.into() }]
    }

    #[tokio::test]
    async fn posts_to_deployment_with_api_key() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/openai/deployments/gpt-4.1/chat/completions")
            .match_query(Matcher::UrlEncoded("api-version".into(), "2024-12-01-preview".into()))
            .match_header("api-key", "secret")
            .match_body(Matcher::PartialJson(json!({
                "messages": [{ "role": "user", "content": "Visualize monthly sales" }],
                "max_completion_tokens": 800,
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[{"message":{"role":"assistant","content":" PowerBI \n"}}]}"#)
            .create_async()
            .await;

        let provider = AzureOpenAiProvider::new(
            Some(format!("{}/", server.url())),
            Some("secret".into()),
            "2024-12-01-preview".into(),
            "gpt-4.1".into(),
        );
        let params = CompletionParams { max_tokens: Some(800), ..Default::default() };
        let out = provider.complete(user("Visualize monthly sales"), &params).await.unwrap();

        assert_eq!(out, " PowerBI \n");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn non_200_is_api_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", Matcher::Any)
            .with_status(429)
            .with_body("rate limited")
            .create_async()
            .await;

        let provider = AzureOpenAiProvider::new(
            Some(server.url()),
            Some("secret".into()),
            "v".into(),
            "d".into(),
        );
        let err = provider.complete(user("x"), &CompletionParams::default()).await.unwrap_err();

        match err {
            LlmError::ApiError { status, body } => {
                assert_eq!(status, 429);
                assert_eq!(body, "rate limited");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn missing_key_fails_at_call_time() {
        let provider = AzureOpenAiProvider::new(
            Some("https://example.openai.azure.com".into()),
            None,
            "v".into(),
            "d".into(),
        );
        let err = provider.complete(user("x"), &CompletionParams::default()).await.unwrap_err();
        assert!(matches!(err, LlmError::NotConfigured(_)));
    }
}
