use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A chat message for the LLM.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// Sampling parameters for one completion. Unset fields are left to the
/// backend's defaults and omitted from the request body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletionParams {
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub top_p: Option<f32>,
    pub frequency_penalty: Option<f32>,
    pub presence_penalty: Option<f32>,
}

impl CompletionParams {
    /// Write the set parameters into a JSON request body.
    /// `max_tokens_key` differs between backends.
    pub(crate) fn apply(&self, body: &mut serde_json::Value, max_tokens_key: &str) {
        let Some(obj) = body.as_object_mut() else {
            return;
        };
        if let Some(t) = self.temperature {
            obj.insert("temperature".into(), t.into());
        }
        if let Some(m) = self.max_tokens {
            obj.insert(max_tokens_key.into(), m.into());
        }
        if let Some(p) = self.top_p {
            obj.insert("top_p".into(), p.into());
        }
        if let Some(f) = self.frequency_penalty {
            obj.insert("frequency_penalty".into(), f.into());
        }
        if let Some(p) = self.presence_penalty {
            obj.insert("presence_penalty".into(), p.into());
        }
    }
}

/// Trait for LLM providers — each backend implements this.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send a chat completion request and return the assistant's response text.
    async fn complete(
        &self,
        messages: Vec<Message>,
        params: &CompletionParams,
    ) -> Result<String, LlmError>;
}

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("API error: {status} — {body}")]
    ApiError { status: u16, body: String },
    #[error("failed to parse response: {0}")]
    ParseError(String),
    #[error("provider not configured: {0}")]
    NotConfigured(String),
}

/// Render messages in the chat-completions wire shape shared by both backends.
pub(crate) fn to_api_messages(messages: &[Message]) -> Vec<serde_json::Value> {
    messages
        .iter()
        .map(|m| {
            serde_json::json!({
                "role": m.role.as_str(),
                "content": m.content,
            })
        })
        .collect()
}

/// Pull `choices[0].message.content` out of a chat-completions response.
pub(crate) fn first_choice_content(resp: &serde_json::Value) -> Result<String, LlmError> {
    resp["choices"][0]["message"]["content"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| LlmError::ParseError("missing choices[0].message.content".into()))
}
