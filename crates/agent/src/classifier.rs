use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use relay_llm::{CompletionParams, LlmProvider, Message, Role};

/// Instruction prompt for routing a question to one of the two agents.
pub const CLASSIFIER_PROMPT: &str = "You are an intelligent tool classifier. Based on the user's question, classify whether it relates to Power BI or Power Apps.\n\
Return ONLY one word: 'powerbi' or 'powerapps'.\n\n\
Examples:\n\
- 'Create a canvas app' → powerapps\n\
- 'Schedule a report refresh' → powerbi\n\
- 'Form to log issues' → powerapps\n\
- 'Visualize monthly sales' → powerbi";

/// Routing label produced by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolLabel {
    PowerBi,
    PowerApps,
}

impl ToolLabel {
    pub const ALL: [ToolLabel; 2] = [ToolLabel::PowerBi, ToolLabel::PowerApps];

    pub fn as_str(&self) -> &'static str {
        match self {
            ToolLabel::PowerBi => "powerbi",
            ToolLabel::PowerApps => "powerapps",
        }
    }

    /// Accept a model reply: trimmed, lower-cased, and exactly one label.
    pub fn from_reply(reply: &str) -> Option<Self> {
        match reply.trim().to_lowercase().as_str() {
            "powerbi" => Some(ToolLabel::PowerBi),
            "powerapps" => Some(ToolLabel::PowerApps),
            _ => None,
        }
    }
}

impl fmt::Display for ToolLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Outcome of one classification call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Label(ToolLabel),
    /// The model answered with something other than a label.
    Unrecognized(String),
    /// The LLM call itself failed.
    Failed(String),
}

impl Classification {
    pub fn label(&self) -> Option<ToolLabel> {
        match self {
            Classification::Label(label) => Some(*label),
            _ => None,
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classification::Label(label) => write!(f, "{}", label),
            Classification::Unrecognized(raw) => write!(f, "unrecognized reply {:?}", raw),
            Classification::Failed(cause) => write!(f, "classification failed: {}", cause),
        }
    }
}

/// Classifies questions with a single LLM completion.
pub struct ToolClassifier {
    provider: Box<dyn LlmProvider>,
    params: CompletionParams,
}

impl ToolClassifier {
    pub fn new(provider: Box<dyn LlmProvider>) -> Self {
        Self {
            provider,
            params: CompletionParams::default(),
        }
    }

    pub fn with_params(mut self, params: CompletionParams) -> Self {
        self.params = params;
        self
    }

    /// Never fails: provider errors come back as `Classification::Failed`.
    pub async fn classify(&self, question: &str) -> Classification {
        let messages = vec![
            Message {
                role: Role::System,
                content: CLASSIFIER_PROMPT.to_string(),
            },
            Message {
                role: Role::User,
                content: question.to_string(),
            },
        ];

        match self.provider.complete(messages, &self.params).await {
            Ok(reply) => match ToolLabel::from_reply(&reply) {
                Some(label) => {
                    debug!(%label, "question classified");
                    Classification::Label(label)
                }
                None => {
                    debug!(reply = %reply, "classifier reply is not a label");
                    Classification::Unrecognized(reply)
                }
            },
            Err(e) => {
                warn!(error = %e, "LLM classification error");
                Classification::Failed(e.to_string())
            }
        }
    }
}
