use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

fn profiled_env_u16(profile: &str, key: &str, default: u16) -> u16 {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn profiled_env_u64(profile: &str, key: &str, default: u64) -> u64 {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn profiled_env_f32(profile: &str, key: &str) -> Option<f32> {
    profiled_env_opt(profile, key).and_then(|v| v.parse().ok())
}

fn profiled_env_u32(profile: &str, key: &str) -> Option<u32> {
    profiled_env_opt(profile, key).and_then(|v| v.parse().ok())
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub server: ServerConfig,
    pub llm: LlmConfig,
    pub agents: AgentServiceConfig,
    pub routes: AgentRouteConfig,
    pub demo: DemoConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `RELAY_PROFILE`. When set (e.g. `PROD`), every key
    /// is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("RELAY_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            server: ServerConfig::from_env_profiled(p),
            llm: LlmConfig::from_env_profiled(p),
            agents: AgentServiceConfig::from_env_profiled(p),
            routes: AgentRouteConfig::from_env_profiled(p),
            demo: DemoConfig::from_env_profiled(p),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!("  server:   {}:{}", self.server.host, self.server.port);
        tracing::info!(
            "  llm:      provider={}, deployment={}, configured={}",
            self.llm.provider,
            self.llm.azure_deployment,
            self.llm.is_configured()
        );
        tracing::info!(
            "  agents:   api_version={}, poll={}ms, timeout={}, configured={}",
            self.agents.api_version,
            self.agents.poll_interval_ms,
            self.agents
                .run_timeout_secs
                .map(|s| format!("{}s", s))
                .unwrap_or_else(|| "none".to_string()),
            self.agents.is_configured()
        );
        tracing::info!(
            "  routes:   powerbi={}, powerapps={}",
            self.routes.powerbi_agent_id.as_deref().unwrap_or("(none)"),
            self.routes.powerapps_agent_id.as_deref().unwrap_or("(none)")
        );
    }

    /// Return a redacted view safe for API responses (no secrets).
    pub fn redacted_summary(&self) -> serde_json::Value {
        serde_json::json!({
            "profile": self.profile_label(),
            "server": { "host": self.server.host, "port": self.server.port },
            "llm": {
                "provider": self.llm.provider,
                "deployment": self.llm.azure_deployment,
                "api_version": self.llm.azure_api_version,
                "configured": self.llm.is_configured(),
            },
            "agents": {
                "api_version": self.agents.api_version,
                "poll_interval_ms": self.agents.poll_interval_ms,
                "run_timeout_secs": self.agents.run_timeout_secs,
                "message_order": self.agents.message_order,
                "configured": self.agents.is_configured(),
            },
            "routes": {
                "powerbi": self.routes.powerbi_agent_id.is_some(),
                "powerapps": self.routes.powerapps_agent_id.is_some(),
            },
        })
    }
}

// ── Server ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origin: String,
}

impl ServerConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            host: profiled_env_or(p, "HOST", "0.0.0.0"),
            port: profiled_env_u16(p, "PORT", 5000),
            cors_origin: profiled_env_or(p, "CORS_ORIGIN", "*"),
        }
    }
}

// ── LLM (Azure OpenAI / OpenAI) ──────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// "azure" or "openai"
    pub provider: String,
    pub azure_endpoint: Option<String>,
    pub azure_api_key: Option<String>,
    pub azure_api_version: String,
    /// Deployment name the completion requests are addressed to.
    pub azure_deployment: String,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl LlmConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            provider: profiled_env_or(p, "LLM_PROVIDER", "azure"),
            azure_endpoint: profiled_env_opt(p, "AZURE_ENDPOINT"),
            azure_api_key: profiled_env_opt(p, "AZURE_OPENAI_API_KEY"),
            azure_api_version: profiled_env_or(
                p,
                "AZURE_OPENAI_COMPLETION_API_VERSION",
                "2024-12-01-preview",
            ),
            azure_deployment: profiled_env_or(p, "COMPLETION_MODEL", "gpt-4.1"),
            openai_api_key: profiled_env_opt(p, "OPENAI_API_KEY"),
            openai_model: profiled_env_or(p, "OPENAI_MODEL", "gpt-4o"),
            openai_base_url: profiled_env_or(p, "OPENAI_BASE_URL", "https://api.openai.com"),
            temperature: profiled_env_f32(p, "LLM_TEMPERATURE"),
            max_tokens: profiled_env_u32(p, "LLM_MAX_TOKENS"),
        }
    }

    pub fn is_configured(&self) -> bool {
        match self.provider.as_str() {
            "azure" | "azure_openai" => {
                self.azure_endpoint.is_some() && self.azure_api_key.is_some()
            }
            "openai" => self.openai_api_key.is_some(),
            _ => false,
        }
    }
}

// ── Agent service (Azure AI Foundry project) ─────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentServiceConfig {
    /// `<host>;<subscription_id>;<resource_group>;<project_name>`
    pub connection_string: Option<String>,
    pub access_token: Option<String>,
    pub api_version: String,
    pub poll_interval_ms: u64,
    /// Upper bound on waiting for a run; `None` waits indefinitely.
    pub run_timeout_secs: Option<u64>,
    /// "asc" or "desc"
    pub message_order: String,
}

impl AgentServiceConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            connection_string: profiled_env_opt(p, "AZURE_PROJECT_CONN_STR"),
            access_token: profiled_env_opt(p, "AZURE_AGENTS_ACCESS_TOKEN"),
            api_version: profiled_env_or(p, "AZURE_AGENTS_API_VERSION", "2024-12-01-preview"),
            poll_interval_ms: profiled_env_u64(p, "AGENT_RUN_POLL_INTERVAL_MS", 1000),
            run_timeout_secs: profiled_env_opt(p, "AGENT_RUN_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok()),
            message_order: profiled_env_or(p, "AGENT_MESSAGE_ORDER", "desc").to_lowercase(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.access_token.is_some() && self.project_connection().is_ok()
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn run_timeout(&self) -> Option<Duration> {
        self.run_timeout_secs.map(Duration::from_secs)
    }

    /// Parse the configured connection string.
    pub fn project_connection(&self) -> Result<ProjectConnection, ConfigError> {
        let raw = self
            .connection_string
            .as_deref()
            .ok_or(ConfigError::Missing("AZURE_PROJECT_CONN_STR"))?;
        ProjectConnection::parse(raw)
    }
}

/// The four parts of an agent project connection string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConnection {
    pub host: String,
    pub subscription_id: String,
    pub resource_group: String,
    pub project_name: String,
}

impl ProjectConnection {
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let parts: Vec<&str> = raw.trim().split(';').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(ConfigError::Invalid {
                key: "AZURE_PROJECT_CONN_STR",
                reason: format!("expected 4 ';'-separated parts, got {}", parts.len()),
            });
        }
        if let Some(idx) = parts.iter().position(|p| p.is_empty()) {
            return Err(ConfigError::Invalid {
                key: "AZURE_PROJECT_CONN_STR",
                reason: format!("part {} is empty", idx + 1),
            });
        }
        Ok(Self {
            host: parts[0].to_string(),
            subscription_id: parts[1].to_string(),
            resource_group: parts[2].to_string(),
            project_name: parts[3].to_string(),
        })
    }

    /// Base URL of the project's agents API.
    pub fn agents_base_url(&self) -> String {
        format!(
            "https://{}/agents/v1.0/subscriptions/{}/resourceGroups/{}/providers/Microsoft.MachineLearningServices/workspaces/{}",
            self.host, self.subscription_id, self.resource_group, self.project_name
        )
    }
}

// ── Agent routes ──────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentRouteConfig {
    pub powerbi_agent_id: Option<String>,
    pub powerapps_agent_id: Option<String>,
}

impl AgentRouteConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            powerbi_agent_id: profiled_env_opt(p, "AGENT_POWERBI_ID"),
            powerapps_agent_id: profiled_env_opt(p, "AGENT_POWERAPPS_ID"),
        }
    }
}

// ── Demo ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoConfig {
    /// Question sent by `GET /test2`.
    pub question: String,
}

impl DemoConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            question: profiled_env_or(p, "DEMO_QUESTION", "What is Powerapps?"),
        }
    }
}
