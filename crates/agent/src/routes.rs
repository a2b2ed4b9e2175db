use relay_core::config::AgentRouteConfig;

use crate::classifier::ToolLabel;

/// Fixed label -> agent id table, loaded once at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgentRoutes {
    powerbi: Option<String>,
    powerapps: Option<String>,
}

impl AgentRoutes {
    pub fn new(powerbi: Option<String>, powerapps: Option<String>) -> Self {
        let non_empty = |id: Option<String>| id.filter(|s| !s.trim().is_empty());
        Self {
            powerbi: non_empty(powerbi),
            powerapps: non_empty(powerapps),
        }
    }

    pub fn from_config(config: &AgentRouteConfig) -> Self {
        Self::new(config.powerbi_agent_id.clone(), config.powerapps_agent_id.clone())
    }

    pub fn agent_for(&self, label: ToolLabel) -> Option<&str> {
        match label {
            ToolLabel::PowerBi => self.powerbi.as_deref(),
            ToolLabel::PowerApps => self.powerapps.as_deref(),
        }
    }

    /// Agent id for a possibly-absent label; `None` means no agent.
    pub fn resolve(&self, label: Option<ToolLabel>) -> Option<&str> {
        label.and_then(|l| self.agent_for(l))
    }

    pub fn entries(&self) -> impl Iterator<Item = (ToolLabel, Option<&str>)> + '_ {
        ToolLabel::ALL.into_iter().map(move |label| (label, self.agent_for(label)))
    }
}
