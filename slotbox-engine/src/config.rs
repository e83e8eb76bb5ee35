use serde::{Deserialize, Serialize};
use slotbox_types::{DEFAULT_TEMPLATE, NodeId};
use std::time::Duration;

/// Configuration for one slot engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Load existing contents on initialization.
    pub standalone: bool,
    /// Page node whose contents are loaded.
    pub node_id: Option<NodeId>,
    /// Grace period before a drag-leave removes the placeholder (ms).
    pub leave_grace_ms: u64,
    /// Template for items whose descriptor names none.
    pub default_template: String,
    /// Capacity of the change notification channel.
    pub event_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            standalone: true,
            node_id: None,
            leave_grace_ms: 100,
            default_template: DEFAULT_TEMPLATE.to_string(),
            event_capacity: 64,
        }
    }
}

impl EngineConfig {
    pub fn leave_grace(&self) -> Duration {
        Duration::from_millis(self.leave_grace_ms)
    }
}
