use crate::errors::{WorkflowError, WorkflowResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowConfig {
    /// Ceiling on the summed hours of a single date within one sheet.
    #[serde(default = "default_daily_ceiling")]
    pub daily_ceiling_hours: f64,
    /// Capability code an approver must hold besides the routing edge.
    #[serde(default = "default_approve_capability")]
    pub approve_capability: String,
}

fn default_daily_ceiling() -> f64 {
    24.0
}
fn default_approve_capability() -> String {
    "timesheet.approve".to_string()
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            daily_ceiling_hours: default_daily_ceiling(),
            approve_capability: default_approve_capability(),
        }
    }
}

impl WorkflowConfig {
    /// Parse a YAML snippet; file discovery belongs to the calling layer.
    pub fn from_yaml_str(content: &str) -> WorkflowResult<Self> {
        serde_yaml::from_str(content).map_err(|e| WorkflowError::Config(e.to_string()))
    }
}
