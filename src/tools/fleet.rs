use super::traits::{Tool, ToolResult};
use crate::robot::{CommandRelay, FleetStatus};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

/// Snapshot of every configured robot's status.
pub struct ListRobotsTool {
    relay: Arc<CommandRelay>,
}

impl ListRobotsTool {
    pub fn new(relay: Arc<CommandRelay>) -> Self {
        Self { relay }
    }
}

#[async_trait]
impl Tool for ListRobotsTool {
    fn name(&self) -> &str {
        "list_available_robots"
    }

    fn description(&self) -> &str {
        "List all configured robots with their port and current status \
         (online with status info, application error with HTTP status, or unreachable with reason)."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {},
            "required": []
        })
    }

    async fn execute(&self, _args: serde_json::Value) -> anyhow::Result<ToolResult> {
        let report = FleetStatus::new(&self.relay).report().await;
        tracing::info!(
            robots = report.len(),
            online = report.online_count(),
            "Fleet status listed"
        );
        Ok(ToolResult::ok(serde_json::to_string(&report)?))
    }
}
