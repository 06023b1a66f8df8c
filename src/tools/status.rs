use super::args;
use super::traits::{Tool, ToolResult};
use crate::robot::CommandRelay;
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

/// Robot status and available endpoints (`GET /`).
pub struct RobotStatusTool {
    relay: Arc<CommandRelay>,
}

impl RobotStatusTool {
    pub fn new(relay: Arc<CommandRelay>) -> Self {
        Self { relay }
    }
}

#[async_trait]
impl Tool for RobotStatusTool {
    fn name(&self) -> &str {
        "robot_status"
    }

    fn description(&self) -> &str {
        "Get the status and available endpoints of one robot."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        args::object_schema(self.relay.fleet(), json!({}))
    }

    async fn execute(&self, args: serde_json::Value) -> anyhow::Result<ToolResult> {
        let target = match args::target(self.relay.fleet(), &args) {
            Ok(t) => t,
            Err(e) => return Ok(ToolResult::failure(e.to_string())),
        };

        tracing::debug!(robot = %target, "Relaying status");
        Ok(args::relay_result(self.relay.status(&target).await))
    }
}
