use super::args;
use super::traits::{Tool, ToolResult};
use crate::robot::CommandRelay;
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

/// Stop all robot movement immediately.
pub struct StopTool {
    relay: Arc<CommandRelay>,
}

impl StopTool {
    pub fn new(relay: Arc<CommandRelay>) -> Self {
        Self { relay }
    }
}

#[async_trait]
impl Tool for StopTool {
    fn name(&self) -> &str {
        "stop"
    }

    fn description(&self) -> &str {
        "Stop all robot movement immediately."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        args::object_schema(self.relay.fleet(), json!({}))
    }

    async fn execute(&self, args: serde_json::Value) -> anyhow::Result<ToolResult> {
        let target = match args::target(self.relay.fleet(), &args) {
            Ok(t) => t,
            Err(e) => return Ok(ToolResult::failure(e.to_string())),
        };

        tracing::info!(robot = %target, "Relaying stop");
        Ok(args::relay_result(self.relay.stop(&target).await))
    }
}
