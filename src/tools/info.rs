use super::args;
use super::traits::{Tool, ToolResult};
use crate::robot::{parse_info_uri, CommandRelay, RobotInfo};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

/// Capability listing for one robot, also addressable as `robot://info/{port}`.
pub struct RobotInfoTool {
    relay: Arc<CommandRelay>,
}

impl RobotInfoTool {
    pub fn new(relay: Arc<CommandRelay>) -> Self {
        Self { relay }
    }

    /// Read the `robot://info/{port}` resource.
    pub async fn read_resource(&self, uri: &str) -> anyhow::Result<RobotInfo> {
        let port = parse_info_uri(uri)?;
        let target = self.relay.fleet().resolve(None, Some(port));
        Ok(RobotInfo::lookup(&self.relay, &target).await)
    }
}

#[async_trait]
impl Tool for RobotInfoTool {
    fn name(&self) -> &str {
        "robot_info"
    }

    fn description(&self) -> &str {
        "Get information about a robot's capabilities: its display name, \
         supported actions and API endpoints."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        args::object_schema(self.relay.fleet(), json!({}))
    }

    async fn execute(&self, args: serde_json::Value) -> anyhow::Result<ToolResult> {
        let target = match args::target(self.relay.fleet(), &args) {
            Ok(t) => t,
            Err(e) => return Ok(ToolResult::failure(e.to_string())),
        };

        let info = RobotInfo::lookup(&self.relay, &target).await;
        Ok(ToolResult::ok(serde_json::to_string(&info)?))
    }
}
