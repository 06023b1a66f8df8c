//! Tool subsystem for agent-callable robot actions.
//!
//! Each robot action is exposed as a [`Tool`]: a name, a description, a JSON
//! parameter schema and an async `execute` returning a [`ToolResult`]. Tools
//! only parse and validate arguments; the HTTP work happens in
//! [`CommandRelay`](crate::robot::CommandRelay).
//!
//! [`all_tools`] assembles the full registry from one shared relay.
//!
//! # Extension
//!
//! To add a robot action, add the typed operation to `CommandRelay`, implement
//! [`Tool`] in a new submodule, and register it in [`all_tools`].

pub(crate) mod args;
pub mod beep;
pub mod camera;
pub mod drive;
pub mod fleet;
pub mod info;
pub mod motion;
pub mod status;
pub mod stop;
pub mod traits;

pub use beep::BeepTool;
pub use camera::CameraImageTool;
pub use drive::DriveTool;
pub use fleet::ListRobotsTool;
pub use info::RobotInfoTool;
pub use motion::MotionTool;
pub use status::RobotStatusTool;
pub use stop::StopTool;
pub use traits::{Tool, ToolResult, ToolSpec};

use crate::config::RelayConfig;
use crate::robot::{CommandRelay, Direction};
use std::sync::Arc;

/// Create every robot tool around one shared relay.
pub fn all_tools(relay: Arc<CommandRelay>) -> Vec<Box<dyn Tool>> {
    vec![
        Box::new(MotionTool::new(relay.clone(), Direction::Forward)),
        Box::new(MotionTool::new(relay.clone(), Direction::Backward)),
        Box::new(MotionTool::new(relay.clone(), Direction::Left)),
        Box::new(MotionTool::new(relay.clone(), Direction::Right)),
        Box::new(StopTool::new(relay.clone())),
        Box::new(BeepTool::new(relay.clone())),
        Box::new(DriveTool::new(relay.clone())),
        Box::new(RobotStatusTool::new(relay.clone())),
        Box::new(CameraImageTool::new(relay.clone())),
        Box::new(ListRobotsTool::new(relay.clone())),
        Box::new(RobotInfoTool::new(relay)),
    ]
}

/// Build the relay from config and return the full registry.
pub fn tools_from_config(config: &RelayConfig) -> anyhow::Result<Vec<Box<dyn Tool>>> {
    let relay = Arc::new(CommandRelay::from_config(config)?);
    Ok(all_tools(relay))
}

/// Look up a tool by name and run it. Unknown names are a failed result.
pub async fn dispatch(
    tools: &[Box<dyn Tool>],
    name: &str,
    args: serde_json::Value,
) -> anyhow::Result<ToolResult> {
    match tools.iter().find(|t| t.name() == name) {
        Some(tool) => tool.execute(args).await,
        None => Ok(ToolResult::failure(format!("Unknown tool: {name}"))),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::robot::{CommandRelay, Fleet, Target};
    use std::sync::Arc;
    use std::time::Duration;
    use wiremock::MockServer;

    /// Relay whose default target is the mock server.
    pub(crate) fn relay_for(server: &MockServer) -> Arc<CommandRelay> {
        let addr = server.address();
        let fleet = Fleet::new(
            addr.ip().to_string(),
            addr.port(),
            vec![Target::new("Mock Robot", addr.ip().to_string(), addr.port())],
        );
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        Arc::new(CommandRelay::with_client(client, fleet))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn registry() -> Vec<Box<dyn Tool>> {
        tools_from_config(&RelayConfig::default()).unwrap()
    }

    #[test]
    fn registry_exposes_every_robot_action() {
        let tools = registry();
        let names: Vec<&str> = tools.iter().map(|t| t.name()).collect();
        assert_eq!(
            names,
            vec![
                "drive_forward",
                "drive_backward",
                "turn_left",
                "turn_right",
                "stop",
                "beep",
                "drive",
                "robot_status",
                "get_camera_image",
                "list_available_robots",
                "robot_info",
            ]
        );
    }

    #[test]
    fn tool_names_are_unique() {
        let tools = registry();
        let unique: HashSet<&str> = tools.iter().map(|t| t.name()).collect();
        assert_eq!(unique.len(), tools.len());
    }

    #[test]
    fn every_spec_is_an_object_schema() {
        for tool in registry() {
            let spec = tool.spec();
            assert!(!spec.description.is_empty(), "{} lacks description", spec.name);
            assert_eq!(spec.parameters["type"], "object", "{}", spec.name);
            assert!(spec.parameters["properties"].is_object(), "{}", spec.name);
        }
    }

    #[tokio::test]
    async fn dispatch_unknown_tool_fails_softly() {
        let tools = registry();
        let result = dispatch(&tools, "self_destruct", serde_json::json!({}))
            .await
            .unwrap();
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("Unknown tool: self_destruct"));
    }

    #[tokio::test]
    async fn dispatch_rejects_bad_args_before_network() {
        let tools = registry();
        let result = dispatch(&tools, "stop", serde_json::json!({"port": 0}))
            .await
            .unwrap();
        assert!(!result.success);
        assert!(result.error.unwrap().contains("port"));
    }
}
