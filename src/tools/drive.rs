use super::args;
use super::traits::{Tool, ToolResult};
use crate::robot::{CommandRelay, DriveParams, Target};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

/// Precise velocity control via `POST /drive`.
pub struct DriveTool {
    relay: Arc<CommandRelay>,
}

impl DriveTool {
    pub fn new(relay: Arc<CommandRelay>) -> Self {
        Self { relay }
    }

    fn parse(&self, args: &serde_json::Value) -> anyhow::Result<(Target, DriveParams)> {
        let target = args::target(self.relay.fleet(), args)?;
        let params = DriveParams {
            linear_velocity: args::number(args, "linear_velocity")?.unwrap_or(0.0),
            angular_velocity: args::number(args, "angular_velocity")?.unwrap_or(0.0),
            duration: args::non_negative(args, "duration")?,
        };
        Ok((target, params))
    }
}

#[async_trait]
impl Tool for DriveTool {
    fn name(&self) -> &str {
        "drive"
    }

    fn description(&self) -> &str {
        "Control the robot with precise linear (m/s) and angular (rad/s) velocities. \
         Combine both to drive in arcs. Without a duration the robot keeps moving until stopped."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        args::object_schema(
            self.relay.fleet(),
            json!({
                "linear_velocity": {
                    "type": "number",
                    "description": "Linear velocity in m/s (positive forward, negative backward)",
                    "default": 0.0
                },
                "angular_velocity": {
                    "type": "number",
                    "description": "Angular velocity in rad/s (positive turns left)",
                    "default": 0.0
                },
                "duration": {
                    "type": "number",
                    "description": "Duration in seconds (optional)",
                    "minimum": 0
                }
            }),
        )
    }

    async fn execute(&self, args: serde_json::Value) -> anyhow::Result<ToolResult> {
        let (target, params) = match self.parse(&args) {
            Ok(parsed) => parsed,
            Err(e) => return Ok(ToolResult::failure(e.to_string())),
        };

        tracing::info!(
            robot = %target,
            linear = params.linear_velocity,
            angular = params.angular_velocity,
            duration = ?params.duration,
            "Relaying drive"
        );
        Ok(args::relay_result(self.relay.drive(&target, params).await))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::relay_for;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn posts_velocity_body_with_duration() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/drive"))
            .and(body_json(json!({
                "linear_velocity": 0.4,
                "angular_velocity": -0.8,
                "duration": 3.0
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "driving"})))
            .expect(1)
            .mount(&server)
            .await;

        let result = DriveTool::new(relay_for(&server))
            .execute(json!({"linear_velocity": 0.4, "angular_velocity": -0.8, "duration": 3}))
            .await
            .unwrap();
        assert!(result.success, "{:?}", result.error);
        assert_eq!(result.output, r#"{"status":"driving"}"#);
    }

    #[tokio::test]
    async fn omitted_velocities_default_to_zero_and_duration_is_absent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/drive"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        DriveTool::new(relay_for(&server))
            .execute(json!({}))
            .await
            .unwrap();

        let requests = server.received_requests().await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(body, json!({"linear_velocity": 0.0, "angular_velocity": 0.0}));
        assert!(body.get("duration").is_none());
    }
}
