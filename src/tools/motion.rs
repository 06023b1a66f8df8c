use super::args;
use super::traits::{Tool, ToolResult};
use crate::robot::{CommandRelay, Direction, MotionParams, Target};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

/// Drive or turn at a fixed speed: `drive_forward`, `drive_backward`,
/// `turn_left`, `turn_right`.
pub struct MotionTool {
    relay: Arc<CommandRelay>,
    direction: Direction,
}

impl MotionTool {
    pub fn new(relay: Arc<CommandRelay>, direction: Direction) -> Self {
        Self { relay, direction }
    }

    fn is_turn(&self) -> bool {
        matches!(self.direction, Direction::Left | Direction::Right)
    }

    fn parse(&self, args: &serde_json::Value) -> anyhow::Result<(Target, MotionParams)> {
        let target = args::target(self.relay.fleet(), args)?;
        let mut params = self.direction.default_params();
        if let Some(speed) = args::non_negative(args, "speed")? {
            params.speed = speed;
        }
        params.duration = args::non_negative(args, "duration")?;
        Ok((target, params))
    }
}

#[async_trait]
impl Tool for MotionTool {
    fn name(&self) -> &str {
        match self.direction {
            Direction::Forward => "drive_forward",
            Direction::Backward => "drive_backward",
            Direction::Left => "turn_left",
            Direction::Right => "turn_right",
        }
    }

    fn description(&self) -> &str {
        match self.direction {
            Direction::Forward => {
                "Drive the robot forward at the specified speed (m/s). \
                 Without a duration the robot keeps moving until stopped."
            }
            Direction::Backward => {
                "Drive the robot backward at the specified speed (m/s). \
                 Without a duration the robot keeps moving until stopped."
            }
            Direction::Left => {
                "Turn the robot left at the specified angular speed (rad/s). \
                 Without a duration the robot keeps turning until stopped."
            }
            Direction::Right => {
                "Turn the robot right at the specified angular speed (rad/s). \
                 Without a duration the robot keeps turning until stopped."
            }
        }
    }

    fn parameters_schema(&self) -> serde_json::Value {
        let defaults = self.direction.default_params();
        let speed_description = if self.is_turn() {
            format!("Angular speed in radians per second (default: {})", defaults.speed)
        } else {
            format!("Speed in meters per second (default: {})", defaults.speed)
        };
        args::object_schema(
            self.relay.fleet(),
            json!({
                "speed": {
                    "type": "number",
                    "description": speed_description,
                    "minimum": 0,
                    "default": defaults.speed
                },
                "duration": {
                    "type": "number",
                    "description": "Duration in seconds (optional). \
                        If not provided, the robot continues until stopped.",
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
            tool = self.name(),
            robot = %target,
            speed = params.speed,
            duration = ?params.duration,
            "Relaying motion command"
        );
        Ok(args::relay_result(
            self.relay.motion(&target, self.direction, params).await,
        ))
    }
}
