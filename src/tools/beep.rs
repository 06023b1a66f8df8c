use super::args;
use super::traits::{Tool, ToolResult};
use crate::robot::params::{DEFAULT_BEEP_DURATION, DEFAULT_BEEP_FREQUENCY, DEFAULT_BEEP_VOLUME};
use crate::robot::{BeepParams, CommandRelay, Target};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

/// Play a tone through the robot's speaker.
pub struct BeepTool {
    relay: Arc<CommandRelay>,
}

impl BeepTool {
    pub fn new(relay: Arc<CommandRelay>) -> Self {
        Self { relay }
    }

    fn parse(&self, args: &serde_json::Value) -> anyhow::Result<(Target, BeepParams)> {
        let target = args::target(self.relay.fleet(), args)?;
        let defaults = BeepParams::default();
        let params = BeepParams {
            frequency: args::non_negative(args, "frequency")?.unwrap_or(defaults.frequency),
            duration: args::non_negative(args, "duration")?.unwrap_or(defaults.duration),
            volume: args::bounded(args, "volume", 0.0, 1.0)?.unwrap_or(defaults.volume),
        };
        Ok((target, params))
    }
}

#[async_trait]
impl Tool for BeepTool {
    fn name(&self) -> &str {
        "beep"
    }

    fn description(&self) -> &str {
        "Play a beep sound through the robot's speaker at a given frequency, duration and volume."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        args::object_schema(
            self.relay.fleet(),
            json!({
                "frequency": {
                    "type": "number",
                    "description": "Frequency in Hz (default: 440.0, the A4 note)",
                    "minimum": 0,
                    "default": DEFAULT_BEEP_FREQUENCY
                },
                "duration": {
                    "type": "number",
                    "description": "Duration in seconds (default: 1.0)",
                    "minimum": 0,
                    "default": DEFAULT_BEEP_DURATION
                },
                "volume": {
                    "type": "number",
                    "description": "Volume between 0.0 and 1.0 (default: 0.5)",
                    "minimum": 0,
                    "maximum": 1,
                    "default": DEFAULT_BEEP_VOLUME
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
            frequency = params.frequency,
            duration = params.duration,
            volume = params.volume,
            "Relaying beep"
        );
        Ok(args::relay_result(self.relay.beep(&target, params).await))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::relay_for;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn defaults_are_sent_explicitly() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/beep"))
            .and(query_param("frequency", "440.0"))
            .and(query_param("duration", "1.0"))
            .and(query_param("volume", "0.5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "beeping"})))
            .expect(1)
            .mount(&server)
            .await;

        let result = BeepTool::new(relay_for(&server))
            .execute(json!({}))
            .await
            .unwrap();
        assert!(result.success, "{:?}", result.error);
    }

    #[tokio::test]
    async fn custom_tone_overrides_defaults() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/beep"))
            .and(query_param("frequency", "880.0"))
            .and(query_param("duration", "0.25"))
            .and(query_param("volume", "1.0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let result = BeepTool::new(relay_for(&server))
            .execute(json!({"frequency": 880, "duration": 0.25, "volume": 1}))
            .await
            .unwrap();
        assert!(result.success, "{:?}", result.error);
    }

    #[tokio::test]
    async fn volume_above_one_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let result = BeepTool::new(relay_for(&server))
            .execute(json!({"volume": 3}))
            .await
            .unwrap();
        assert!(!result.success);
        assert!(result.error.unwrap().contains("volume"));
    }

    #[tokio::test]
    async fn high_frequency_is_relayed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/beep"))
            .and(query_param("frequency", "25000.0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let result = BeepTool::new(relay_for(&server))
            .execute(json!({"frequency": 25000}))
            .await
            .unwrap();
        assert!(result.success, "{:?}", result.error);
    }

    #[tokio::test]
    async fn negative_frequency_is_rejected() {
        let result = BeepTool::new(relay_for(&MockServer::start().await))
            .execute(json!({"frequency": -10}))
            .await
            .unwrap();
        assert!(!result.success);
        assert!(result.error.unwrap().contains("frequency"));
    }
}
