use super::args;
use super::traits::{Tool, ToolResult};
use crate::robot::params::DEFAULT_IMAGE_QUALITY;
use crate::robot::{CommandRelay, ImageFormat, ImageParams, Target};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

/// Capture the current camera frame from a robot.
///
/// The frame is returned inline as an `[IMAGE:data:...]` marker so the
/// multimodal pipeline can forward it to vision-capable models.
pub struct CameraImageTool {
    relay: Arc<CommandRelay>,
}

impl CameraImageTool {
    pub fn new(relay: Arc<CommandRelay>) -> Self {
        Self { relay }
    }

    fn parse(&self, args: &serde_json::Value) -> anyhow::Result<(Target, ImageParams)> {
        let target = args::target(self.relay.fleet(), args)?;
        let format = match args::string(args, "format")? {
            Some(raw) => raw.parse::<ImageFormat>()?,
            None => ImageFormat::default(),
        };
        let quality = match args::bounded(args, "quality", 1.0, 100.0)? {
            Some(q) if q.fract() != 0.0 => {
                anyhow::bail!("Invalid 'quality' parameter: {q} must be an integer")
            }
            Some(q) => q as u8,
            None => DEFAULT_IMAGE_QUALITY,
        };
        Ok((target, ImageParams { format, quality }))
    }
}

#[async_trait]
impl Tool for CameraImageTool {
    fn name(&self) -> &str {
        "get_camera_image"
    }

    fn description(&self) -> &str {
        "Get the current camera image from the robot. \
         Returns the image inline as a base64 data URI."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        args::object_schema(
            self.relay.fleet(),
            json!({
                "format": {
                    "type": "string",
                    "enum": ["jpeg", "png"],
                    "description": "Image format (default: png)",
                    "default": "png"
                },
                "quality": {
                    "type": "integer",
                    "description": "Image quality for JPEG encoding, 1-100 (default: 90)",
                    "minimum": 1,
                    "maximum": 100,
                    "default": DEFAULT_IMAGE_QUALITY
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
            format = %params.format,
            quality = params.quality,
            "Capturing camera image"
        );
        let image = match self.relay.capture_image(&target, params).await {
            Ok(image) => image,
            Err(e) => return Ok(ToolResult::failure(e.to_tool_error())),
        };

        if image.is_empty() {
            return Ok(ToolResult::failure(format!(
                "malformed_response: robot at {} returned an empty image",
                target.locator()
            )));
        }

        Ok(ToolResult::ok(format!(
            "Camera image from {target}\nFormat: {}\nSize: {} bytes\n[IMAGE:{}]",
            image.format,
            image.len(),
            image.to_data_uri()
        )))
    }
}
