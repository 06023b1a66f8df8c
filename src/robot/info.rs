use super::relay::CommandRelay;
use super::Target;
use serde::Serialize;

const CAPABILITIES: &[&str] = &[
    "Movement: forward, backward, left, right",
    "Sound: beep at different frequencies",
    "Control: precise velocity control",
    "Vision: camera image capture",
];

const API_ENDPOINTS: &[&str] = &[
    "/forward - Move forward",
    "/backward - Move backward",
    "/left - Turn left",
    "/right - Turn right",
    "/stop - Stop movement",
    "/beep - Play sound",
    "/drive - Precise movement control",
    "/image - Get camera image",
    "/image/base64 - Get base64 encoded camera image",
];

/// URI scheme for the per-robot info resource: `robot://info/{port}`.
pub const INFO_URI_PREFIX: &str = "robot://info/";

/// Display name plus the static capability listing of one robot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RobotInfo {
    pub name: String,
    pub host: String,
    pub port: u16,
    pub capabilities: Vec<String>,
    pub api_endpoints: Vec<String>,
}

impl RobotInfo {
    /// Resolve the robot's self-reported name, falling back to the locator-derived
    /// name on any failure. Never fails.
    pub async fn lookup(relay: &CommandRelay, target: &Target) -> Self {
        let name = match relay.status(target).await {
            Ok(payload) => match payload.get("name").and_then(|v| v.as_str()) {
                Some(name) if !name.trim().is_empty() => name.trim().to_string(),
                _ => target.fallback_name(),
            },
            Err(e) => {
                tracing::debug!(
                    robot = %target,
                    error = %e,
                    "Robot name lookup failed, using fallback"
                );
                target.fallback_name()
            }
        };

        Self::with_name(name, target)
    }

    fn with_name(name: String, target: &Target) -> Self {
        Self {
            name,
            host: target.host.clone(),
            port: target.port,
            capabilities: CAPABILITIES.iter().map(|s| (*s).to_string()).collect(),
            api_endpoints: API_ENDPOINTS.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

/// Parse `robot://info/{port}` into the port it addresses.
pub fn parse_info_uri(uri: &str) -> anyhow::Result<u16> {
    let rest = uri
        .trim()
        .strip_prefix(INFO_URI_PREFIX)
        .ok_or_else(|| anyhow::anyhow!("Not a robot info URI: {uri}"))?;
    let port: u16 = rest
        .trim_end_matches('/')
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid port in robot info URI: {uri}"))?;
    if port == 0 {
        anyhow::bail!("Invalid port in robot info URI: {uri}");
    }
    Ok(port)
}
