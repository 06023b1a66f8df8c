//! Downstream robot access.
//!
//! Every robot exposes the same small HTTP control API on its own port. This
//! module owns the typed view of that API:
//!
//! - [`Target`]: one robot's locator and display name
//! - [`CommandRelay`]: one typed operation per robot action, each issuing
//!   exactly one HTTP request
//! - [`FleetStatus`]: concurrent, per-robot isolated status snapshot
//! - [`RobotInfo`]: best-effort name discovery plus static capability listing
//!
//! The agent-facing [`Tool`](crate::tools::Tool) wrappers live in
//! [`crate::tools`] and only translate JSON arguments into these calls.

pub mod error;
pub mod fleet;
pub mod info;
pub mod params;
pub mod relay;

pub use error::{RelayError, RelayErrorKind};
pub use fleet::{FleetEntry, FleetReport, FleetStatus, RobotState};
pub use info::{parse_info_uri, RobotInfo, INFO_URI_PREFIX};
pub use params::{BeepParams, DriveParams, ImageFormat, ImageParams, MotionParams};
pub use relay::{CapturedImage, CommandRelay, Direction};

use crate::config::RelayConfig;
use serde::Serialize;

/// One robot reachable over HTTP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Target {
    pub name: String,
    pub host: String,
    pub port: u16,
}

impl Target {
    pub fn new(name: impl Into<String>, host: impl Into<String>, port: u16) -> Self {
        Self {
            name: name.into(),
            host: host.into(),
            port,
        }
    }

    /// Target with no configured name; uses [`Target::fallback_name`].
    pub fn ad_hoc(host: impl Into<String>, port: u16) -> Self {
        let host = host.into();
        let name = fallback_name(&host, port);
        Self { name, host, port }
    }

    /// `http://<host>:<port>`, with IPv6 literals bracketed.
    pub fn base_url(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("http://[{}]:{}", self.host, self.port)
        } else {
            format!("http://{}:{}", self.host, self.port)
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url(), path)
    }

    /// Deterministic display name derived only from the locator.
    pub fn fallback_name(&self) -> String {
        fallback_name(&self.host, self.port)
    }

    pub fn locator(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.locator())
    }
}

fn fallback_name(host: &str, port: u16) -> String {
    if is_loopback_host(host) {
        format!("Robot (Port {port})")
    } else {
        format!("Robot ({host}:{port})")
    }
}

fn is_loopback_host(host: &str) -> bool {
    let bare = host
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host);
    bare.eq_ignore_ascii_case("localhost")
        || bare
            .parse::<std::net::IpAddr>()
            .is_ok_and(|ip| ip.is_loopback())
}

fn host_matches_allowlist(host: &str, allowed: &[String]) -> bool {
    allowed.iter().any(|pattern| {
        if pattern == "*" {
            return true;
        }

        if let Some(suffix) = pattern.strip_prefix("*.") {
            return host == suffix || host.ends_with(&format!(".{suffix}"));
        }

        host == pattern
    })
}

/// Immutable view of the configured fleet plus the defaults used to resolve
/// targets that tool calls refer to by port.
#[derive(Debug, Clone)]
pub struct Fleet {
    default_host: String,
    default_port: u16,
    targets: Vec<Target>,
    allowed_hosts: Vec<String>,
}

impl Fleet {
    pub fn new(default_host: impl Into<String>, default_port: u16, targets: Vec<Target>) -> Self {
        Self {
            default_host: default_host.into(),
            default_port,
            targets,
            allowed_hosts: Vec::new(),
        }
    }

    /// Extra hosts tool calls may address besides the configured robots.
    /// Entries follow the `example.com` / `*.example.com` / `*` patterns.
    pub fn with_allowed_hosts(mut self, hosts: Vec<String>) -> Self {
        let mut hosts: Vec<String> = hosts
            .iter()
            .map(|h| h.trim().to_ascii_lowercase())
            .filter(|h| !h.is_empty())
            .collect();
        hosts.sort_unstable();
        hosts.dedup();
        self.allowed_hosts = hosts;
        self
    }

    pub fn from_config(config: &RelayConfig) -> Self {
        let targets = config
            .robots
            .iter()
            .map(|robot| Target::new(robot.name.trim(), config.robot_host(robot), robot.port))
            .collect();
        Self::new(config.default_host.trim(), config.default_port, targets)
            .with_allowed_hosts(config.allowed_hosts.clone())
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn default_host(&self) -> &str {
        &self.default_host
    }

    pub fn default_port(&self) -> u16 {
        self.default_port
    }

    /// Whether a tool call may address `host`: the default host, a configured
    /// robot's host, or an `allowed_hosts` match.
    pub fn allows_host(&self, host: &str) -> bool {
        let host = host.trim().to_ascii_lowercase();
        host.eq_ignore_ascii_case(&self.default_host)
            || self.targets.iter().any(|t| t.host.eq_ignore_ascii_case(&host))
            || host_matches_allowlist(&host, &self.allowed_hosts)
    }

    /// The robot addressed when a call names neither host nor port.
    pub fn default_target(&self) -> Target {
        self.resolve(None, None)
    }

    /// Resolve a host/port pair, preferring the configured robot's name.
    pub fn resolve(&self, host: Option<&str>, port: Option<u16>) -> Target {
        let host = host
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .unwrap_or(self.default_host.as_str());
        let port = port.unwrap_or(self.default_port);

        self.targets
            .iter()
            .find(|t| t.port == port && t.host.eq_ignore_ascii_case(host))
            .cloned()
            .unwrap_or_else(|| Target::ad_hoc(host, port))
    }
}

impl Default for Fleet {
    fn default() -> Self {
        Self::from_config(&RelayConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_formats_host_and_port() {
        let target = Target::new("Robot 1", "localhost", 8000);
        assert_eq!(target.base_url(), "http://localhost:8000");
        assert_eq!(target.url("/forward"), "http://localhost:8000/forward");
    }

    #[test]
    fn base_url_brackets_ipv6() {
        let target = Target::new("v6", "::1", 8000);
        assert_eq!(target.base_url(), "http://[::1]:8000");
    }

    #[test]
    fn fallback_name_for_loopback_uses_port_only() {
        assert_eq!(Target::ad_hoc("localhost", 8002).name, "Robot (Port 8002)");
        assert_eq!(Target::ad_hoc("127.0.0.1", 8003).name, "Robot (Port 8003)");
    }

    #[test]
    fn fallback_name_for_remote_host_includes_host() {
        let target = Target::new("Named", "10.1.2.3", 9000);
        assert_eq!(target.fallback_name(), "Robot (10.1.2.3:9000)");
    }

    #[test]
    fn fleet_resolves_configured_robot_by_port() {
        let fleet = Fleet::default();
        let target = fleet.resolve(None, Some(8001));
        assert_eq!(target.name, "Robot 2");
        assert_eq!(target.host, "localhost");
    }

    #[test]
    fn fleet_default_target_is_first_default_port() {
        let fleet = Fleet::default();
        let target = fleet.default_target();
        assert_eq!(target.port, 8000);
        assert_eq!(target.name, "Robot 1");
    }

    #[test]
    fn fleet_resolves_unknown_port_ad_hoc() {
        let fleet = Fleet::default();
        let target = fleet.resolve(Some("robot.lan"), Some(8000));
        assert_eq!(target.name, "Robot (robot.lan:8000)");
    }

    #[test]
    fn fleet_allows_only_known_hosts_by_default() {
        let fleet = Fleet::default();
        assert!(fleet.allows_host("localhost"));
        assert!(fleet.allows_host("LOCALHOST"));
        assert!(!fleet.allows_host("169.254.169.254"));
        assert!(!fleet.allows_host("robot.lan"));
    }

    #[test]
    fn fleet_allows_configured_robot_hosts() {
        let fleet = Fleet::new(
            "localhost",
            8000,
            vec![Target::new("Remote", "10.0.0.9", 8000)],
        );
        assert!(fleet.allows_host("10.0.0.9"));
        assert!(!fleet.allows_host("10.0.0.10"));
    }

    #[test]
    fn fleet_allowed_hosts_support_wildcards() {
        let fleet = Fleet::default().with_allowed_hosts(vec![
            "*.robots.lan".into(),
            " Dock.Local ".into(),
        ]);
        assert!(fleet.allows_host("scout.robots.lan"));
        assert!(fleet.allows_host("robots.lan"));
        assert!(fleet.allows_host("dock.local"));
        assert!(!fleet.allows_host("evilrobots.lan"));
        assert!(!fleet.allows_host("example.com"));
    }
}
