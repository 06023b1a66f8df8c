//! Fleet-wide status snapshot.
//!
//! Each configured robot is probed concurrently with its own timeout. The
//! outcome of every probe is folded into a [`RobotState`]; nothing a single
//! robot does can fail the report or reorder it.

use super::error::RelayError;
use super::relay::CommandRelay;
use super::Target;
use futures_util::future::join_all;
use serde::Serialize;
use serde_json::Value;

/// Classified outcome of one status probe.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RobotState {
    /// 2xx with a JSON body.
    Online { info: Value },
    /// The robot answered with a non-success status.
    ApplicationError { status_code: u16 },
    /// The probe never produced a usable answer.
    Unreachable { reason: String },
}

impl RobotState {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Online { .. } => "online",
            Self::ApplicationError { .. } => "application_error",
            Self::Unreachable { .. } => "unreachable",
        }
    }

    pub fn is_online(&self) -> bool {
        matches!(self, Self::Online { .. })
    }

    fn from_probe(result: Result<Value, RelayError>) -> Self {
        match result {
            Ok(info) => Self::Online { info },
            Err(RelayError::Downstream { status, .. }) => Self::ApplicationError {
                status_code: status.as_u16(),
            },
            Err(err @ RelayError::MalformedResponse { .. }) => Self::Unreachable {
                reason: err.to_string(),
            },
            Err(RelayError::Transport { message, .. }) => Self::Unreachable { reason: message },
        }
    }
}

/// One row of a [`FleetReport`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FleetEntry {
    pub name: String,
    pub host: String,
    pub port: u16,
    #[serde(flatten)]
    pub state: RobotState,
}

/// Per-robot status in configured order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FleetReport {
    pub entries: Vec<FleetEntry>,
}

impl FleetReport {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn online_count(&self) -> usize {
        self.entries.iter().filter(|e| e.state.is_online()).count()
    }
}

/// Aggregates status probes across the configured fleet.
pub struct FleetStatus<'a> {
    relay: &'a CommandRelay,
}

impl<'a> FleetStatus<'a> {
    pub fn new(relay: &'a CommandRelay) -> Self {
        Self { relay }
    }

    /// Probe every configured robot. Never fails as a whole.
    pub async fn report(&self) -> FleetReport {
        self.report_for(self.relay.fleet().targets()).await
    }

    /// Probe an explicit target list; entries follow `targets` order.
    pub async fn report_for(&self, targets: &[Target]) -> FleetReport {
        let probes = targets.iter().map(|target| self.probe(target));
        let entries = join_all(probes).await;

        let report = FleetReport { entries };
        tracing::debug!(
            robots = report.len(),
            online = report.online_count(),
            "Fleet status collected"
        );
        report
    }

    async fn probe(&self, target: &Target) -> FleetEntry {
        let state = RobotState::from_probe(self.relay.probe_status(target).await);
        tracing::debug!(robot = %target, state = state.label(), "Robot status probed");
        FleetEntry {
            name: target.name.clone(),
            host: target.host.clone(),
            port: target.port,
            state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::robot::Fleet;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn target_for(name: &str, server: &MockServer) -> Target {
        let addr = server.address();
        Target::new(name, addr.ip().to_string(), addr.port())
    }

    fn closed_port_target(name: &str) -> Target {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        Target::new(name, "127.0.0.1", port)
    }

    fn relay_for(targets: Vec<Target>) -> CommandRelay {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        CommandRelay::with_client(client, Fleet::new("127.0.0.1", 8000, targets))
            .with_fleet_status_timeout(Duration::from_millis(200))
    }

    #[test]
    fn entry_serializes_flat_with_status_tag() {
        let entry = FleetEntry {
            name: "Robot 1".into(),
            host: "localhost".into(),
            port: 8000,
            state: RobotState::ApplicationError { status_code: 503 },
        };
        assert_eq!(
            serde_json::to_value(&entry).unwrap(),
            json!({
                "name": "Robot 1",
                "host": "localhost",
                "port": 8000,
                "status": "application_error",
                "status_code": 503
            })
        );
    }

    #[test]
    fn report_serializes_as_array() {
        let report = FleetReport { entries: vec![] };
        assert_eq!(serde_json::to_value(&report).unwrap(), json!([]));
    }

    #[tokio::test]
    async fn mixed_fleet_is_classified_per_robot_in_order() {
        let online = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "Alpha"})))
            .mount(&online)
            .await;

        let failing = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&failing)
            .await;

        let slow = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({}))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&slow)
            .await;

        let targets = vec![
            closed_port_target("Down"),
            target_for("Alpha", &online),
            target_for("Slow", &slow),
            target_for("Broken", &failing),
        ];
        let relay = relay_for(targets.clone());
        let report = FleetStatus::new(&relay).report().await;

        assert_eq!(report.len(), targets.len());
        let names: Vec<_> = report.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Down", "Alpha", "Slow", "Broken"]);

        assert!(matches!(report.entries[0].state, RobotState::Unreachable { .. }));
        assert_eq!(
            report.entries[1].state,
            RobotState::Online {
                info: json!({"name": "Alpha"})
            }
        );
        match &report.entries[2].state {
            RobotState::Unreachable { reason } => assert!(reason.contains("timed out")),
            other => panic!("expected timeout, got {other:?}"),
        }
        assert_eq!(
            report.entries[3].state,
            RobotState::ApplicationError { status_code: 503 }
        );
        assert_eq!(report.online_count(), 1);
    }

    #[tokio::test]
    async fn slow_robot_does_not_delay_report_beyond_its_timeout() {
        let slow = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
            .mount(&slow)
            .await;
        let fast = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .mount(&fast)
            .await;

        let relay = relay_for(vec![target_for("Slow", &slow), target_for("Fast", &fast)]);
        let started = std::time::Instant::now();
        let report = FleetStatus::new(&relay).report().await;

        assert!(started.elapsed() < Duration::from_secs(2));
        assert!(!report.entries[0].state.is_online());
        assert!(report.entries[1].state.is_online());
    }

    #[tokio::test]
    async fn malformed_status_body_is_unreachable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let relay = relay_for(vec![target_for("Garbled", &server)]);
        let report = FleetStatus::new(&relay).report().await;
        match &report.entries[0].state {
            RobotState::Unreachable { reason } => assert!(reason.contains("malformed")),
            other => panic!("expected unreachable, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_fleet_yields_empty_report() {
        let relay = relay_for(vec![]);
        let report = FleetStatus::new(&relay).report().await;
        assert!(report.is_empty());
    }
}
