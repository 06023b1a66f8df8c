use anyhow::{Context, Result};
use directories::UserDirs;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::fs;

// ── Top-level config ──────────────────────────────────────────────

/// Top-level relay configuration, loaded from `config.toml`.
///
/// Resolution order: explicit path → `~/.robot-relay/config.toml` → built-in defaults.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RelayConfig {
    /// Path to config.toml - computed at load time, not serialized
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Host used when a tool call does not name one. Default: `"localhost"`.
    #[serde(default = "default_host")]
    pub default_host: String,

    /// Port of the robot targeted when a tool call omits `port`. Default: `8000`.
    #[serde(default = "default_port")]
    pub default_port: u16,

    /// Per-request timeout for relayed actions in seconds (default: 30)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// TCP connect timeout in seconds (default: 10)
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Per-robot bound on the fleet status probe in milliseconds (default: 1000)
    #[serde(default = "default_fleet_status_timeout_ms")]
    pub fleet_status_timeout_ms: u64,

    /// Largest camera frame inlined into a tool result (default: 5 MiB)
    #[serde(default = "default_max_image_bytes")]
    pub max_image_bytes: usize,

    /// Statically configured fleet (`[[robots]]`).
    #[serde(default = "default_robots")]
    pub robots: Vec<RobotEntryConfig>,

    /// Hosts tool calls may address besides `default_host` and the robots'
    /// own hosts. Supports `*.example.com` and `*`. Default: empty.
    #[serde(default)]
    pub allowed_hosts: Vec<String>,
}

/// One `[[robots]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RobotEntryConfig {
    /// Human-readable display name
    pub name: String,
    /// Robot API port
    pub port: u16,
    /// Robot API host; falls back to `default_host` when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
}

impl RobotEntryConfig {
    pub fn new(name: impl Into<String>, port: u16) -> Self {
        Self {
            name: name.into(),
            port,
            host: None,
        }
    }
}

fn default_host() -> String {
    "localhost".into()
}

fn default_port() -> u16 {
    8000
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_fleet_status_timeout_ms() -> u64 {
    1_000
}

fn default_max_image_bytes() -> usize {
    5 * 1024 * 1024
}

fn default_robots() -> Vec<RobotEntryConfig> {
    vec![
        RobotEntryConfig::new("Robot 1", 8000),
        RobotEntryConfig::new("Robot 2", 8001),
    ]
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            config_path: PathBuf::new(),
            default_host: default_host(),
            default_port: default_port(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            fleet_status_timeout_ms: default_fleet_status_timeout_ms(),
            max_image_bytes: default_max_image_bytes(),
            robots: default_robots(),
            allowed_hosts: Vec::new(),
        }
    }
}

impl RelayConfig {
    /// `~/.robot-relay/config.toml`
    pub fn default_path() -> Result<PathBuf> {
        let home = UserDirs::new()
            .map(|u| u.home_dir().to_path_buf())
            .context("Could not find home directory")?;
        Ok(home.join(".robot-relay").join("config.toml"))
    }

    /// Load from the default location, falling back to defaults when no file exists.
    pub async fn load() -> Result<Self> {
        let path = Self::default_path()?;
        Self::load_or_default(&path).await
    }

    /// Load `path` if it exists, otherwise start from defaults. Env overrides
    /// and validation run in both cases.
    pub async fn load_or_default(path: &Path) -> Result<Self> {
        let exists = fs::try_exists(path).await.unwrap_or(false);
        let mut config = if exists {
            let contents = fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            toml::from_str::<RelayConfig>(&contents)
                .with_context(|| format!("Failed to parse config file {}", path.display()))?
        } else {
            RelayConfig::default()
        };
        config.config_path = path.to_path_buf();

        config.apply_env_overrides();
        config.validate()?;
        tracing::info!(
            path = %config.config_path.display(),
            robots = config.robots.len(),
            initialized = !exists,
            "Config loaded"
        );
        Ok(config)
    }

    /// Environment overrides: `ROBOT_RELAY_DEFAULT_HOST`, `ROBOT_RELAY_DEFAULT_PORT`,
    /// `ROBOT_RELAY_TIMEOUT_SECS`, `ROBOT_RELAY_FLEET_TIMEOUT_MS`.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("ROBOT_RELAY_DEFAULT_HOST") {
            let host = host.trim();
            if !host.is_empty() {
                self.default_host = host.to_string();
            }
        }

        if let Ok(port) = std::env::var("ROBOT_RELAY_DEFAULT_PORT") {
            match port.trim().parse::<u16>() {
                Ok(p) => self.default_port = p,
                Err(_) => {
                    tracing::warn!(value = %port, "Ignoring invalid ROBOT_RELAY_DEFAULT_PORT");
                }
            }
        }

        if let Ok(secs) = std::env::var("ROBOT_RELAY_TIMEOUT_SECS") {
            match secs.trim().parse::<u64>() {
                Ok(s) => self.timeout_secs = s,
                Err(_) => {
                    tracing::warn!(value = %secs, "Ignoring invalid ROBOT_RELAY_TIMEOUT_SECS");
                }
            }
        }

        if let Ok(ms) = std::env::var("ROBOT_RELAY_FLEET_TIMEOUT_MS") {
            match ms.trim().parse::<u64>() {
                Ok(v) => self.fleet_status_timeout_ms = v,
                Err(_) => {
                    tracing::warn!(value = %ms, "Ignoring invalid ROBOT_RELAY_FLEET_TIMEOUT_MS");
                }
            }
        }
    }

    /// Validate configuration values that would cause runtime failures.
    pub fn validate(&self) -> Result<()> {
        if self.default_host.trim().is_empty() {
            anyhow::bail!("default_host must not be empty");
        }
        if self.default_port == 0 {
            anyhow::bail!("default_port must be greater than 0");
        }
        if self.fleet_status_timeout_ms == 0 {
            anyhow::bail!("fleet_status_timeout_ms must be greater than 0");
        }

        let mut names = HashSet::new();
        let mut locators = HashSet::new();
        for (i, robot) in self.robots.iter().enumerate() {
            let name = robot.name.trim();
            if name.is_empty() {
                anyhow::bail!("robots[{i}].name must not be empty");
            }
            if robot.port == 0 {
                anyhow::bail!("robots[{i}].port must be greater than 0");
            }
            if robot.host.as_deref().is_some_and(|h| h.trim().is_empty()) {
                anyhow::bail!("robots[{i}].host must not be empty when set");
            }
            if !names.insert(name.to_ascii_lowercase()) {
                anyhow::bail!("robots[{i}].name '{name}' is duplicated");
            }
            let locator = format!("{}:{}", self.robot_host(robot), robot.port);
            if !locators.insert(locator.clone()) {
                anyhow::bail!("robots[{i}] duplicates locator {locator}");
            }
        }

        Ok(())
    }

    /// Effective host of a configured robot.
    pub fn robot_host<'a>(&'a self, robot: &'a RobotEntryConfig) -> &'a str {
        robot
            .host
            .as_deref()
            .map(str::trim)
            .unwrap_or(self.default_host.as_str())
    }

    /// Relay request timeout with the zero guard applied.
    pub fn effective_timeout_secs(&self) -> u64 {
        if self.timeout_secs == 0 {
            tracing::warn!("timeout_secs is 0, using safe default of 30s");
            default_timeout_secs()
        } else {
            self.timeout_secs
        }
    }

    /// JSON Schema of the config file, for documentation and editor tooling.
    pub fn json_schema() -> serde_json::Value {
        let schema = schemars::schema_for!(RelayConfig);
        serde_json::to_value(schema).unwrap_or(serde_json::Value::Null)
    }
}
