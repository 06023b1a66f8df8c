//! # Robot Relay
//!
//! Exposes a fleet of HTTP-controlled robots as agent tools.
//!
//! Every robot runs the same small control API on its own port. Each tool call
//! becomes exactly one HTTP request against the addressed robot, and the
//! robot's answer (or a classified failure) becomes the tool result.
//!
//! ```text
//! agent ──tool call──▶ tools::* ──typed call──▶ robot::CommandRelay ──HTTP──▶ robot :8000
//!                                                     │                        robot :8001
//!                                                     └── FleetStatus (fan-out, per-robot timeout)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use robot_relay::{tools, RelayConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = RelayConfig::load().await?;
//!     let tools = tools::tools_from_config(&config)?;
//!
//!     let result = tools::dispatch(
//!         &tools,
//!         "drive_forward",
//!         serde_json::json!({ "speed": 0.5, "duration": 2.0 }),
//!     )
//!     .await?;
//!     println!("{}", result.output);
//!     Ok(())
//! }
//! ```

#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::doc_markdown,
    clippy::float_cmp,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::needless_pass_by_value,
    clippy::return_self_not_must_use,
    clippy::similar_names,
    clippy::too_many_lines,
    clippy::uninlined_format_args,
    clippy::unnecessary_literal_bound,
    clippy::unused_self
)]
#![forbid(unsafe_code)]

pub mod config;
pub mod robot;
pub mod tools;

pub use config::RelayConfig;
pub use robot::{
    CapturedImage, CommandRelay, Fleet, FleetReport, FleetStatus, RelayError, RelayErrorKind,
    RobotInfo, RobotState, Target,
};
pub use tools::{Tool, ToolResult, ToolSpec};
