//! Argument parsing shared by the robot tools.
//!
//! Agents are not strict about JSON types, so numeric arguments are accepted
//! either as JSON numbers or as numeric strings. Anything else is rejected
//! before a request is sent.

use super::traits::ToolResult;
use crate::robot::{Fleet, RelayError, Target};
use serde_json::{json, Value};

/// Resolve `port` / `host` arguments against the configured fleet.
pub(crate) fn target(fleet: &Fleet, args: &Value) -> anyhow::Result<Target> {
    let port = match number(args, "port")? {
        None => None,
        Some(raw) => {
            if raw.fract() != 0.0 || !(1.0..=65535.0).contains(&raw) {
                anyhow::bail!("Invalid 'port' parameter: {raw}. Expected an integer 1-65535");
            }
            Some(raw as u16)
        }
    };

    let host = match args.get("host") {
        None | Some(Value::Null) => None,
        Some(Value::String(h)) if h.trim().is_empty() => None,
        Some(Value::String(h)) => {
            let h = h.trim();
            if h.contains(['/', '?', '#', '@']) || h.chars().any(char::is_whitespace) {
                anyhow::bail!("Invalid 'host' parameter: expected a bare hostname or IP");
            }
            let bare = h
                .strip_prefix('[')
                .and_then(|b| b.strip_suffix(']'))
                .unwrap_or(h);
            if bare.contains(':') && bare.parse::<std::net::Ipv6Addr>().is_err() {
                anyhow::bail!(
                    "Invalid 'host' parameter: '{h}' must not carry a port; use 'port' instead"
                );
            }
            if !fleet.allows_host(bare) {
                anyhow::bail!(
                    "Host '{h}' is not a configured robot host; add it to allowed_hosts to use it"
                );
            }
            Some(bare)
        }
        Some(other) => anyhow::bail!("Invalid 'host' parameter: expected string, got {other}"),
    };

    Ok(fleet.resolve(host, port))
}

/// Optional finite number.
pub(crate) fn number(args: &Value, key: &str) -> anyhow::Result<Option<f64>> {
    let value = match args.get(key) {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
    };

    match value {
        Some(v) if v.is_finite() => Ok(Some(v)),
        _ => anyhow::bail!("Invalid '{key}' parameter: expected a finite number"),
    }
}

/// Optional number that must not be negative.
pub(crate) fn non_negative(args: &Value, key: &str) -> anyhow::Result<Option<f64>> {
    let value = number(args, key)?;
    if let Some(v) = value {
        if v < 0.0 {
            anyhow::bail!("Invalid '{key}' parameter: {v} must not be negative");
        }
    }
    Ok(value)
}

/// Optional number constrained to `min..=max`.
pub(crate) fn bounded(
    args: &Value,
    key: &str,
    min: f64,
    max: f64,
) -> anyhow::Result<Option<f64>> {
    let value = number(args, key)?;
    if let Some(v) = value {
        if !(min..=max).contains(&v) {
            anyhow::bail!("Invalid '{key}' parameter: {v} is outside {min}-{max}");
        }
    }
    Ok(value)
}

/// Optional string argument.
pub(crate) fn string<'a>(args: &'a Value, key: &str) -> anyhow::Result<Option<&'a str>> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(other) => anyhow::bail!("Invalid '{key}' parameter: expected string, got {other}"),
    }
}

/// Relay a JSON payload, or the classified error, back to the agent.
pub(crate) fn relay_result(result: Result<Value, RelayError>) -> ToolResult {
    match result {
        Ok(payload) => ToolResult::ok(payload.to_string()),
        Err(e) => ToolResult::failure(e.to_tool_error()),
    }
}

/// Schema properties every robot tool accepts.
pub(crate) fn target_properties(fleet: &Fleet) -> serde_json::Map<String, Value> {
    let mut props = serde_json::Map::new();
    let port_description = format!(
        "Port number of the robot API (default: {})",
        fleet.default_port()
    );
    props.insert(
        "port".into(),
        json!({
            "type": "integer",
            "description": port_description,
            "minimum": 1,
            "maximum": 65535,
            "default": fleet.default_port()
        }),
    );
    props.insert(
        "host".into(),
        json!({
            "type": "string",
            "description": format!("Host of the robot API (default: {})", fleet.default_host()),
            "default": fleet.default_host()
        }),
    );
    props
}

/// Object schema made of the target properties plus `extra`.
pub(crate) fn object_schema(fleet: &Fleet, extra: Value) -> Value {
    let mut props = target_properties(fleet);
    if let Value::Object(extra) = extra {
        props.extend(extra);
    }
    json!({
        "type": "object",
        "properties": props,
        "required": []
    })
}
