use reqwest::StatusCode;
use serde::Serialize;
use thiserror::Error;

/// Longest downstream error body kept in a [`RelayError::Downstream`].
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Failure of a single relayed robot call.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The robot could not be reached at all (refused, DNS, timeout).
    #[error("robot at {target} is unreachable: {message}")]
    Transport {
        target: String,
        message: String,
        timed_out: bool,
    },

    /// The robot answered with a non-success status code.
    #[error("robot at {target} responded with HTTP {status}{}", format_body(.body))]
    Downstream {
        target: String,
        status: StatusCode,
        body: String,
    },

    /// The robot answered but the body could not be interpreted.
    #[error("robot at {target} returned a malformed response: {detail}")]
    MalformedResponse { target: String, detail: String },
}

fn format_body(body: &str) -> String {
    if body.is_empty() {
        String::new()
    } else {
        format!(": {body}")
    }
}

/// Stable classification of a [`RelayError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RelayErrorKind {
    TransportError,
    DownstreamApplicationError,
    MalformedResponse,
}

impl RelayErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TransportError => "transport_error",
            Self::DownstreamApplicationError => "downstream_application_error",
            Self::MalformedResponse => "malformed_response",
        }
    }
}

impl std::fmt::Display for RelayErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl RelayError {
    pub fn kind(&self) -> RelayErrorKind {
        match self {
            Self::Transport { .. } => RelayErrorKind::TransportError,
            Self::Downstream { .. } => RelayErrorKind::DownstreamApplicationError,
            Self::MalformedResponse { .. } => RelayErrorKind::MalformedResponse,
        }
    }

    /// Downstream status code, when the robot answered with one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Downstream { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport { timed_out: true, .. })
    }

    /// Classify a reqwest error raised while sending or reading a response.
    pub(crate) fn from_transport(target: &str, err: &reqwest::Error) -> Self {
        if err.is_decode() {
            return Self::MalformedResponse {
                target: target.to_string(),
                detail: err.to_string(),
            };
        }
        let timed_out = err.is_timeout();
        let message = if timed_out {
            "request timed out".to_string()
        } else if err.is_connect() {
            format!("connection failed: {}", root_cause(err))
        } else {
            root_cause(err)
        };
        Self::Transport {
            target: target.to_string(),
            message,
            timed_out,
        }
    }

    pub(crate) fn downstream(target: &str, status: StatusCode, body: &str) -> Self {
        let body = body.trim();
        let body = if body.chars().count() > MAX_ERROR_BODY_CHARS {
            let mut truncated: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
            truncated.push_str("...");
            truncated
        } else {
            body.to_string()
        };
        Self::Downstream {
            target: target.to_string(),
            status,
            body,
        }
    }

    /// `"<kind>: <detail>"`, the form relayed to the agent.
    pub fn to_tool_error(&self) -> String {
        format!("{}: {self}", self.kind())
    }
}

/// Innermost error message; reqwest wraps hyper/io errors several levels deep.
fn root_cause(err: &(dyn std::error::Error + 'static)) -> String {
    let mut current = err;
    while let Some(source) = current.source() {
        current = source;
    }
    current.to_string()
}
