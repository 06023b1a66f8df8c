use super::error::RelayError;
use super::params::{BeepParams, DriveParams, ImageFormat, ImageParams, MotionParams};
use super::{Fleet, Target};
use crate::config::RelayConfig;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

/// Drive/turn endpoints that share the `speed` + `duration` query contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
    Left,
    Right,
}

impl Direction {
    pub fn path(self) -> &'static str {
        match self {
            Self::Forward => "/forward",
            Self::Backward => "/backward",
            Self::Left => "/left",
            Self::Right => "/right",
        }
    }

    /// Default speed: linear for drives, angular for turns.
    pub fn default_params(self) -> MotionParams {
        match self {
            Self::Forward | Self::Backward => MotionParams::linear(),
            Self::Left | Self::Right => MotionParams::angular(),
        }
    }
}

/// Raw camera frame relayed from `/image`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedImage {
    pub format: ImageFormat,
    pub data: Vec<u8>,
}

impl CapturedImage {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// `data:<mime>;base64,<payload>`
    pub fn to_data_uri(&self) -> String {
        use base64::Engine;
        let encoded = base64::engine::general_purpose::STANDARD.encode(&self.data);
        format!("data:{};base64,{encoded}", self.format.mime_type())
    }
}

/// Typed relay of robot actions.
///
/// Each operation issues exactly one HTTP request and never retries. Success
/// payloads are passed through as opaque JSON.
#[derive(Debug, Clone)]
pub struct CommandRelay {
    client: reqwest::Client,
    fleet: Fleet,
    fleet_status_timeout: Duration,
    max_image_bytes: usize,
}

impl CommandRelay {
    pub fn from_config(config: &RelayConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.effective_timeout_secs()))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs.max(1)))
            .redirect(reqwest::redirect::Policy::none())
            .build()?;
        Ok(Self {
            client,
            fleet: Fleet::from_config(config),
            fleet_status_timeout: Duration::from_millis(config.fleet_status_timeout_ms),
            max_image_bytes: config.max_image_bytes,
        })
    }

    /// Build around an existing client. Used by tests to inject short timeouts.
    pub fn with_client(client: reqwest::Client, fleet: Fleet) -> Self {
        let defaults = RelayConfig::default();
        Self {
            client,
            fleet,
            fleet_status_timeout: Duration::from_millis(defaults.fleet_status_timeout_ms),
            max_image_bytes: defaults.max_image_bytes,
        }
    }

    pub fn with_fleet_status_timeout(mut self, timeout: Duration) -> Self {
        self.fleet_status_timeout = timeout;
        self
    }

    pub fn with_max_image_bytes(mut self, max: usize) -> Self {
        self.max_image_bytes = max;
        self
    }

    pub fn fleet(&self) -> &Fleet {
        &self.fleet
    }

    pub fn fleet_status_timeout(&self) -> Duration {
        self.fleet_status_timeout
    }

    pub fn max_image_bytes(&self) -> usize {
        self.max_image_bytes
    }

    pub async fn move_forward(
        &self,
        target: &Target,
        params: MotionParams,
    ) -> Result<Value, RelayError> {
        self.motion(target, Direction::Forward, params).await
    }

    pub async fn move_backward(
        &self,
        target: &Target,
        params: MotionParams,
    ) -> Result<Value, RelayError> {
        self.motion(target, Direction::Backward, params).await
    }

    pub async fn turn_left(
        &self,
        target: &Target,
        params: MotionParams,
    ) -> Result<Value, RelayError> {
        self.motion(target, Direction::Left, params).await
    }

    pub async fn turn_right(
        &self,
        target: &Target,
        params: MotionParams,
    ) -> Result<Value, RelayError> {
        self.motion(target, Direction::Right, params).await
    }

    pub async fn motion(
        &self,
        target: &Target,
        direction: Direction,
        params: MotionParams,
    ) -> Result<Value, RelayError> {
        self.get_json(target, direction.path(), Some(&params)).await
    }

    pub async fn stop(&self, target: &Target) -> Result<Value, RelayError> {
        self.get_json::<()>(target, "/stop", None).await
    }

    pub async fn beep(&self, target: &Target, params: BeepParams) -> Result<Value, RelayError> {
        self.get_json(target, "/beep", Some(&params)).await
    }

    pub async fn drive(&self, target: &Target, params: DriveParams) -> Result<Value, RelayError> {
        let url = target.url("/drive");
        tracing::debug!(robot = %target, url = %url, "Relaying POST");
        let request = self.client.post(&url).json(&params);
        let bytes = self.send(target, request).await?;
        parse_json(target, &bytes)
    }

    pub async fn status(&self, target: &Target) -> Result<Value, RelayError> {
        self.get_json::<()>(target, "/", None).await
    }

    pub async fn capture_image(
        &self,
        target: &Target,
        params: ImageParams,
    ) -> Result<CapturedImage, RelayError> {
        let url = target.url("/image");
        tracing::debug!(robot = %target, url = %url, format = %params.format, "Relaying GET");
        let request = self.client.get(&url).query(&params);
        let mut response = self.checked_response(target, request).await?;

        let locator = target.locator();
        let limit = self.max_image_bytes;
        let too_large = || RelayError::MalformedResponse {
            target: locator.clone(),
            detail: format!("image body exceeds the {limit} byte limit"),
        };
        let limit_u64 = u64::try_from(limit).unwrap_or(u64::MAX);
        if limit > 0 && response.content_length().is_some_and(|len| len > limit_u64) {
            tracing::warn!(robot = %target, limit, "Camera image too large");
            return Err(too_large());
        }

        let mut data = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| RelayError::from_transport(&locator, &e))?
        {
            if limit > 0 && data.len() + chunk.len() > limit {
                tracing::warn!(robot = %target, limit, "Camera image too large");
                return Err(too_large());
            }
            data.extend_from_slice(&chunk);
        }

        Ok(CapturedImage {
            format: params.format,
            data,
        })
    }

    /// Status probe bounded by the fleet timeout rather than the relay timeout.
    pub(crate) async fn probe_status(&self, target: &Target) -> Result<Value, RelayError> {
        let request = self
            .client
            .get(target.url("/"))
            .timeout(self.fleet_status_timeout);
        let bytes = self.send(target, request).await?;
        parse_json(target, &bytes)
    }

    async fn get_json<Q: Serialize + ?Sized>(
        &self,
        target: &Target,
        path: &str,
        query: Option<&Q>,
    ) -> Result<Value, RelayError> {
        let url = target.url(path);
        tracing::debug!(robot = %target, url = %url, "Relaying GET");
        let mut request = self.client.get(&url);
        if let Some(query) = query {
            request = request.query(query);
        }
        let bytes = self.send(target, request).await?;
        parse_json(target, &bytes)
    }

    /// Send one request and read the whole body.
    async fn send(
        &self,
        target: &Target,
        request: reqwest::RequestBuilder,
    ) -> Result<Vec<u8>, RelayError> {
        let response = self.checked_response(target, request).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| RelayError::from_transport(&target.locator(), &e))?;
        Ok(bytes.to_vec())
    }

    /// Send one request; non-2xx becomes [`RelayError::Downstream`].
    async fn checked_response(
        &self,
        target: &Target,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, RelayError> {
        let locator = target.locator();
        let response = request
            .send()
            .await
            .map_err(|e| RelayError::from_transport(&locator, &e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(robot = %target, status = status.as_u16(), "Robot rejected request");
            return Err(RelayError::downstream(&locator, status, &body));
        }
        Ok(response)
    }
}

fn parse_json(target: &Target, bytes: &[u8]) -> Result<Value, RelayError> {
    serde_json::from_slice(bytes).map_err(|e| RelayError::MalformedResponse {
        target: target.locator(),
        detail: format!("expected JSON body: {e}"),
    })
}
