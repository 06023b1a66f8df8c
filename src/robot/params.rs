//! Request parameters for each robot action.
//!
//! Query/body structs serialize with `skip_serializing_if = "Option::is_none"`
//! so an omitted optional never reaches the robot, not even as an empty key.

use serde::{Deserialize, Serialize};

/// Default linear speed for forward/backward moves (m/s).
pub const DEFAULT_LINEAR_SPEED: f64 = 0.2;
/// Default angular speed for in-place turns (rad/s).
pub const DEFAULT_ANGULAR_SPEED: f64 = 1.2;
/// A4.
pub const DEFAULT_BEEP_FREQUENCY: f64 = 440.0;
pub const DEFAULT_BEEP_DURATION: f64 = 1.0;
pub const DEFAULT_BEEP_VOLUME: f64 = 0.5;
pub const DEFAULT_IMAGE_QUALITY: u8 = 90;

/// Query for `/forward`, `/backward`, `/left`, `/right`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MotionParams {
    pub speed: f64,
    /// Seconds; the robot keeps moving until stopped when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

impl MotionParams {
    pub fn linear() -> Self {
        Self {
            speed: DEFAULT_LINEAR_SPEED,
            duration: None,
        }
    }

    pub fn angular() -> Self {
        Self {
            speed: DEFAULT_ANGULAR_SPEED,
            duration: None,
        }
    }

    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_duration(mut self, duration: Option<f64>) -> Self {
        self.duration = duration;
        self
    }
}

/// Query for `/beep`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BeepParams {
    pub frequency: f64,
    pub duration: f64,
    /// 0.0 to 1.0
    pub volume: f64,
}

impl Default for BeepParams {
    fn default() -> Self {
        Self {
            frequency: DEFAULT_BEEP_FREQUENCY,
            duration: DEFAULT_BEEP_DURATION,
            volume: DEFAULT_BEEP_VOLUME,
        }
    }
}

/// JSON body for `POST /drive`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct DriveParams {
    /// m/s, positive is forward
    pub linear_velocity: f64,
    /// rad/s, positive is counter-clockwise
    pub angular_velocity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

/// Encodings the camera endpoint can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Jpeg,
    #[default]
    Png,
}

impl ImageFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }
}

impl std::fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ImageFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(Self::Jpeg),
            "png" => Ok(Self::Png),
            other => anyhow::bail!("Unsupported image format: {other}. Supported: jpeg, png"),
        }
    }
}

/// Query for `/image`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImageParams {
    pub format: ImageFormat,
    /// 1 to 100
    pub quality: u8,
}

impl Default for ImageParams {
    fn default() -> Self {
        Self {
            format: ImageFormat::default(),
            quality: DEFAULT_IMAGE_QUALITY,
        }
    }
}
