// Domain models - Core types and data structures

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::rules::ConfigRules;
use crate::error::{FrameXError, FrameXResult};


/// Time specification with precision - represents time in seconds with fractional precision
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct TimeSpec {
    pub seconds: f64,
}

impl TimeSpec {
    /// Create a new TimeSpec from seconds
    pub fn from_seconds(seconds: f64) -> Self {
        Self { seconds }
    }

    pub fn zero() -> Self {
        Self { seconds: 0.0 }
    }

    pub fn as_seconds(&self) -> f64 {
        self.seconds
    }

    /// Parse `HH:MM:SS[.fff]`, `MM:SS[.fff]` or plain seconds
    pub fn parse(time_str: &str) -> FrameXResult<Self> {
        let trimmed = time_str.trim();
        let invalid = |reason: &str| {
            FrameXError::configuration(format!("invalid time '{}': {}", time_str, reason))
        };

        if trimmed.is_empty() {
            return Err(invalid("empty time string"));
        }

        if !trimmed.contains(':') {
            let seconds = trimmed
                .parse::<f64>()
                .map_err(|_| invalid("expected HH:MM:SS[.fff]"))?;
            if !seconds.is_finite() || seconds < 0.0 {
                return Err(invalid("time cannot be negative"));
            }
            return Ok(Self::from_seconds(seconds));
        }

        let parts: Vec<&str> = trimmed.split(':').collect();
        let (hours, minutes, seconds_part) = match parts.as_slice() {
            [m, s] => (0u32, *m, *s),
            [h, m, s] => (
                h.parse::<u32>().map_err(|_| invalid("invalid hours"))?,
                *m,
                *s,
            ),
            _ => return Err(invalid("expected HH:MM:SS[.fff]")),
        };

        let minutes = minutes
            .parse::<u32>()
            .map_err(|_| invalid("invalid minutes"))?;
        let seconds = seconds_part
            .parse::<f64>()
            .map_err(|_| invalid("invalid seconds"))?;

        // Components are summed, so `00:00:75` is 75 seconds.
        if !seconds.is_finite() || seconds < 0.0 {
            return Err(invalid("seconds cannot be negative"));
        }

        Ok(Self::from_seconds(
            hours as f64 * 3600.0 + minutes as f64 * 60.0 + seconds,
        ))
    }

    /// Format as HH:MM:SS.fff
    pub fn format_hms(&self) -> String {
        let total_millis = (self.seconds * 1000.0).round() as u64;
        let hours = total_millis / 3_600_000;
        let minutes = (total_millis % 3_600_000) / 60_000;
        let seconds = (total_millis % 60_000) / 1000;
        let millis = total_millis % 1000;
        format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, seconds, millis)
    }
}

impl fmt::Display for TimeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_hms())
    }
}

/// Declarative frame extraction parameters.
///
/// `resize_scale` and `resize_dims` are alternatives: when both are set the
/// scale wins. Validation is deferred to [`ProcessingConfig::validate`] and to
/// the planner so partially specified configurations can be composed first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Exact output size as (width, height)
    pub resize_dims: Option<(u32, u32)>,
    /// Scale factor in (0, 1]
    pub resize_scale: Option<f64>,
    /// Frames sampled per second of video
    pub fps: Option<f64>,
    /// Window start, `HH:MM:SS[.fff]`
    pub start_time: Option<String>,
    /// Window end, `HH:MM:SS[.fff]`
    pub end_time: Option<String>,
    /// Cap on emitted frames
    pub max_frames: Option<usize>,
    /// Directory receiving `frame_NNNNNN.jpg` files
    pub output_dir: Option<PathBuf>,
    /// Deadline for the whole extraction call
    #[serde(with = "optional_secs")]
    pub timeout: Option<Duration>,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            resize_dims: None,
            resize_scale: None,
            fps: Some(1.0),
            start_time: None,
            end_time: None,
            max_frames: None,
            output_dir: None,
            timeout: None,
        }
    }
}

impl ProcessingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resize_dims(mut self, width: u32, height: u32) -> Self {
        self.resize_dims = Some((width, height));
        self
    }

    pub fn with_resize_scale(mut self, scale: f64) -> Self {
        self.resize_scale = Some(scale);
        self
    }

    pub fn with_fps(mut self, fps: Option<f64>) -> Self {
        self.fps = fps;
        self
    }

    pub fn with_start_time(mut self, start: impl Into<String>) -> Self {
        self.start_time = Some(start.into());
        self
    }

    pub fn with_end_time(mut self, end: impl Into<String>) -> Self {
        self.end_time = Some(end.into());
        self
    }

    pub fn with_max_frames(mut self, max_frames: usize) -> Self {
        self.max_frames = Some(max_frames);
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Check every field without touching the filesystem
    pub fn validate(&self) -> FrameXResult<()> {
        if let Some(scale) = self.resize_scale {
            ConfigRules::validate_resize_scale(scale)?;
        }
        if let Some((width, height)) = self.resize_dims {
            ConfigRules::validate_resize_dims(width, height)?;
        }
        if let Some(fps) = self.fps {
            ConfigRules::validate_fps(fps)?;
        }
        self.time_window()?;
        Ok(())
    }

    /// Parsed (start, end) pair; `end` must lie after `start`
    pub fn time_window(&self) -> FrameXResult<(Option<TimeSpec>, Option<TimeSpec>)> {
        let start = self.start_time.as_deref().map(TimeSpec::parse).transpose()?;
        let end = self.end_time.as_deref().map(TimeSpec::parse).transpose()?;
        if let Some(end) = end {
            ConfigRules::validate_window(start.unwrap_or_else(TimeSpec::zero), end)?;
        }
        Ok((start, end))
    }
}

mod optional_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => serializer.serialize_some(&d.as_secs_f64()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Duration>, D::Error> {
        let secs = Option::<f64>::deserialize(deserializer)?;
        match secs {
            Some(s) if s.is_finite() && s > 0.0 => Ok(Some(Duration::from_secs_f64(s))),
            Some(s) => Err(serde::de::Error::custom(format!("timeout must be positive, got {}", s))),
            None => Ok(None),
        }
    }
}

/// Geometry and stream facts of the probed source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// Width of the first video stream in pixels
    pub width: u32,
    /// Height of the first video stream in pixels
    pub height: u32,
    pub codec: String,
    pub frame_rate: Option<f64>,
    pub duration: Option<TimeSpec>,
    pub container: Option<String>,
}

impl SourceMetadata {
    pub fn new(width: u32, height: u32, codec: impl Into<String>) -> Self {
        Self {
            width,
            height,
            codec: codec.into(),
            frame_rate: None,
            duration: None,
            container: None,
        }
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }
}
