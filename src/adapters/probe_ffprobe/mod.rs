//! FFprobe adapter for media file probing
//!
//! Runs `ffprobe` with JSON output and reads the first video stream.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;
use tracing::{debug, info};

use crate::domain::model::{SourceMetadata, TimeSpec};
use crate::error::{FrameXError, FrameXResult};
use crate::ports::ProbePort;

/// FFprobe-based probe adapter
#[derive(Debug, Clone)]
pub struct FFprobeAdapter {
    binary: PathBuf,
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
    format: Option<ProbeFormat>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    codec_type: Option<String>,
    codec_name: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    avg_frame_rate: Option<String>,
    r_frame_rate: Option<String>,
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProbeFormat {
    format_name: Option<String>,
    duration: Option<String>,
}

impl FFprobeAdapter {
    /// Create adapter using `ffprobe` from PATH
    pub fn new() -> Self {
        Self::with_binary("ffprobe")
    }

    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    fn build_args(path: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = [
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_streams",
            "-show_format",
        ]
        .iter()
        .map(|arg| OsString::from(*arg))
        .collect();
        args.push(path.as_os_str().to_owned());
        args
    }

    /// Turn ffprobe's JSON document into source metadata
    pub fn parse_output(path: &Path, json: &[u8]) -> FrameXResult<SourceMetadata> {
        let output: ProbeOutput = serde_json::from_slice(json).map_err(|e| {
            FrameXError::unusable_source(path, format!("unreadable probe output: {}", e))
        })?;

        let stream = output
            .streams
            .iter()
            .find(|s| s.codec_type.as_deref() == Some("video"))
            .ok_or_else(|| FrameXError::unusable_source(path, "no video stream found"))?;

        let (width, height) = match (stream.width, stream.height) {
            (Some(w), Some(h)) if w > 0 && h > 0 => (w, h),
            _ => {
                return Err(FrameXError::unusable_source(
                    path,
                    "video stream reports no frame dimensions",
                ))
            }
        };

        let mut metadata = SourceMetadata::new(
            width,
            height,
            stream.codec_name.clone().unwrap_or_else(|| "unknown".to_string()),
        );
        metadata.frame_rate = stream
            .avg_frame_rate
            .as_deref()
            .and_then(parse_rational)
            .or_else(|| stream.r_frame_rate.as_deref().and_then(parse_rational));
        metadata.duration = stream
            .duration
            .as_deref()
            .or_else(|| output.format.as_ref().and_then(|f| f.duration.as_deref()))
            .and_then(|d| d.parse::<f64>().ok())
            .map(TimeSpec::from_seconds);
        metadata.container = output.format.and_then(|f| f.format_name);

        Ok(metadata)
    }
}

impl Default for FFprobeAdapter {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse ffprobe's `num/den` rates; `0/0` means unknown
fn parse_rational(value: &str) -> Option<f64> {
    let rate = match value.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.trim().parse().ok()?;
            let den: f64 = den.trim().parse().ok()?;
            if den == 0.0 {
                return None;
            }
            num / den
        }
        None => value.trim().parse().ok()?,
    };
    (rate.is_finite() && rate > 0.0).then_some(rate)
}

#[async_trait]
impl ProbePort for FFprobeAdapter {
    async fn probe_source(&self, path: &Path) -> FrameXResult<SourceMetadata> {
        info!("Probing {}", path.display());

        let file_info = tokio::fs::metadata(path)
            .await
            .map_err(|e| FrameXError::unusable_source(path, format!("cannot open input: {}", e)))?;
        if !file_info.is_file() {
            return Err(FrameXError::unusable_source(path, "input is not a regular file"));
        }

        let output = Command::new(&self.binary)
            .args(Self::build_args(path))
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                FrameXError::decode(
                    format!("failed to run {}: {}", self.binary.display(), e),
                    "",
                )
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(FrameXError::unusable_source(
                path,
                format!("ffprobe could not read the file: {}", stderr.trim()),
            ));
        }

        let metadata = Self::parse_output(path, &output.stdout)?;
        debug!("Probe result: {:?}", metadata);
        info!(
            "Source video: {}x{} {} @ {}",
            metadata.width,
            metadata.height,
            metadata.codec,
            metadata
                .frame_rate
                .map(|r| format!("{:.3} fps", r))
                .unwrap_or_else(|| "unknown rate".to_string())
        );
        Ok(metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "streams": [
            { "index": 0, "codec_type": "audio", "codec_name": "aac" },
            {
                "index": 1,
                "codec_type": "video",
                "codec_name": "h264",
                "width": 1920,
                "height": 1080,
                "avg_frame_rate": "30000/1001",
                "r_frame_rate": "30000/1001",
                "duration": "10.010000"
            }
        ],
        "format": { "format_name": "mov,mp4,m4a,3gp,3g2,mj2", "duration": "10.050000" }
    }"#;

    #[test]
    fn test_parse_picks_first_video_stream() {
        let metadata = FFprobeAdapter::parse_output(Path::new("in.mp4"), SAMPLE.as_bytes()).unwrap();
        assert_eq!((metadata.width, metadata.height), (1920, 1080));
        assert_eq!(metadata.codec, "h264");
        assert!((metadata.frame_rate.unwrap() - 29.97).abs() < 0.01);
        assert_eq!(metadata.duration, Some(TimeSpec::from_seconds(10.01)));
        assert_eq!(metadata.container.as_deref(), Some("mov,mp4,m4a,3gp,3g2,mj2"));
    }

    #[test]
    fn test_parse_without_video_stream_is_source_error() {
        let json = r#"{ "streams": [ { "codec_type": "audio" } ], "format": {} }"#;
        let err = FFprobeAdapter::parse_output(Path::new("song.m4a"), json.as_bytes()).unwrap_err();
        assert!(matches!(err, FrameXError::Source { .. }));
        assert!(err.to_string().contains("no video stream"));
    }

    #[test]
    fn test_parse_falls_back_to_format_duration_and_r_frame_rate() {
        let json = r#"{
            "streams": [ { "codec_type": "video", "width": 64, "height": 48,
                           "avg_frame_rate": "0/0", "r_frame_rate": "25/1" } ],
            "format": { "duration": "3.5" }
        }"#;
        let metadata = FFprobeAdapter::parse_output(Path::new("a.mkv"), json.as_bytes()).unwrap();
        assert_eq!(metadata.frame_rate, Some(25.0));
        assert_eq!(metadata.duration, Some(TimeSpec::from_seconds(3.5)));
        assert_eq!(metadata.codec, "unknown");
    }

    #[test]
    fn test_parse_rejects_dimensionless_stream() {
        let json = r#"{ "streams": [ { "codec_type": "video", "width": 0, "height": 48 } ] }"#;
        assert!(matches!(
            FFprobeAdapter::parse_output(Path::new("a.mkv"), json.as_bytes()),
            Err(FrameXError::Source { .. })
        ));
    }

    #[test]
    fn test_parse_rational() {
        assert_eq!(parse_rational("30/1"), Some(30.0));
        assert_eq!(parse_rational("0/0"), None);
        assert_eq!(parse_rational("24"), Some(24.0));
        assert_eq!(parse_rational("x/1"), None);
    }

    #[tokio::test]
    async fn test_missing_file_is_source_error() {
        let adapter = FFprobeAdapter::new();
        let err = adapter
            .probe_source(Path::new("/definitely/not/here.mp4"))
            .await
            .unwrap_err();
        assert!(matches!(err, FrameXError::Source { .. }));
    }

    #[tokio::test]
    async fn test_directory_is_source_error() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let err = FFprobeAdapter::new().probe_source(temp_dir.path()).await.unwrap_err();
        assert!(matches!(err, FrameXError::Source { .. }));
    }
}
