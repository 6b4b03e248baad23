// TOML config adapter - Settings document loaded from a TOML file

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{FrameXError, FrameXResult};
use crate::output::writer::DEFAULT_JPEG_QUALITY;
use crate::ports::DEFAULT_CHUNK_CAPACITY;
use crate::utils::LoggingConfig;

/// Name of the settings file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "framex.toml";

/// Complete application settings
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub extraction: ExtractionSettings,
    pub decoder: DecoderSettings,
    pub logging: LoggingConfig,
}

/// Defaults applied to every extraction request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionSettings {
    /// Sampling rate; absent keeps the native frame rate
    pub fps: Option<f64>,
    pub max_frames: Option<usize>,
    pub jpeg_quality: u8,
    pub output_dir: Option<PathBuf>,
}

/// External decoder setup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderSettings {
    pub ffmpeg_path: PathBuf,
    pub ffprobe_path: PathBuf,
    /// Frame chunks buffered between decoder and demuxer
    pub chunk_capacity: usize,
    /// Per-extraction limit; absent means unbounded
    pub timeout_secs: Option<f64>,
}

impl Default for ExtractionSettings {
    fn default() -> Self {
        Self {
            fps: Some(1.0),
            max_frames: None,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            output_dir: None,
        }
    }
}

impl Default for DecoderSettings {
    fn default() -> Self {
        Self {
            ffmpeg_path: PathBuf::from("ffmpeg"),
            ffprobe_path: PathBuf::from("ffprobe"),
            chunk_capacity: DEFAULT_CHUNK_CAPACITY,
            timeout_secs: None,
        }
    }
}

impl DecoderSettings {
    pub fn timeout(&self) -> FrameXResult<Option<Duration>> {
        match self.timeout_secs {
            None => Ok(None),
            Some(secs) if secs.is_finite() && secs > 0.0 => Ok(Some(Duration::from_secs_f64(secs))),
            Some(secs) => Err(FrameXError::configuration(format!(
                "decoder timeout must be positive, got {}",
                secs
            ))),
        }
    }
}

/// TOML configuration adapter
pub struct TomlConfigAdapter;

impl TomlConfigAdapter {
    /// Parse a settings document
    pub fn parse(content: &str) -> FrameXResult<AppSettings> {
        toml::from_str(content)
            .map_err(|e| FrameXError::configuration(format!("Failed to parse TOML config: {}", e)))
    }

    /// Load settings from `path`
    pub fn load(path: &Path) -> FrameXResult<AppSettings> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            FrameXError::configuration(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        let settings = Self::parse(&content)?;
        info!("Loaded configuration from {}", path.display());
        Ok(settings)
    }

    /// Load `framex.toml` from `dir` if present
    pub fn load_default(dir: &Path) -> FrameXResult<Option<AppSettings>> {
        let path = dir.join(DEFAULT_CONFIG_FILE);
        if !path.is_file() {
            debug!("No {} in {}", DEFAULT_CONFIG_FILE, dir.display());
            return Ok(None);
        }
        Self::load(&path).map(Some)
    }

    /// Render settings back to TOML
    pub fn serialize(settings: &AppSettings) -> FrameXResult<String> {
        toml::to_string_pretty(settings)
            .map_err(|e| FrameXError::configuration(format!("Failed to serialize config: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{LogFormat, LogLevel};
    use tempfile::TempDir;

    #[test]
    fn test_empty_document_yields_defaults() {
        let settings = TomlConfigAdapter::parse("").unwrap();
        assert_eq!(settings, AppSettings::default());
        assert_eq!(settings.extraction.fps, Some(1.0));
        assert_eq!(settings.decoder.ffmpeg_path, PathBuf::from("ffmpeg"));
    }

    #[test]
    fn test_partial_sections_merge_with_defaults() {
        let settings = TomlConfigAdapter::parse(
            r#"
            [extraction]
            fps = 2.5
            jpeg_quality = 90

            [decoder]
            ffmpeg_path = "/opt/ffmpeg/bin/ffmpeg"
            timeout_secs = 30

            [logging]
            level = "debug"
            format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(settings.extraction.fps, Some(2.5));
        assert_eq!(settings.extraction.jpeg_quality, 90);
        assert_eq!(settings.decoder.ffmpeg_path, PathBuf::from("/opt/ffmpeg/bin/ffmpeg"));
        assert_eq!(settings.decoder.ffprobe_path, PathBuf::from("ffprobe"));
        assert_eq!(settings.decoder.timeout().unwrap(), Some(Duration::from_secs(30)));
        assert_eq!(settings.logging.level, LogLevel::Debug);
        assert_eq!(settings.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_malformed_document_is_configuration_error() {
        let result = TomlConfigAdapter::parse("[extraction\nfps = ");
        assert!(matches!(result, Err(FrameXError::Configuration { .. })));
    }

    #[test]
    fn test_negative_timeout_rejected() {
        let decoder = DecoderSettings {
            timeout_secs: Some(-1.0),
            ..Default::default()
        };
        assert!(decoder.timeout().is_err());
    }

    #[test]
    fn test_load_default_file() {
        let temp_dir = TempDir::new().unwrap();
        assert!(TomlConfigAdapter::load_default(temp_dir.path()).unwrap().is_none());

        let mut settings = AppSettings::default();
        settings.extraction.max_frames = Some(12);
        std::fs::write(
            temp_dir.path().join(DEFAULT_CONFIG_FILE),
            TomlConfigAdapter::serialize(&settings).unwrap(),
        )
        .unwrap();

        let loaded = TomlConfigAdapter::load_default(temp_dir.path()).unwrap().unwrap();
        assert_eq!(loaded.extraction.max_frames, Some(12));
    }
}
