//! Configuration initialization and hierarchy management
//!
//! Settings are layered with increasing precedence: built-in defaults, the
//! TOML settings file, `FRAMEX_*` environment variables, then CLI flags.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};

use crate::adapters::toml_config::{AppSettings, TomlConfigAdapter};
use crate::cli::{Cli, Commands, ExtractArgs};
use crate::domain::model::ProcessingConfig;
use crate::error::{FrameXError, FrameXResult};

/// Resolve settings for this invocation: defaults, file, environment, CLI
pub fn initialize_configuration_hierarchy(cli: &Cli) -> Result<AppSettings> {
    let mut settings = load_config_file(cli.config.as_deref())?;
    apply_environment(&mut settings, |key| std::env::var(key).ok())
        .context("Invalid FRAMEX_* environment variable")?;
    apply_cli_overrides(&mut settings, cli).context("Invalid command-line flag")?;
    Ok(settings)
}

/// An explicit path must exist; otherwise `framex.toml` is optional
fn load_config_file(explicit: Option<&Path>) -> Result<AppSettings> {
    if let Some(path) = explicit {
        return TomlConfigAdapter::load(path)
            .with_context(|| format!("Cannot load settings from {}", path.display()));
    }
    let cwd = std::env::current_dir().context("Cannot determine working directory")?;
    Ok(TomlConfigAdapter::load_default(&cwd)?.unwrap_or_default())
}

/// Apply `FRAMEX_*` overrides read through `lookup`; returns how many applied
pub fn apply_environment<F>(settings: &mut AppSettings, lookup: F) -> FrameXResult<usize>
where
    F: Fn(&str) -> Option<String>,
{
    let mut applied = 0;
    let mut var = |key: &str| {
        let value = lookup(key).filter(|v| !v.trim().is_empty());
        if value.is_some() {
            applied += 1;
        }
        value
    };

    if let Some(level) = var("FRAMEX_LOG_LEVEL") {
        settings.logging.level = level.parse()?;
    }
    if let Some(format) = var("FRAMEX_LOG_FORMAT") {
        settings.logging.format = format.parse()?;
    }
    if let Some(path) = var("FRAMEX_FFMPEG") {
        settings.decoder.ffmpeg_path = PathBuf::from(path);
    }
    if let Some(path) = var("FRAMEX_FFPROBE") {
        settings.decoder.ffprobe_path = PathBuf::from(path);
    }
    if let Some(timeout) = var("FRAMEX_TIMEOUT") {
        settings.decoder.timeout_secs = Some(parse_env("FRAMEX_TIMEOUT", &timeout)?);
    }
    if let Some(fps) = var("FRAMEX_FPS") {
        settings.extraction.fps = match fps.trim() {
            "native" => None,
            value => Some(parse_env("FRAMEX_FPS", value)?),
        };
    }
    if let Some(max) = var("FRAMEX_MAX_FRAMES") {
        settings.extraction.max_frames = Some(parse_env("FRAMEX_MAX_FRAMES", &max)?);
    }
    if let Some(quality) = var("FRAMEX_JPEG_QUALITY") {
        settings.extraction.jpeg_quality = parse_env("FRAMEX_JPEG_QUALITY", &quality)?;
    }
    if let Some(dir) = var("FRAMEX_OUTPUT_DIR") {
        settings.extraction.output_dir = Some(PathBuf::from(dir));
    }

    Ok(applied)
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> FrameXResult<T>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| FrameXError::configuration(format!("{}='{}': {}", key, value, e)))
}

/// Apply CLI flags that feed settings rather than a single request
pub fn apply_cli_overrides(settings: &mut AppSettings, cli: &Cli) -> FrameXResult<()> {
    if let Some(level) = &cli.log_level {
        settings.logging.level = level.parse()?;
    }
    if let Some(format) = &cli.log_format {
        settings.logging.format = format.parse()?;
    }
    if let Commands::Extract(args) = &cli.command {
        if let Some(quality) = args.jpeg_quality {
            settings.extraction.jpeg_quality = quality;
        }
    }
    Ok(())
}

/// Merge extraction settings with the extract command's flags
pub fn build_processing_config(settings: &AppSettings, args: &ExtractArgs) -> FrameXResult<ProcessingConfig> {
    let defaults = &settings.extraction;

    let fps = if args.native_fps {
        None
    } else {
        args.fps.or(defaults.fps)
    };
    let timeout = match args.timeout {
        Some(secs) if secs.is_finite() && secs > 0.0 => Some(Duration::from_secs_f64(secs)),
        Some(secs) => {
            return Err(FrameXError::configuration(format!(
                "timeout must be positive, got {}",
                secs
            )))
        }
        None => settings.decoder.timeout()?,
    };

    let config = ProcessingConfig {
        resize_dims: args.width.zip(args.height),
        resize_scale: args.scale,
        fps,
        start_time: args.start.clone(),
        end_time: args.end.clone(),
        max_frames: args.max_frames.or(defaults.max_frames),
        output_dir: args.output_dir.clone().or_else(|| defaults.output_dir.clone()),
        timeout,
    };
    config.validate()?;
    Ok(config)
}
