//! Command-line argument definitions

use std::path::PathBuf;

use clap::{Args, ValueEnum};

use crate::app::ReportFormat;

/// Arguments for the extract command
#[derive(Args, Debug, Clone)]
pub struct ExtractArgs {
    /// Input video file path
    #[arg(short, long)]
    pub input: PathBuf,

    /// Write every frame to this directory as frame_NNNNNN.jpg
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Frames sampled per second of video
    #[arg(long, conflicts_with = "native_fps")]
    pub fps: Option<f64>,

    /// Keep every decoded frame instead of sampling
    #[arg(long)]
    pub native_fps: bool,

    /// Uniform scale factor in (0, 1]; takes precedence over --width/--height
    #[arg(long)]
    pub scale: Option<f64>,

    /// Target frame width in pixels
    #[arg(long, requires = "height")]
    pub width: Option<u32>,

    /// Target frame height in pixels
    #[arg(long, requires = "width")]
    pub height: Option<u32>,

    /// Start time (HH:MM:SS.fff, MM:SS.fff, or seconds)
    #[arg(short, long)]
    pub start: Option<String>,

    /// End time (HH:MM:SS.fff, MM:SS.fff, or seconds)
    #[arg(short, long)]
    pub end: Option<String>,

    /// Stop after this many frames
    #[arg(short = 'n', long)]
    pub max_frames: Option<usize>,

    /// Abort when extraction takes longer than this many seconds
    #[arg(long)]
    pub timeout: Option<f64>,

    /// JPEG quality for written frames (1-100)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub jpeg_quality: Option<u8>,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the probe command
#[derive(Args, Debug, Clone)]
pub struct ProbeArgs {
    /// Input video file path
    #[arg(short, long)]
    pub input: PathBuf,

    /// Report format
    #[arg(long, value_enum, default_value_t = ReportFormatArg::Text)]
    pub format: ReportFormatArg,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormatArg {
    Text,
    Json,
    Yaml,
}

impl From<ReportFormatArg> for ReportFormat {
    fn from(format: ReportFormatArg) -> Self {
        match format {
            ReportFormatArg::Text => ReportFormat::Text,
            ReportFormatArg::Json => ReportFormat::Json,
            ReportFormatArg::Yaml => ReportFormat::Yaml,
        }
    }
}
