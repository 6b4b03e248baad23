//! CLI module for FrameX
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod args;
pub mod commands;

pub use args::{ExtractArgs, ProbeArgs, ReportFormatArg};

/// FrameX video frame extractor
///
/// Samples frames from a video through ffmpeg, optionally resizing them and
/// writing each one to disk as JPEG.
#[derive(Parser, Debug)]
#[command(name = "framex")]
#[command(about = "FrameX - sample RGB frames from video files")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Logging level (error, warn, info, debug, trace)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log output format (pretty, compact, json)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Settings file (defaults to ./framex.toml when present)
    #[arg(long, global = true, env = "FRAMEX_CONFIG")]
    pub config: Option<PathBuf>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract frames from a video file
    Extract(args::ExtractArgs),
    /// Show the video stream properties of a file
    Probe(args::ProbeArgs),
}
