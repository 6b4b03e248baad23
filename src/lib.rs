//! FrameX Video Frame Extractor Library
//!
//! Samples RGB frames from a video file by driving an external `ffmpeg`
//! process that writes a raw `rgb24` stream to a pipe. The stream is split
//! into fixed-size chunks, each shaped as a `(height, width, 3)` array.
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! use framex::adapters::{FFmpegAdapter, FFprobeAdapter};
//! use framex::{ExtractInteractor, FrameExtractor, ProcessingConfig};
//!
//! # async fn run() -> framex::FrameXResult<()> {
//! let extractor = ExtractInteractor::new(Arc::new(FFprobeAdapter::new()), Arc::new(FFmpegAdapter::new()));
//! let config = ProcessingConfig::new().with_resize_scale(0.5).with_end_time("00:00:10");
//! let frames = extractor.extract(Path::new("talk.mp4"), &config).await?;
//! println!("{} frames of shape {:?}", frames.len(), frames.shape());
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod engine;
pub mod error;
pub mod output;
pub mod planner;
pub mod ports;
pub mod utils;

// Re-export commonly used types
pub use app::{ExtractInteractor, ExtractRequest, ExtractResponse};
pub use domain::model::{ProcessingConfig, SourceMetadata, TimeSpec};
pub use domain::usecases::FrameExtractor;
pub use engine::{Frame, FrameSequence};
pub use error::{FrameXError, FrameXResult};
