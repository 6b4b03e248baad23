//! JPEG frame writer

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;
use tracing::{debug, info};

use crate::engine::frame::Frame;
use crate::error::{FrameXError, FrameXResult};
use crate::output::frame_file_name;

/// Default JPEG quality for persisted frames
pub const DEFAULT_JPEG_QUALITY: u8 = 75;

/// Writes frames as `frame_NNNNNN.jpg` into one directory.
///
/// Callers running concurrent extractions must give each its own directory;
/// colliding names are overwritten.
#[derive(Debug, Clone)]
pub struct FrameWriter {
    dir: PathBuf,
    quality: u8,
}

impl FrameWriter {
    /// Create a writer, creating `dir` if needed
    pub fn new(dir: impl Into<PathBuf>) -> FrameXResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| FrameXError::Persistence {
            path: dir.clone(),
            message: format!("cannot create output directory: {}", e),
        })?;
        info!("Persisting frames to {}", dir.display());
        Ok(Self {
            dir,
            quality: DEFAULT_JPEG_QUALITY,
        })
    }

    /// Set JPEG quality, clamped to the encoder's 1..=100 range
    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality.clamp(1, 100);
        self
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }

    /// Target path for a frame
    pub fn path_for(&self, frame: &Frame) -> PathBuf {
        self.dir.join(frame_file_name(frame.index()))
    }

    /// Encode and write one frame immediately
    pub fn write(&self, frame: &Frame) -> FrameXResult<PathBuf> {
        let path = self.path_for(frame);
        let persistence_error = |message: String| FrameXError::Persistence {
            path: path.clone(),
            message,
        };

        let file = File::create(&path).map_err(|e| persistence_error(e.to_string()))?;
        let mut out = BufWriter::new(file);
        JpegEncoder::new_with_quality(&mut out, self.quality)
            .encode(frame.as_raw(), frame.width(), frame.height(), ExtendedColorType::Rgb8)
            .map_err(|e| persistence_error(e.to_string()))?;
        out.flush().map_err(|e| persistence_error(e.to_string()))?;

        debug!("Wrote frame {} to {}", frame.index(), path.display());
        Ok(path)
    }
}
