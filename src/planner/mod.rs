//! Stream transform planning
//!
//! Turns a [`ProcessingConfig`](crate::domain::model::ProcessingConfig) and the
//! probed [`SourceMetadata`](crate::domain::model::SourceMetadata) into a
//! request-scoped [`TransformPlan`]. Planning is pure: no I/O, no shared state.

use serde::{Deserialize, Serialize};

use crate::domain::model::TimeSpec;
use crate::error::{FrameXError, FrameXResult};

pub mod transform;

pub use transform::TransformPlanner;

/// Bytes per pixel of the interleaved RGB24 stream
pub const RGB24_CHANNELS: usize = 3;

/// A single decode-pipeline filter, applied in plan order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FilterOp {
    /// Rebase timestamps so the window starts at zero
    ResetTimestamps { offset: TimeSpec },
    /// Keep `fps` frames per second of video
    SampleRate { fps: f64 },
    /// Resize to exact pixel dimensions
    Scale { width: u32, height: u32 },
}

/// Input-stage time window
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    /// Seek offset into the source
    pub start: Option<TimeSpec>,
    /// Clip duration bound measured from `start` (or zero)
    pub duration: Option<TimeSpec>,
}

impl TimeWindow {
    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.duration.is_none()
    }
}

/// Output geometry of the raw RGB24 stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameGeometry {
    pub width: u32,
    pub height: u32,
}

impl FrameGeometry {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Bytes in one frame chunk, `width * height * 3`
    pub fn frame_size(&self) -> FrameXResult<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)
            .and_then(|pixels| pixels.checked_mul(RGB24_CHANNELS))
            .filter(|size| *size > 0)
            .ok_or_else(|| {
                FrameXError::configuration(format!(
                    "frame geometry {}x{} does not yield a usable frame size",
                    self.width, self.height
                ))
            })
    }

    /// Array shape of one frame, (height, width, channels)
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.height as usize, self.width as usize, RGB24_CHANNELS)
    }
}

/// Complete transformation plan for one extraction call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformPlan {
    pub target_width: u32,
    pub target_height: u32,
    pub window: TimeWindow,
    /// Ordered filter chain
    pub filters: Vec<FilterOp>,
    /// Frame cap forwarded to the decoder
    pub max_frames: Option<usize>,
}

impl TransformPlan {
    pub fn geometry(&self) -> FrameGeometry {
        FrameGeometry::new(self.target_width, self.target_height)
    }

    pub fn frame_size(&self) -> FrameXResult<usize> {
        self.geometry().frame_size()
    }

    pub fn has_filter(&self, predicate: impl Fn(&FilterOp) -> bool) -> bool {
        self.filters.iter().any(predicate)
    }
}
