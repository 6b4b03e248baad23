// Domain rules - Parameter policies shared by config validation and planning

use crate::domain::model::TimeSpec;
use crate::error::{FrameXError, FrameXResult};


/// Range and consistency rules for extraction parameters
pub struct ConfigRules;

impl ConfigRules {
    /// Scale must lie in (0, 1]; out-of-range values are rejected, never clamped
    pub fn validate_resize_scale(scale: f64) -> FrameXResult<()> {
        if scale.is_nan() || scale <= 0.0 || scale > 1.0 {
            return Err(FrameXError::configuration(format!(
                "resize_scale must be between 0 (exclusive) and 1 (inclusive), got {}",
                scale
            )));
        }
        Ok(())
    }

    pub fn validate_resize_dims(width: u32, height: u32) -> FrameXResult<()> {
        if width == 0 || height == 0 {
            return Err(FrameXError::configuration(format!(
                "resize_dims must be non-zero, got {}x{}",
                width, height
            )));
        }
        Ok(())
    }

    pub fn validate_fps(fps: f64) -> FrameXResult<()> {
        if !fps.is_finite() || fps <= 0.0 {
            return Err(FrameXError::configuration(format!(
                "fps must be a positive number, got {}",
                fps
            )));
        }
        Ok(())
    }

    /// The window end must lie strictly after its start
    pub fn validate_window(start: TimeSpec, end: TimeSpec) -> FrameXResult<()> {
        if end.seconds < start.seconds {
            return Err(FrameXError::validation(format!(
                "end_time ({}) precedes start_time ({})",
                end, start
            )));
        }
        if end.seconds == start.seconds {
            return Err(FrameXError::validation(format!(
                "time window starting at {} is empty",
                start
            )));
        }
        Ok(())
    }
}
