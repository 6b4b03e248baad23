//! Transform plan construction

use tracing::{debug, warn};

use crate::domain::model::{ProcessingConfig, SourceMetadata, TimeSpec};
use crate::domain::rules::ConfigRules;
use crate::error::{FrameXError, FrameXResult};
use crate::planner::{FilterOp, TimeWindow, TransformPlan};

/// Derives target dimensions and the ordered filter chain
pub struct TransformPlanner;

impl TransformPlanner {
    pub fn new() -> Self {
        Self
    }

    /// Build the plan for `source` under `config`
    pub fn plan(&self, source: &SourceMetadata, config: &ProcessingConfig) -> FrameXResult<TransformPlan> {
        let (target_width, target_height) = self.target_dimensions(source, config)?;
        let window = self.time_window(config)?;

        let mut filters = Vec::new();
        if let Some(offset) = window.start {
            filters.push(FilterOp::ResetTimestamps { offset });
        }
        // Sampling runs before scaling so dropped frames are never resized.
        if let Some(fps) = config.fps {
            ConfigRules::validate_fps(fps)?;
            filters.push(FilterOp::SampleRate { fps });
        }
        if config.resize_scale.is_some() || config.resize_dims.is_some() {
            filters.push(FilterOp::Scale {
                width: target_width,
                height: target_height,
            });
        }

        let plan = TransformPlan {
            target_width,
            target_height,
            window,
            filters,
            max_frames: config.max_frames,
        };
        plan.frame_size()?;

        debug!(
            "Planned {}x{} -> {}x{} with {} filter(s)",
            source.width,
            source.height,
            plan.target_width,
            plan.target_height,
            plan.filters.len()
        );
        Ok(plan)
    }

    /// Scale wins over explicit dimensions; without either the source size is kept
    pub fn target_dimensions(&self, source: &SourceMetadata, config: &ProcessingConfig) -> FrameXResult<(u32, u32)> {
        let (width, height) = if let Some(scale) = config.resize_scale {
            ConfigRules::validate_resize_scale(scale)?;
            if config.resize_dims.is_some() {
                warn!("Both resize_scale and resize_dims set; using resize_scale {}", scale);
            }
            (
                (source.width as f64 * scale).floor() as u32,
                (source.height as f64 * scale).floor() as u32,
            )
        } else if let Some((width, height)) = config.resize_dims {
            ConfigRules::validate_resize_dims(width, height)?;
            (width, height)
        } else {
            (source.width, source.height)
        };

        if width == 0 || height == 0 {
            return Err(FrameXError::configuration(format!(
                "target dimensions collapse to {}x{} for a {}x{} source",
                width, height, source.width, source.height
            )));
        }
        Ok((width, height))
    }

    fn time_window(&self, config: &ProcessingConfig) -> FrameXResult<TimeWindow> {
        let (start, end) = config.time_window()?;
        let duration = end.map(|end| {
            TimeSpec::from_seconds(end.seconds - start.map_or(0.0, |s| s.seconds))
        });
        Ok(TimeWindow { start, duration })
    }
}

impl Default for TransformPlanner {
    fn default() -> Self {
        Self::new()
    }
}
