// Domain use cases - The extraction contract offered to downstream consumers

use std::path::Path;

use async_trait::async_trait;

use crate::domain::model::ProcessingConfig;
use crate::engine::frame::FrameSequence;
use crate::error::FrameXResult;

/// Extract an ordered, fixed-shape frame sequence from a video file.
///
/// Analysis and prompting collaborators depend on this trait only; the
/// concrete implementation is [`crate::app::ExtractInteractor`].
#[async_trait]
pub trait FrameExtractor: Send + Sync {
    async fn extract(&self, path: &Path, config: &ProcessingConfig) -> FrameXResult<FrameSequence>;
}
