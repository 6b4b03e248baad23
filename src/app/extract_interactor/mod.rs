// Extract interactor - Orchestrates the frame extraction use case

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::domain::model::{ProcessingConfig, SourceMetadata};
use crate::domain::usecases::FrameExtractor;
use crate::engine::{FrameDemuxer, FrameSequence};
use crate::error::{FrameXError, FrameXResult};
use crate::output::writer::DEFAULT_JPEG_QUALITY;
use crate::output::FrameWriter;
use crate::planner::{TransformPlan, TransformPlanner};
use crate::ports::{DecodePort, DecodeRequest, DecodeSession, ProbePort, DEFAULT_CHUNK_CAPACITY};

/// Tuning knobs that are not part of a single request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractOptions {
    pub chunk_capacity: usize,
    pub jpeg_quality: u8,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            chunk_capacity: DEFAULT_CHUNK_CAPACITY,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

/// Request for frame extraction
#[derive(Debug, Clone)]
pub struct ExtractRequest {
    pub input: PathBuf,
    pub config: ProcessingConfig,
}

impl ExtractRequest {
    pub fn new(input: impl Into<PathBuf>, config: ProcessingConfig) -> Self {
        Self {
            input: input.into(),
            config,
        }
    }
}

/// Response from frame extraction
#[derive(Debug)]
pub struct ExtractResponse {
    pub source: SourceMetadata,
    pub plan: TransformPlan,
    pub frames: FrameSequence,
    /// Frames written to `output_dir`, zero when persistence is off
    pub persisted: usize,
    pub elapsed: Duration,
}

/// Interactor for the frame extraction use case
pub struct ExtractInteractor {
    probe_port: Arc<dyn ProbePort>,
    decode_port: Arc<dyn DecodePort>,
    planner: TransformPlanner,
    options: ExtractOptions,
}

impl ExtractInteractor {
    /// Create new extract interactor with injected ports
    pub fn new(probe_port: Arc<dyn ProbePort>, decode_port: Arc<dyn DecodePort>) -> Self {
        Self {
            probe_port,
            decode_port,
            planner: TransformPlanner::new(),
            options: ExtractOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ExtractOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> ExtractOptions {
        self.options
    }

    /// Execute frame extraction
    ///
    /// The configured timeout bounds probing and decoding together. When it
    /// fires, the in-flight decode session is dropped, which stops the
    /// decoder, and [`FrameXError::Timeout`] is returned.
    pub async fn execute(&self, request: ExtractRequest) -> FrameXResult<ExtractResponse> {
        let started = Instant::now();
        request.config.validate()?;

        info!("Extracting frames from {}", request.input.display());

        let mut response = match request.config.timeout {
            Some(limit) => tokio::time::timeout(limit, self.run(&request))
                .await
                .map_err(|_| {
                    warn!("Extraction exceeded {:.3}s; decoder stopped", limit.as_secs_f64());
                    FrameXError::Timeout {
                        elapsed: started.elapsed(),
                    }
                })??,
            None => self.run(&request).await?,
        };
        response.elapsed = started.elapsed();

        info!(
            "Extracted {} frame(s) at {}x{} in {:.2}s",
            response.frames.len(),
            response.plan.target_width,
            response.plan.target_height,
            response.elapsed.as_secs_f64()
        );
        Ok(response)
    }

    async fn run(&self, request: &ExtractRequest) -> FrameXResult<ExtractResponse> {
        let source = self.probe_port.probe_source(&request.input).await?;
        let plan = self.planner.plan(&source, &request.config)?;

        let mut demuxer = FrameDemuxer::new(plan.geometry(), plan.max_frames)?;
        let persisting = match &request.config.output_dir {
            Some(dir) => {
                let writer = FrameWriter::new(dir)?.with_quality(self.options.jpeg_quality);
                demuxer = demuxer.with_writer(writer);
                true
            }
            None => false,
        };

        if demuxer.is_saturated() {
            info!("max_frames is 0; skipping decode");
            return Ok(ExtractResponse {
                source,
                plan,
                frames: FrameSequence::default(),
                persisted: 0,
                elapsed: Duration::ZERO,
            });
        }

        let decode_request = DecodeRequest::new(&request.input, plan.clone())
            .with_chunk_capacity(self.options.chunk_capacity);
        let session = self.decode_port.start(decode_request).await?;
        let frames = Self::drain(session, demuxer).await?;

        if frames.is_empty() {
            return Err(FrameXError::decode(
                "decoder produced no complete frame",
                "the requested window may lie beyond the end of the video",
            ));
        }

        let persisted = if persisting { frames.len() } else { 0 };
        Ok(ExtractResponse {
            source,
            plan,
            frames,
            persisted,
            elapsed: Duration::ZERO,
        })
    }

    /// Pull chunks until the stream ends or the frame cap is reached
    async fn drain(mut session: DecodeSession, mut demuxer: FrameDemuxer) -> FrameXResult<FrameSequence> {
        while let Some(chunk) = session.next_chunk().await {
            demuxer.push_chunk(chunk)?;
            if demuxer.is_saturated() {
                break;
            }
        }

        if demuxer.is_saturated() {
            debug!("Frame cap of {} reached", demuxer.frame_count());
            session.cancel();
        } else {
            session.finish().await?;
        }
        Ok(demuxer.finish())
    }
}

#[async_trait]
impl FrameExtractor for ExtractInteractor {
    async fn extract(&self, path: &Path, config: &ProcessingConfig) -> FrameXResult<FrameSequence> {
        let response = self
            .execute(ExtractRequest::new(path, config.clone()))
            .await?;
        Ok(response.frames)
    }
}
