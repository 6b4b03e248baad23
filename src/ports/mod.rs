// Ports - Interface definitions (contracts)

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::domain::model::SourceMetadata;
use crate::error::{FrameXError, FrameXResult};
use crate::planner::TransformPlan;

/// Default number of frame chunks buffered between decoder and demuxer
pub const DEFAULT_CHUNK_CAPACITY: usize = 4;

/// Port for media file probing
#[async_trait]
pub trait ProbePort: Send + Sync {
    /// Probe the first video stream of `path`
    async fn probe_source(&self, path: &Path) -> FrameXResult<SourceMetadata>;
}

/// Port for decode backends producing a raw RGB24 stream
#[async_trait]
pub trait DecodePort: Send + Sync {
    /// Start decoding; chunks flow through the returned session
    async fn start(&self, request: DecodeRequest) -> FrameXResult<DecodeSession>;
}

/// Everything a decode backend needs for one call
#[derive(Debug, Clone)]
pub struct DecodeRequest {
    pub input: PathBuf,
    pub plan: TransformPlan,
    /// Bound on chunks buffered ahead of the consumer
    pub chunk_capacity: usize,
}

impl DecodeRequest {
    pub fn new(input: impl Into<PathBuf>, plan: TransformPlan) -> Self {
        Self {
            input: input.into(),
            plan,
            chunk_capacity: DEFAULT_CHUNK_CAPACITY,
        }
    }

    pub fn with_chunk_capacity(mut self, capacity: usize) -> Self {
        self.chunk_capacity = capacity.max(1);
        self
    }
}

/// Consumer side of a running decode.
///
/// The producer task pushes `frame_size`-aligned chunks into a bounded
/// channel and blocks when it is full. Its result reports the decoder's exit.
/// Dropping the session aborts the producer.
pub struct DecodeSession {
    chunks: mpsc::Receiver<Vec<u8>>,
    producer: JoinHandle<FrameXResult<()>>,
}

impl DecodeSession {
    pub fn new(chunks: mpsc::Receiver<Vec<u8>>, producer: JoinHandle<FrameXResult<()>>) -> Self {
        Self { chunks, producer }
    }

    /// Next chunk, `None` once the producer has finished sending
    pub async fn next_chunk(&mut self) -> Option<Vec<u8>> {
        self.chunks.recv().await
    }

    /// Wait for the producer and surface its outcome
    pub async fn finish(mut self) -> FrameXResult<()> {
        self.chunks.close();
        match (&mut self.producer).await {
            Ok(result) => result,
            Err(e) => Err(FrameXError::decode(format!("decode task failed: {}", e), "")),
        }
    }

    /// Stop decoding without waiting for the producer's outcome
    pub fn cancel(self) {
        debug!("Cancelling decode session");
    }
}

impl Drop for DecodeSession {
    fn drop(&mut self) {
        // Backends own their child process inside the task, so this kills it.
        self.producer.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_finish_reports_producer_error() {
        let (tx, rx) = mpsc::channel(1);
        let producer = tokio::spawn(async move {
            drop(tx);
            Err(FrameXError::decode("exited abnormally", "bad input"))
        });
        let mut session = DecodeSession::new(rx, producer);
        assert!(session.next_chunk().await.is_none());
        assert!(matches!(session.finish().await, Err(FrameXError::Decode { .. })));
    }

    #[tokio::test]
    async fn test_dropping_session_aborts_producer() {
        let (tx, rx) = mpsc::channel::<Vec<u8>>(1);
        let (done_tx, done_rx) = tokio::sync::oneshot::channel::<()>();
        let producer = tokio::spawn(async move {
            let _tx = tx;
            let _done = done_tx;
            std::future::pending::<()>().await;
            Ok::<(), FrameXError>(())
        });
        DecodeSession::new(rx, producer).cancel();
        // The aborted task drops its oneshot sender.
        assert!(done_rx.await.is_err());
    }

    #[test]
    fn test_chunk_capacity_is_at_least_one() {
        let plan = TransformPlan {
            target_width: 2,
            target_height: 2,
            window: Default::default(),
            filters: vec![],
            max_frames: None,
        };
        let request = DecodeRequest::new("a.mp4", plan).with_chunk_capacity(0);
        assert_eq!(request.chunk_capacity, 1);
    }
}
