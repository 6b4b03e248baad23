//! Raw RGB24 stream demultiplexing
//!
//! The decoder emits frames back to back with no header or delimiter, so
//! framing is purely `frame_size`-aligned chunking. Input may arrive in
//! arbitrary pieces; bytes are held until a full frame is available. A
//! trailing partial frame is dropped at [`FrameDemuxer::finish`].

use tracing::debug;

use crate::engine::frame::{Frame, FrameSequence};
use crate::error::FrameXResult;
use crate::output::FrameWriter;
use crate::planner::FrameGeometry;

/// Incremental splitter from raw bytes to shaped frames
pub struct FrameDemuxer {
    geometry: FrameGeometry,
    frame_size: usize,
    max_frames: Option<usize>,
    writer: Option<FrameWriter>,
    pending: Vec<u8>,
    frames: Vec<Frame>,
}

impl FrameDemuxer {
    pub fn new(geometry: FrameGeometry, max_frames: Option<usize>) -> FrameXResult<Self> {
        let frame_size = geometry.frame_size()?;
        Ok(Self {
            geometry,
            frame_size,
            max_frames,
            writer: None,
            pending: Vec::new(),
            frames: Vec::new(),
        })
    }

    /// Persist every emitted frame through `writer`
    pub fn with_writer(mut self, writer: FrameWriter) -> Self {
        self.writer = Some(writer);
        self
    }

    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// True once the frame cap has been reached
    pub fn is_saturated(&self) -> bool {
        self.max_frames.map_or(false, |max| self.frames.len() >= max)
    }

    /// Feed raw bytes; returns the number of frames emitted by this call
    pub fn push(&mut self, mut bytes: &[u8]) -> FrameXResult<usize> {
        let before = self.frames.len();

        if !self.pending.is_empty() {
            let needed = self.frame_size - self.pending.len();
            let take = needed.min(bytes.len());
            self.pending.extend_from_slice(&bytes[..take]);
            bytes = &bytes[take..];
            if self.pending.len() < self.frame_size {
                return Ok(0);
            }
            let chunk = std::mem::take(&mut self.pending);
            self.emit(chunk)?;
        }

        while !self.is_saturated() && bytes.len() >= self.frame_size {
            let (chunk, rest) = bytes.split_at(self.frame_size);
            self.emit(chunk.to_vec())?;
            bytes = rest;
        }

        if !self.is_saturated() {
            self.pending.extend_from_slice(bytes);
        }
        Ok(self.frames.len() - before)
    }

    /// Feed an owned chunk, avoiding a copy when it is exactly one frame
    pub fn push_chunk(&mut self, chunk: Vec<u8>) -> FrameXResult<usize> {
        if self.pending.is_empty() && chunk.len() == self.frame_size {
            if self.is_saturated() {
                return Ok(0);
            }
            self.emit(chunk)?;
            return Ok(1);
        }
        self.push(&chunk)
    }

    /// Close the stream, discarding any incomplete trailing frame
    pub fn finish(self) -> FrameSequence {
        if !self.pending.is_empty() {
            debug!(
                "Discarding {} trailing byte(s) short of a {}-byte frame",
                self.pending.len(),
                self.frame_size
            );
        }
        FrameSequence::new(self.frames)
    }

    /// Split a complete in-memory buffer in one call
    pub fn demux_buffer(
        buffer: &[u8],
        geometry: FrameGeometry,
        max_frames: Option<usize>,
        writer: Option<FrameWriter>,
    ) -> FrameXResult<FrameSequence> {
        let mut demuxer = Self::new(geometry, max_frames)?;
        if let Some(writer) = writer {
            demuxer = demuxer.with_writer(writer);
        }
        demuxer.push(buffer)?;
        Ok(demuxer.finish())
    }

    fn emit(&mut self, chunk: Vec<u8>) -> FrameXResult<()> {
        let frame = Frame::from_raw(self.frames.len() + 1, self.geometry, chunk)?;
        if let Some(writer) = &self.writer {
            writer.write(&frame)?;
        }
        self.frames.push(frame);
        Ok(())
    }
}
