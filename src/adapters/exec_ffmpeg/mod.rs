//! FFmpeg execution adapter
//!
//! Runs `ffmpeg` as a child process emitting interleaved RGB24 on stdout.
//! A producer task reads stdout in `frame_size` chunks into a bounded channel,
//! so a slow consumer pauses the reads instead of growing a buffer. Stderr is
//! drained concurrently and attached to any decode error.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::error::{FrameXError, FrameXResult};
use crate::planner::{FilterOp, TransformPlan};
use crate::ports::{DecodePort, DecodeRequest, DecodeSession};

/// FFmpeg-based decode adapter
#[derive(Debug, Clone)]
pub struct FFmpegAdapter {
    binary: PathBuf,
}

/// How the stdout pump ended
#[derive(Debug, PartialEq, Eq)]
enum PumpOutcome {
    /// Decoder closed stdout after `bytes` bytes
    Exhausted { bytes: u64 },
    /// Receiver dropped; nothing more is wanted
    ConsumerGone,
}

impl FFmpegAdapter {
    /// Create adapter using `ffmpeg` from PATH
    pub fn new() -> Self {
        Self::with_binary("ffmpeg")
    }

    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Render the `-vf` filter graph in plan order
    pub fn filter_graph(plan: &TransformPlan) -> Option<String> {
        if plan.filters.is_empty() {
            return None;
        }
        let filters: Vec<String> = plan
            .filters
            .iter()
            .map(|op| match op {
                FilterOp::ResetTimestamps { .. } => "setpts=PTS-STARTPTS".to_string(),
                FilterOp::SampleRate { fps } => format!("fps={}", fps),
                FilterOp::Scale { width, height } => format!("scale={}:{}", width, height),
            })
            .collect();
        Some(filters.join(","))
    }

    /// Full ffmpeg argument list for one request
    pub fn build_args(input: &Path, plan: &TransformPlan) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-hide_banner".into(),
            "-nostdin".into(),
            "-loglevel".into(),
            "error".into(),
            // Keep stored orientation so frames match the probed geometry.
            "-noautorotate".into(),
        ];
        if let Some(start) = plan.window.start {
            args.push("-ss".into());
            args.push(format!("{:.3}", start.seconds).into());
        }
        args.push("-i".into());
        args.push(input.as_os_str().to_owned());

        if let Some(duration) = plan.window.duration {
            args.push("-t".into());
            args.push(format!("{:.3}", duration.seconds).into());
        }
        args.push("-map".into());
        args.push("0:v:0".into());
        if let Some(graph) = Self::filter_graph(plan) {
            args.push("-vf".into());
            args.push(graph.into());
        }
        if let Some(max_frames) = plan.max_frames {
            args.push("-frames:v".into());
            args.push(max_frames.to_string().into());
        }
        for arg in ["-f", "rawvideo", "-pix_fmt", "rgb24", "pipe:1"] {
            args.push(arg.into());
        }
        args
    }
}

impl Default for FFmpegAdapter {
    fn default() -> Self {
        Self::new()
    }
}

/// Fill up to `size` bytes; a shorter result means end of stream
async fn read_chunk<R: AsyncRead + Unpin>(reader: &mut R, size: usize) -> io::Result<Vec<u8>> {
    let mut buf = vec![0u8; size];
    let mut filled = 0;
    while filled < size {
        let n = reader.read(&mut buf[filled..]).await?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    buf.truncate(filled);
    Ok(buf)
}

/// Move `frame_size` chunks from `reader` into `tx` until EOF or the receiver goes away
async fn pump_chunks<R: AsyncRead + Unpin>(
    mut reader: R,
    frame_size: usize,
    tx: mpsc::Sender<Vec<u8>>,
) -> io::Result<PumpOutcome> {
    let mut bytes = 0u64;
    loop {
        let chunk = read_chunk(&mut reader, frame_size).await?;
        if chunk.is_empty() {
            return Ok(PumpOutcome::Exhausted { bytes });
        }
        let last = chunk.len() < frame_size;
        bytes += chunk.len() as u64;
        if tx.send(chunk).await.is_err() {
            return Ok(PumpOutcome::ConsumerGone);
        }
        if last {
            // Anything after a short read is trailing data the demuxer drops anyway.
            return Ok(PumpOutcome::Exhausted { bytes });
        }
    }
}

async fn drain_to_string<R: AsyncRead + Unpin>(mut reader: R) -> String {
    let mut buf = Vec::new();
    if let Err(e) = reader.read_to_end(&mut buf).await {
        debug!("Stopped reading decoder diagnostics: {}", e);
    }
    String::from_utf8_lossy(&buf).into_owned()
}

#[async_trait]
impl DecodePort for FFmpegAdapter {
    async fn start(&self, request: DecodeRequest) -> FrameXResult<DecodeSession> {
        let frame_size = request.plan.frame_size()?;
        let args = Self::build_args(&request.input, &request.plan);
        debug!(
            "Spawning {} {}",
            self.binary.display(),
            args.iter()
                .map(|a| a.to_string_lossy())
                .collect::<Vec<_>>()
                .join(" ")
        );

        let mut child = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                FrameXError::decode(format!("failed to start {}: {}", self.binary.display(), e), "")
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| FrameXError::decode("decoder stdout was not captured", ""))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| FrameXError::decode("decoder stderr was not captured", ""))?;

        info!(
            "Decoding {} to {}x{} RGB24 ({} bytes per frame)",
            request.input.display(),
            request.plan.target_width,
            request.plan.target_height,
            frame_size
        );

        let (tx, rx) = mpsc::channel(request.chunk_capacity.max(1));
        let binary = self.binary.display().to_string();
        let producer = tokio::spawn(async move {
            let diagnostics = tokio::spawn(drain_to_string(stderr));

            // The child stays owned by this task; dropping it kills the process.
            let outcome = pump_chunks(stdout, frame_size, tx).await;
            let bytes = match outcome {
                Ok(PumpOutcome::ConsumerGone) => {
                    debug!("Consumer stopped reading; terminating {}", binary);
                    return Ok(());
                }
                Ok(PumpOutcome::Exhausted { bytes }) => bytes,
                Err(e) => {
                    let _ = child.start_kill();
                    let diagnostics = diagnostics.await.unwrap_or_default();
                    return Err(FrameXError::decode(
                        format!("failed reading decoder output: {}", e),
                        diagnostics,
                    ));
                }
            };

            let status = child.wait().await.map_err(FrameXError::Io)?;
            let diagnostics = diagnostics.await.unwrap_or_default();
            if !status.success() {
                return Err(FrameXError::Decode {
                    message: format!("{} exited abnormally", binary),
                    exit_code: status.code(),
                    diagnostics,
                });
            }
            if !diagnostics.trim().is_empty() {
                warn!("Decoder reported: {}", diagnostics.trim());
            }
            debug!("Decoder finished after {} bytes", bytes);
            Ok::<(), FrameXError>(())
        });

        Ok(DecodeSession::new(rx, producer))
    }
}
