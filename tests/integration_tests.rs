use std::path::{Path, PathBuf};
use std::process::Command as StdCommand;
use std::sync::Arc;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

use framex::adapters::{FFmpegAdapter, FFprobeAdapter};
use framex::ports::ProbePort;
use framex::*;

/// Test utilities for video processing
mod test_utils {
    use super::*;

    pub fn tool_available(name: &str) -> bool {
        StdCommand::new(name)
            .arg("-version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    /// True when both ffmpeg and ffprobe are on PATH
    pub fn ffmpeg_available() -> bool {
        let available = tool_available("ffmpeg") && tool_available("ffprobe");
        if !available {
            eprintln!("ffmpeg/ffprobe not found; skipping");
        }
        available
    }

    /// Create a 320x240 30fps test pattern video using FFmpeg
    pub fn create_test_video(dir: &Path, seconds: u32) -> PathBuf {
        let path = dir.join("pattern.mp4");
        let output = StdCommand::new("ffmpeg")
            .args(["-hide_banner", "-loglevel", "error", "-f", "lavfi", "-i"])
            .arg(format!("testsrc=duration={}:size=320x240:rate=30", seconds))
            .args(["-pix_fmt", "yuv420p", "-y"])
            .arg(&path)
            .output()
            .expect("failed to run ffmpeg");
        assert!(
            output.status.success(),
            "ffmpeg failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        path
    }

    pub fn extractor() -> ExtractInteractor {
        ExtractInteractor::new(Arc::new(FFprobeAdapter::new()), Arc::new(FFmpegAdapter::new()))
    }
}

use test_utils::*;

#[tokio::test]
async fn test_probe_reports_geometry() {
    if !ffmpeg_available() {
        return;
    }
    let temp_dir = TempDir::new().unwrap();
    let video = create_test_video(temp_dir.path(), 2);

    let metadata = FFprobeAdapter::new().probe_source(&video).await.unwrap();
    assert_eq!((metadata.width, metadata.height), (320, 240));
    assert!((metadata.frame_rate.unwrap() - 30.0).abs() < 0.01);
    let duration = metadata.duration.unwrap().as_seconds();
    assert!((duration - 2.0).abs() < 0.2, "duration {}", duration);
}

#[tokio::test]
async fn test_sampling_one_frame_per_second() {
    if !ffmpeg_available() {
        return;
    }
    let temp_dir = TempDir::new().unwrap();
    let video = create_test_video(temp_dir.path(), 4);

    let frames = extractor()
        .extract(&video, &ProcessingConfig::new().with_fps(Some(1.0)))
        .await
        .unwrap();
    assert!((4..=5).contains(&frames.len()), "got {} frames", frames.len());
    assert_eq!(frames.shape(), Some((240, 320, 3)));
}

#[tokio::test]
async fn test_half_scale_and_window() {
    if !ffmpeg_available() {
        return;
    }
    let temp_dir = TempDir::new().unwrap();
    let video = create_test_video(temp_dir.path(), 4);

    let config = ProcessingConfig::new()
        .with_fps(None)
        .with_resize_scale(0.5)
        .with_start_time("00:00:01")
        .with_end_time("00:00:02");
    let frames = extractor().extract(&video, &config).await.unwrap();

    // One second of 30fps video.
    assert!((28..=31).contains(&frames.len()), "got {} frames", frames.len());
    for frame in &frames {
        assert_eq!(frame.shape(), (120, 160, 3));
    }
}

#[tokio::test]
async fn test_max_frames_and_persistence() {
    if !ffmpeg_available() {
        return;
    }
    let temp_dir = TempDir::new().unwrap();
    let video = create_test_video(temp_dir.path(), 3);
    let output_dir = temp_dir.path().join("frames");

    let config = ProcessingConfig::new()
        .with_fps(Some(10.0))
        .with_resize_dims(64, 48)
        .with_max_frames(3)
        .with_output_dir(&output_dir);
    let frames = extractor().extract(&video, &config).await.unwrap();

    assert_eq!(frames.len(), 3);
    for index in 1..=3 {
        let path = output_dir.join(format!("frame_{:06}.jpg", index));
        let image = image::open(&path).unwrap();
        assert_eq!((image.width(), image.height()), (64, 48));
    }
    assert!(!output_dir.join("frame_000004.jpg").exists());
}

#[tokio::test]
async fn test_repeated_extraction_is_deterministic() {
    if !ffmpeg_available() {
        return;
    }
    let temp_dir = TempDir::new().unwrap();
    let video = create_test_video(temp_dir.path(), 2);
    let config = ProcessingConfig::new().with_fps(Some(2.0)).with_resize_scale(0.25);

    let first = extractor().extract(&video, &config).await.unwrap();
    let second = extractor().extract(&video, &config).await.unwrap();
    assert!(!first.is_empty());
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_window_past_end_is_decode_error() {
    if !ffmpeg_available() {
        return;
    }
    let temp_dir = TempDir::new().unwrap();
    let video = create_test_video(temp_dir.path(), 1);

    let config = ProcessingConfig::new()
        .with_start_time("00:00:30")
        .with_end_time("00:00:31");
    let err = extractor().extract(&video, &config).await.unwrap_err();
    assert!(matches!(err, FrameXError::Decode { .. }), "{:?}", err);
}

#[tokio::test]
async fn test_non_video_file_is_source_error() {
    if !ffmpeg_available() {
        return;
    }
    let temp_dir = TempDir::new().unwrap();
    let bogus = temp_dir.path().join("notes.mp4");
    std::fs::write(&bogus, b"definitely not a video").unwrap();

    let err = extractor()
        .extract(&bogus, &ProcessingConfig::new())
        .await
        .unwrap_err();
    assert!(matches!(err, FrameXError::Source { .. }), "{:?}", err);
}

#[test]
fn test_cli_help() {
    Command::cargo_bin("framex")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("extract"))
        .stdout(predicate::str::contains("probe"));
}

#[test]
fn test_cli_rejects_bad_scale_before_decoding() {
    Command::cargo_bin("framex")
        .unwrap()
        .args(["extract", "--input", "whatever.mp4", "--scale", "0"])
        .env_remove("FRAMEX_CONFIG")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid configuration"));
}

#[test]
fn test_cli_missing_input_is_reported() {
    let temp_dir = TempDir::new().unwrap();
    Command::cargo_bin("framex")
        .unwrap()
        .current_dir(temp_dir.path())
        .args(["extract", "--input", "missing.mp4"])
        .env_remove("FRAMEX_CONFIG")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unusable source"));
}

#[test]
fn test_cli_uses_settings_file() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("custom.toml");
    std::fs::write(&config, "[logging]\nlevel = \"shouting\"\n").unwrap();

    Command::cargo_bin("framex")
        .unwrap()
        .args(["--config"])
        .arg(&config)
        .args(["probe", "--input", "missing.mp4"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot load settings"));
}

#[test]
fn test_cli_extract_json_summary() {
    if !ffmpeg_available() {
        return;
    }
    let temp_dir = TempDir::new().unwrap();
    let video = create_test_video(temp_dir.path(), 2);

    let output = Command::cargo_bin("framex")
        .unwrap()
        .current_dir(temp_dir.path())
        .args(["--log-level", "error", "extract", "--input"])
        .arg(&video)
        .args(["--max-frames", "2", "--width", "32", "--height", "24", "--json"])
        .env_remove("FRAMEX_CONFIG")
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["frames"], 2);
    assert_eq!(summary["width"], 32);
    assert_eq!(summary["source"]["width"], 320);
}

#[test]
fn test_cli_probe_yaml() {
    if !ffmpeg_available() {
        return;
    }
    let temp_dir = TempDir::new().unwrap();
    let video = create_test_video(temp_dir.path(), 1);

    Command::cargo_bin("framex")
        .unwrap()
        .current_dir(temp_dir.path())
        .args(["probe", "--format", "yaml", "--input"])
        .arg(&video)
        .env_remove("FRAMEX_CONFIG")
        .assert()
        .success()
        .stdout(predicate::str::contains("width: 320"));
}

/// CLI runs against shell scripts standing in for ffprobe and ffmpeg
#[cfg(unix)]
mod scripted_tools {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    const VIDEO_STREAM: &str =
        r#"{"streams":[{"codec_type":"video","codec_name":"h264","width":64,"height":64}]}"#;

    fn script(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    /// `framex extract` wired to scripted tools inside `dir`
    fn framex(dir: &Path, decoder_body: &str) -> Command {
        let ffprobe = script(dir, "fake-ffprobe", &format!("echo '{}'", VIDEO_STREAM));
        let ffmpeg = script(dir, "fake-ffmpeg", decoder_body);
        std::fs::write(dir.join("v.mp4"), b"placeholder").unwrap();

        let mut cmd = Command::cargo_bin("framex").unwrap();
        cmd.current_dir(dir)
            .env_remove("FRAMEX_CONFIG")
            .env_remove("FRAMEX_LOG_LEVEL")
            .env_remove("FRAMEX_JPEG_QUALITY")
            .env_remove("RUST_LOG")
            .env("FRAMEX_FFPROBE", ffprobe)
            .env("FRAMEX_FFMPEG", ffmpeg)
            .args(["extract", "--input", "v.mp4"]);
        cmd
    }

    #[test]
    fn test_decoder_stderr_is_shown_on_failure() {
        let temp_dir = TempDir::new().unwrap();
        framex(temp_dir.path(), "echo 'moov atom not found' >&2\nexit 1")
            .assert()
            .failure()
            .stderr(predicate::str::contains("exited abnormally"))
            .stderr(predicate::str::contains("moov atom not found"));
    }

    #[test]
    fn test_jpeg_quality_flag_changes_written_files() {
        let temp_dir = TempDir::new().unwrap();
        // One 64x64 RGB24 frame of noise, identical for both runs.
        std::fs::write(
            temp_dir.path().join("frame.rgb"),
            (0..64 * 64 * 3).map(|i: u32| (i.wrapping_mul(2_654_435_761) >> 24) as u8).collect::<Vec<u8>>(),
        )
        .unwrap();

        let mut sizes = Vec::new();
        for quality in ["1", "100"] {
            let out = format!("q{}", quality);
            framex(temp_dir.path(), "cat frame.rgb")
                .args(["--jpeg-quality", quality, "-o", &out])
                .assert()
                .success();
            let written = temp_dir.path().join(&out).join("frame_000001.jpg");
            sizes.push(std::fs::metadata(written).unwrap().len());
        }
        assert!(sizes[1] > sizes[0], "sizes {:?}", sizes);
    }
}
