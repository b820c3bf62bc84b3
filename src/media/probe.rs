use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::foundation::core::{Fps, FrameSize};
use crate::foundation::error::{PoseVizError, PoseVizResult};

#[derive(Clone, Debug, PartialEq)]
/// Basic metadata about a source video file.
pub struct VideoSourceInfo {
    /// Source path used for probing/decoding.
    pub source_path: PathBuf,
    /// Frame dimensions.
    pub size: FrameSize,
    /// Frame rate used to tag encoded output.
    pub fps: Fps,
    /// Container-reported frame count, when the container records one.
    pub frame_count: Option<u64>,
}

/// Probe the first video stream of `source_path` through `ffprobe`.
#[tracing::instrument]
pub fn probe_video(source_path: &Path) -> PoseVizResult<VideoSourceInfo> {
    #[derive(serde::Deserialize)]
    struct ProbeStream {
        codec_type: Option<String>,
        width: Option<u32>,
        height: Option<u32>,
        r_frame_rate: Option<String>,
        avg_frame_rate: Option<String>,
        nb_frames: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeOut {
        streams: Vec<ProbeStream>,
    }

    if !source_path.is_file() {
        return Err(PoseVizError::io(format!(
            "video '{}' does not exist",
            source_path.display()
        )));
    }

    let out = Command::new("ffprobe")
        .args(["-v", "error", "-print_format", "json", "-show_streams"])
        .arg(source_path)
        .output()
        .map_err(|e| PoseVizError::media(format!("failed to run ffprobe: {e}")))?;
    if !out.status.success() {
        return Err(PoseVizError::media(format!(
            "ffprobe failed for '{}': {}",
            source_path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    let parsed: ProbeOut = serde_json::from_slice(&out.stdout)
        .map_err(|e| PoseVizError::media(format!("ffprobe json parse failed: {e}")))?;
    let video_stream = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| PoseVizError::media("no video stream found"))?;
    let width = video_stream
        .width
        .ok_or_else(|| PoseVizError::media("missing video width from ffprobe"))?;
    let height = video_stream
        .height
        .ok_or_else(|| PoseVizError::media("missing video height from ffprobe"))?;
    let fps = select_fps(
        video_stream.r_frame_rate.as_deref(),
        video_stream.avg_frame_rate.as_deref(),
    )?;
    let frame_count = video_stream
        .nb_frames
        .as_deref()
        .and_then(|s| s.parse::<u64>().ok())
        .filter(|&n| n > 0);

    Ok(VideoSourceInfo {
        source_path: source_path.to_path_buf(),
        size: FrameSize { width, height },
        fps,
        frame_count,
    })
}

/// Pick the stream's real base rate, falling back to the decoder-reported average rate when
/// the base rate is indeterminate (`0/0`).
pub(crate) fn select_fps(
    r_frame_rate: Option<&str>,
    avg_frame_rate: Option<&str>,
) -> PoseVizResult<Fps> {
    if let Some(fps) = r_frame_rate.and_then(Fps::parse_ratio) {
        return Ok(fps);
    }
    if let Some(fps) = avg_frame_rate.and_then(Fps::parse_ratio) {
        tracing::debug!(%fps, "r_frame_rate indeterminate, using avg_frame_rate");
        return Ok(fps);
    }
    Err(PoseVizError::media(format!(
        "video frame rate is indeterminate (r_frame_rate={}, avg_frame_rate={})",
        r_frame_rate.unwrap_or("n/a"),
        avg_frame_rate.unwrap_or("n/a")
    )))
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    tool_on_path("ffmpeg")
}

/// Return `true` when `ffprobe` can be invoked from `PATH`.
pub fn is_ffprobe_on_path() -> bool {
    tool_on_path("ffprobe")
}

fn tool_on_path(tool: &str) -> bool {
    Command::new(tool)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/media/probe.rs"]
mod tests;
