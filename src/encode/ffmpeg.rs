use std::io::{Read, Write as _};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};

use crate::encode::sink::{SegmentConcat, SegmentConfig, SegmentEncoder};
use crate::foundation::core::Fps;
use crate::foundation::error::{PoseVizError, PoseVizResult};
use crate::media::probe::is_ffmpeg_on_path;
use crate::render::frame::{ChannelOrder, CompositedFrame};

/// Options for [`FfmpegSegmentEncoder`].
#[derive(Clone, Debug)]
pub struct FfmpegEncodeOpts {
    /// Overwrite segment files that already exist.
    pub overwrite: bool,
    /// `libx264` constant rate factor.
    pub crf: u8,
}

impl Default for FfmpegEncodeOpts {
    fn default() -> Self {
        Self {
            overwrite: true,
            crf: 18,
        }
    }
}

/// Segment encoder that spawns the system `ffmpeg` once per segment and streams raw `rgb24`
/// frames to its stdin.
///
/// Frames arriving in blue-first order are permuted to red-first before writing.
pub struct FfmpegSegmentEncoder {
    opts: FfmpegEncodeOpts,
    scratch: Vec<u8>,
}

impl FfmpegSegmentEncoder {
    /// Create an encoder with `opts`.
    pub fn new(opts: FfmpegEncodeOpts) -> Self {
        Self {
            opts,
            scratch: Vec::new(),
        }
    }
}

impl SegmentEncoder for FfmpegSegmentEncoder {
    fn write_segment(
        &mut self,
        path: &Path,
        cfg: &SegmentConfig,
        frames: &[CompositedFrame],
    ) -> PoseVizResult<()> {
        if cfg.size.width == 0 || cfg.size.height == 0 {
            return Err(PoseVizError::config("segment width/height must be non-zero"));
        }
        if !self.opts.overwrite && path.exists() {
            return Err(PoseVizError::io(format!(
                "segment file '{}' already exists",
                path.display()
            )));
        }
        if !is_ffmpeg_on_path() {
            return Err(PoseVizError::media(
                "ffmpeg is required for MP4 encoding, but was not found on PATH",
            ));
        }
        ensure_parent_dir(path)?;

        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        cmd.arg(if self.opts.overwrite { "-y" } else { "-n" });
        cmd.args([
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgb24",
            "-s",
            &format!("{}x{}", cfg.size.width, cfg.size.height),
        ]);
        push_input_fps(&mut cmd, cfg.fps);
        cmd.args(["-i", "pipe:0"]);
        // yuv420p needs even dimensions; pad odd ones by a pixel.
        cmd.args([
            "-an",
            "-vf",
            "pad=ceil(iw/2)*2:ceil(ih/2)*2",
            "-c:v",
            "libx264",
            "-crf",
            &self.opts.crf.to_string(),
            "-pix_fmt",
            "yuv420p",
            "-movflags",
            "+faststart",
        ]);
        cmd.arg(path);

        let mut child = cmd.spawn().map_err(|e| {
            PoseVizError::media(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| PoseVizError::media("failed to open ffmpeg stderr (unexpected)"))?;
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok::<_, std::io::Error>(stderr_bytes)
        });

        let write_result = self.write_frames(&mut child, cfg, frames);
        let status = child
            .wait()
            .map_err(|e| PoseVizError::media(format!("failed to wait for ffmpeg to finish: {e}")))?;
        let stderr_bytes = stderr_drain
            .join()
            .map_err(|_| PoseVizError::media("ffmpeg stderr drain thread panicked"))?
            .map_err(|e| PoseVizError::media(format!("ffmpeg stderr read failed: {e}")))?;

        if !status.success() {
            return Err(PoseVizError::media(format!(
                "ffmpeg exited with status {} writing '{}': {}",
                status,
                path.display(),
                String::from_utf8_lossy(&stderr_bytes).trim()
            )));
        }
        write_result
    }
}

impl FfmpegSegmentEncoder {
    fn write_frames(
        &mut self,
        child: &mut Child,
        cfg: &SegmentConfig,
        frames: &[CompositedFrame],
    ) -> PoseVizResult<()> {
        // Dropping stdin at the end of this scope signals end of input to ffmpeg.
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| PoseVizError::media("failed to open ffmpeg stdin (unexpected)"))?;
        self.scratch.resize(cfg.size.packed_len(), 0);

        for f in frames {
            if f.frame.size() != cfg.size {
                return Err(PoseVizError::media(format!(
                    "frame {} is {}x{}, segment expects {}x{}",
                    f.index.0,
                    f.frame.size().width,
                    f.frame.size().height,
                    cfg.size.width,
                    cfg.size.height
                )));
            }
            let bytes = match f.frame.order {
                ChannelOrder::Rgb => f.frame.as_bytes(),
                ChannelOrder::Bgr => {
                    bgr_to_rgb(&mut self.scratch, f.frame.as_bytes());
                    self.scratch.as_slice()
                }
            };
            stdin.write_all(bytes).map_err(|e| {
                PoseVizError::media(format!("failed to write frame to ffmpeg stdin: {e}"))
            })?;
        }
        Ok(())
    }
}

fn bgr_to_rgb(dst: &mut [u8], src: &[u8]) {
    for (d, s) in dst.chunks_exact_mut(3).zip(src.chunks_exact(3)) {
        d[0] = s[2];
        d[1] = s[1];
        d[2] = s[0];
    }
}

fn push_input_fps(cmd: &mut Command, fps: Fps) {
    // For rawvideo input, `-r` before `-i` sets the input frame rate.
    cmd.args(["-r", &fps.to_string()]);
}

/// Segment concatenation through ffmpeg's concat demuxer with stream copy.
#[derive(Clone, Debug, Default)]
pub struct FfmpegConcat;

impl SegmentConcat for FfmpegConcat {
    fn concat(&mut self, segments: &[PathBuf], out_path: &Path) -> PoseVizResult<()> {
        if segments.is_empty() {
            return Ok(());
        }
        ensure_parent_dir(out_path)?;

        let list_path = concat_list_path(out_path);
        let mut list = String::new();
        for seg in segments {
            let abs = std::fs::canonicalize(seg).map_err(|e| {
                PoseVizError::io(format!("segment '{}' is not readable: {e}", seg.display()))
            })?;
            list.push_str(&concat_list_line(&abs));
        }
        std::fs::write(&list_path, list).map_err(|e| {
            PoseVizError::io(format!(
                "failed to write concat list '{}': {e}",
                list_path.display()
            ))
        })?;

        let out = Command::new("ffmpeg")
            .args(["-v", "error", "-y", "-f", "concat", "-safe", "0", "-i"])
            .arg(&list_path)
            .args(["-c", "copy"])
            .arg(out_path)
            .stdin(Stdio::null())
            .output();
        if let Err(e) = std::fs::remove_file(&list_path) {
            tracing::warn!(path = %list_path.display(), error = %e, "failed to remove concat list");
        }
        let out = out.map_err(|e| {
            PoseVizError::media(format!("failed to run ffmpeg for concatenation: {e}"))
        })?;
        if !out.status.success() {
            return Err(PoseVizError::media(format!(
                "ffmpeg concat into '{}' failed: {}",
                out_path.display(),
                String::from_utf8_lossy(&out.stderr).trim()
            )));
        }
        Ok(())
    }
}

fn concat_list_path(out_path: &Path) -> PathBuf {
    let mut name = out_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".concat.txt");
    out_path.with_file_name(name)
}

/// One `file '...'` line of a concat demuxer list, with single quotes escaped.
pub(crate) fn concat_list_line(path: &Path) -> String {
    let escaped = path.to_string_lossy().replace('\'', r"'\''");
    format!("file '{escaped}'\n")
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> PoseVizResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
