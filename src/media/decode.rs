use std::io::{BufReader, ErrorKind, Read};
use std::process::{Child, ChildStdout, Command, Stdio};
use std::thread::JoinHandle;

use crate::foundation::core::FrameIndex;
use crate::foundation::error::{PoseVizError, PoseVizResult};
use crate::media::probe::VideoSourceInfo;
use crate::render::frame::{ChannelOrder, VideoFrame};

/// Sequential frame source with frame-exact seeking.
///
/// `read_frame` returns `Ok(None)` at end of stream. Callers treat an `Err` the same way for
/// iteration purposes (a corrupt frame ends the stream) but may log it.
pub trait VideoDecoder {
    /// Position the decoder so that the next `read_frame` returns frame `frame`.
    fn seek(&mut self, frame: FrameIndex) -> PoseVizResult<()>;

    /// Decode the next frame.
    fn read_frame(&mut self) -> PoseVizResult<Option<VideoFrame>>;

    /// Decode and discard the next frame; `false` at end of stream.
    fn skip_frame(&mut self) -> PoseVizResult<bool> {
        Ok(self.read_frame()?.is_some())
    }
}

/// Decoder that streams raw `bgr24` frames from a system `ffmpeg` process.
///
/// Only one frame is held in memory at a time. Seeking restarts the process with a
/// `select=gte(n\,N)` filter so the first emitted frame is exactly frame `N`.
pub struct FfmpegDecoder {
    info: VideoSourceInfo,
    child: Option<Child>,
    stdout: Option<BufReader<ChildStdout>>,
    stderr_drain: Option<JoinHandle<std::io::Result<Vec<u8>>>>,
    scratch: Vec<u8>,
    position: u64,
    finished: bool,
}

impl FfmpegDecoder {
    /// Start decoding `info.source_path` from frame 0.
    pub fn open(info: VideoSourceInfo) -> PoseVizResult<Self> {
        let mut dec = Self {
            scratch: vec![0u8; info.size.packed_len()],
            info,
            child: None,
            stdout: None,
            stderr_drain: None,
            position: 0,
            finished: false,
        };
        dec.spawn(0)?;
        Ok(dec)
    }

    /// Index of the frame the next `read_frame` returns.
    pub fn position(&self) -> FrameIndex {
        FrameIndex(self.position)
    }

    fn spawn(&mut self, start: u64) -> PoseVizResult<()> {
        self.shutdown();

        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd.args(["-v", "error", "-nostdin", "-i"])
            .arg(&self.info.source_path);
        if start > 0 {
            cmd.args(["-vf", &format!("select=gte(n\\,{start})")]);
        }
        cmd.args([
            "-vsync",
            "passthrough",
            "-an",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "bgr24",
            "pipe:1",
        ]);

        let mut child = cmd.spawn().map_err(|e| {
            PoseVizError::media(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| PoseVizError::media("failed to open ffmpeg stdout (unexpected)"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| PoseVizError::media("failed to open ffmpeg stderr (unexpected)"))?;
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok(stderr_bytes)
        });

        self.child = Some(child);
        self.stdout = Some(BufReader::new(stdout));
        self.stderr_drain = Some(stderr_drain);
        self.position = start;
        self.finished = false;
        Ok(())
    }

    /// Fill `scratch` with the next frame; `false` at end of stream.
    fn next_into_scratch(&mut self) -> PoseVizResult<bool> {
        if self.finished {
            return Ok(false);
        }
        let Some(stdout) = self.stdout.as_mut() else {
            return Ok(false);
        };
        match stdout.read_exact(&mut self.scratch) {
            Ok(()) => {
                self.position += 1;
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
                self.finished = true;
                self.reap()?;
                Ok(false)
            }
            Err(e) => {
                self.finished = true;
                Err(PoseVizError::media(format!(
                    "failed to read frame {} from ffmpeg: {e}",
                    self.position
                )))
            }
        }
    }

    /// Wait for a finished ffmpeg process and surface its failure, if any.
    fn reap(&mut self) -> PoseVizResult<()> {
        drop(self.stdout.take());
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };
        let status = child
            .wait()
            .map_err(|e| PoseVizError::media(format!("failed to wait for ffmpeg: {e}")))?;
        let stderr_bytes = match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| PoseVizError::media("ffmpeg stderr drain thread panicked"))?
                .unwrap_or_default(),
            None => Vec::new(),
        };
        if !status.success() {
            return Err(PoseVizError::media(format!(
                "ffmpeg decoder exited with status {} at frame {}: {}",
                status,
                self.position,
                String::from_utf8_lossy(&stderr_bytes).trim()
            )));
        }
        Ok(())
    }

    fn shutdown(&mut self) {
        drop(self.stdout.take());
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
        if let Some(handle) = self.stderr_drain.take() {
            let _ = handle.join();
        }
    }
}

impl VideoDecoder for FfmpegDecoder {
    fn seek(&mut self, frame: FrameIndex) -> PoseVizResult<()> {
        if frame.0 == self.position && !self.finished {
            return Ok(());
        }
        tracing::debug!(frame = frame.0, "restarting ffmpeg decoder at frame");
        self.spawn(frame.0)
    }

    fn read_frame(&mut self) -> PoseVizResult<Option<VideoFrame>> {
        if !self.next_into_scratch()? {
            return Ok(None);
        }
        let frame =
            VideoFrame::from_packed(self.info.size, ChannelOrder::Bgr, self.scratch.clone())?;
        Ok(Some(frame))
    }

    fn skip_frame(&mut self) -> PoseVizResult<bool> {
        self.next_into_scratch()
    }
}

impl Drop for FfmpegDecoder {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Decoder over frames already in memory.
///
/// Useful for tests and for callers that decode through other means.
#[derive(Debug, Default)]
pub struct InMemoryDecoder {
    frames: Vec<VideoFrame>,
    position: usize,
    reads: u64,
}

impl InMemoryDecoder {
    /// Create a decoder over `frames` in order.
    pub fn new(frames: Vec<VideoFrame>) -> Self {
        Self {
            frames,
            position: 0,
            reads: 0,
        }
    }

    /// Number of frames consumed by `read_frame`/`skip_frame` so far.
    pub fn frames_consumed(&self) -> u64 {
        self.reads
    }
}

impl VideoDecoder for InMemoryDecoder {
    fn seek(&mut self, frame: FrameIndex) -> PoseVizResult<()> {
        self.position = usize::try_from(frame.0)
            .map_err(|_| PoseVizError::media("seek target out of range"))?;
        Ok(())
    }

    fn read_frame(&mut self) -> PoseVizResult<Option<VideoFrame>> {
        let Some(frame) = self.frames.get(self.position) else {
            return Ok(None);
        };
        self.position += 1;
        self.reads += 1;
        Ok(Some(frame.clone()))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/media/decode.rs"]
mod tests;
