use std::path::{Path, PathBuf};

use crate::encode::sink::{SegmentConfig, SegmentEncoder};
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{PoseVizError, PoseVizResult};
use crate::render::frame::CompositedFrame;

/// Where and how [`ChunkedWriter`] lays out segment files.
#[derive(Clone, Debug)]
pub struct ChunkOpts {
    /// Directory receiving segment files.
    pub dir: PathBuf,
    /// File stem shared by every segment (`<stem>_<n><extension>`).
    pub stem: String,
    /// Extension including the leading dot, e.g. `.mp4`.
    pub extension: String,
    /// Maximum frames per segment; `None` writes the whole stream as one segment.
    pub max_frames_per_chunk: Option<usize>,
}

impl ChunkOpts {
    /// Segment layout for `output`: same stem and extension, files placed in `dir`.
    pub fn for_output(
        dir: impl Into<PathBuf>,
        output: &Path,
        max_frames_per_chunk: Option<usize>,
    ) -> Self {
        let stem = output
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "segment".to_owned());
        let extension = output
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        Self {
            dir: dir.into(),
            stem,
            extension,
            max_frames_per_chunk,
        }
    }
}

/// A flushed segment file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Segment {
    /// Chunk number, starting at 1.
    pub number: usize,
    /// File written by the encoder.
    pub path: PathBuf,
    /// Number of frames in the segment.
    pub frames: usize,
    /// Index of the first frame.
    pub first: FrameIndex,
    /// Index of the last frame.
    pub last: FrameIndex,
}

/// File name of chunk `number`.
pub fn segment_file_name(stem: &str, number: usize, extension: &str) -> String {
    format!("{stem}_{number}{extension}")
}

/// Buffers composited frames and flushes them as numbered segments.
///
/// A full buffer is only flushed once another frame arrives, so a stream whose length is a
/// multiple of the chunk size never produces a trailing empty segment. [`ChunkedWriter::finish`]
/// flushes whatever remains.
pub struct ChunkedWriter<'a> {
    opts: ChunkOpts,
    fps: Fps,
    encoder: &'a mut dyn SegmentEncoder,
    buffer: Vec<CompositedFrame>,
    segments: Vec<Segment>,
    last_index: Option<FrameIndex>,
}

impl<'a> ChunkedWriter<'a> {
    /// Create a writer; a chunk size of zero is rejected.
    pub fn new(
        opts: ChunkOpts,
        fps: Fps,
        encoder: &'a mut dyn SegmentEncoder,
    ) -> PoseVizResult<Self> {
        if opts.max_frames_per_chunk == Some(0) {
            return Err(PoseVizError::config("max frames per chunk must be >= 1"));
        }
        Ok(Self {
            opts,
            fps,
            encoder,
            buffer: Vec::new(),
            segments: Vec::new(),
            last_index: None,
        })
    }

    /// Append one frame, flushing the previous chunk first if it is full.
    pub fn push(&mut self, frame: CompositedFrame) -> PoseVizResult<()> {
        if let Some(last) = self.last_index
            && frame.index <= last
        {
            return Err(PoseVizError::validation(format!(
                "frame {} pushed after frame {}; indices must increase",
                frame.index.0, last.0
            )));
        }
        if let Some(first) = self.buffer.first()
            && first.frame.size() != frame.frame.size()
        {
            return Err(PoseVizError::validation(format!(
                "frame {} is {}x{}, buffered frames are {}x{}",
                frame.index.0,
                frame.frame.size().width,
                frame.frame.size().height,
                first.frame.size().width,
                first.frame.size().height
            )));
        }
        if let Some(max) = self.opts.max_frames_per_chunk
            && self.buffer.len() >= max
        {
            self.flush()?;
        }
        self.last_index = Some(frame.index);
        self.buffer.push(frame);
        Ok(())
    }

    /// Segments flushed so far.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Frames currently buffered.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Flush the remaining frames and return every segment written, in order.
    pub fn finish(mut self) -> PoseVizResult<Vec<Segment>> {
        self.flush()?;
        Ok(self.segments)
    }

    fn flush(&mut self) -> PoseVizResult<()> {
        let (Some(first), Some(last)) = (self.buffer.first(), self.buffer.last()) else {
            return Ok(());
        };
        let number = self.segments.len() + 1;
        let name = segment_file_name(&self.opts.stem, number, &self.opts.extension);
        let path = self.opts.dir.join(name);
        let cfg = SegmentConfig {
            size: first.frame.size(),
            fps: self.fps,
        };
        let segment = Segment {
            number,
            path,
            frames: self.buffer.len(),
            first: first.index,
            last: last.index,
        };

        self.encoder.write_segment(&segment.path, &cfg, &self.buffer)?;
        tracing::info!(
            segment = number,
            frames = segment.frames,
            first = segment.first.0,
            last = segment.last.0,
            path = %segment.path.display(),
            "segment written"
        );
        self.buffer.clear();
        self.segments.push(segment);
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/chunked.rs"]
mod tests;
