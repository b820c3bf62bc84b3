use std::path::{Path, PathBuf};

use crate::foundation::core::{Fps, FrameSize};
use crate::foundation::error::PoseVizResult;
use crate::render::frame::CompositedFrame;

/// Stream parameters recorded with every flushed segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SegmentConfig {
    /// Frame dimensions shared by every frame of the segment.
    pub size: FrameSize,
    /// Frame rate the segment is tagged with.
    pub fps: Fps,
}

/// Writes one bounded run of frames as a standalone segment file.
///
/// Ordering contract: `frames` are in strictly increasing index order and must be written in
/// that order.
pub trait SegmentEncoder {
    /// Encode `frames` into a new file at `path`.
    fn write_segment(
        &mut self,
        path: &Path,
        cfg: &SegmentConfig,
        frames: &[CompositedFrame],
    ) -> PoseVizResult<()>;
}

/// Joins segment files, in the given order, into one continuous output file.
pub trait SegmentConcat {
    /// Concatenate `segments` into `out_path`.
    fn concat(&mut self, segments: &[PathBuf], out_path: &Path) -> PoseVizResult<()>;
}

/// Segment encoder that keeps every segment in memory instead of writing files.
#[derive(Debug, Default)]
pub struct InMemorySegmentEncoder {
    /// Segments in write order: target path, stream parameters and frames.
    pub(crate) segments: Vec<(PathBuf, SegmentConfig, Vec<CompositedFrame>)>,
}

impl InMemorySegmentEncoder {
    /// Create an empty encoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrow the captured segments.
    pub fn segments(&self) -> &[(PathBuf, SegmentConfig, Vec<CompositedFrame>)] {
        &self.segments
    }
}

impl SegmentEncoder for InMemorySegmentEncoder {
    fn write_segment(
        &mut self,
        path: &Path,
        cfg: &SegmentConfig,
        frames: &[CompositedFrame],
    ) -> PoseVizResult<()> {
        self.segments
            .push((path.to_path_buf(), *cfg, frames.to_vec()));
        Ok(())
    }
}
