//! poseviz overlays pose-estimation keypoint skeletons onto the frames of a video.
//!
//! Keypoint records (one JSON file per frame, from a directory or a zip archive) are paired
//! with decoded frames by sorted position, drawn onto each frame and blended, then written as
//! bounded-size MP4 segments that are finally stitched into one output file.
//!
//! # Pipeline overview
//!
//! 1. **Plan**: [`FramePlan`] pairs frame indices with keypoint entries over an optional
//!    `(start, stop, step)` selection, bounded by the shorter of the two sequences.
//! 2. **Decode**: a [`VideoDecoder`] (system `ffmpeg`, `bgr24`) is kept in step with the plan.
//! 3. **Composite**: [`FrameCompositor`] draws every person's skeleton and blends
//!    `0.1 * frame + 0.9 * drawing`.
//! 4. **Chunk**: [`ChunkedWriter`] buffers frames and flushes numbered segments through a
//!    [`SegmentEncoder`].
//! 5. **Stitch**: [`stitch_segments`] concatenates segments in natural numeric order.
//!
//! [`render_overlay`] runs all of this against the system `ffmpeg`/`ffprobe` binaries;
//! [`run_overlay`] takes the collaborators as trait objects.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

/// Segment encoding and bounded-memory chunking.
pub mod encode;
/// Core value types and errors.
pub mod foundation;
/// Keypoint records and their sources.
pub mod keypoints;
/// Video probing and decoding.
pub mod media;
/// End-to-end overlay runs.
pub mod pipeline;
/// Frame buffers, drawing and compositing.
pub mod render;
/// Skeleton topologies.
pub mod skeleton;
/// Detection statistics over keypoint records.
pub mod stats;
/// Natural-order segment stitching.
pub mod stitch;
/// Frame range planning.
pub mod timeline;

pub use crate::encode::chunked::{ChunkOpts, ChunkedWriter, Segment, segment_file_name};
pub use crate::encode::ffmpeg::{FfmpegConcat, FfmpegEncodeOpts, FfmpegSegmentEncoder};
pub use crate::encode::sink::{InMemorySegmentEncoder, SegmentConcat, SegmentConfig, SegmentEncoder};
pub use crate::foundation::core::{Fps, FrameIndex, FrameSize};
pub use crate::foundation::error::{PoseVizError, PoseVizResult};
pub use crate::keypoints::model::{Keypoint, KeypointFrame, Person, Region};
pub use crate::keypoints::source::KeypointSource;
pub use crate::media::decode::{FfmpegDecoder, InMemoryDecoder, VideoDecoder};
pub use crate::media::probe::{VideoSourceInfo, is_ffmpeg_on_path, is_ffprobe_on_path, probe_video};
pub use crate::pipeline::driver::{
    KeypointErrorPolicy, OverlayOpts, RenderReport, render_overlay, run_overlay,
    validate_output_path,
};
pub use crate::pipeline::stills::{save_still, still_image_name};
pub use crate::pipeline::workspace::prepare_temp_dir;
pub use crate::render::composite::{CompositeOpts, FrameCompositor};
pub use crate::render::frame::{ChannelOrder, CompositedFrame, VideoFrame};
pub use crate::skeleton::topology::{ResolutionClass, SkeletonFormat};
pub use crate::stats::summary::{DetectionCounts, GainReport, collect_counts, compare};
pub use crate::stitch::natural::{natural_cmp, natural_sort};
pub use crate::stitch::stitcher::{StitchReport, list_segments, stitch_segments};
pub use crate::timeline::range::{FramePlan, FrameSelection, drive};
