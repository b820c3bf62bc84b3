use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::encode::chunked::{ChunkOpts, ChunkedWriter, Segment};
use crate::encode::ffmpeg::{FfmpegConcat, FfmpegEncodeOpts, FfmpegSegmentEncoder};
use crate::encode::sink::{SegmentConcat, SegmentEncoder};
use crate::foundation::error::{PoseVizError, PoseVizResult};
use crate::keypoints::model::KeypointFrame;
use crate::keypoints::source::KeypointSource;
use crate::media::decode::{FfmpegDecoder, VideoDecoder};
use crate::media::probe::{VideoSourceInfo, probe_video};
use crate::pipeline::stills::save_still;
use crate::pipeline::workspace::{default_temp_dir, prepare_temp_dir};
use crate::render::composite::{CompositeOpts, FrameCompositor};
use crate::render::frame::CompositedFrame;
use crate::skeleton::topology::SkeletonFormat;
use crate::stitch::stitcher::stitch_segments;
use crate::timeline::range::{FramePlan, FrameSelection, drive};

/// The only container extension accepted for the final output.
pub const OUTPUT_EXTENSION: &str = "mp4";
/// Default segment length in frames.
pub const DEFAULT_MAX_FRAMES_PER_CHUNK: usize = 100;

/// What to do with a keypoint record that cannot be decoded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum KeypointErrorPolicy {
    /// Stop the run with the parse error.
    #[default]
    Abort,
    /// Log a warning and composite the frame with no people.
    RenderBare,
}

/// Options for one overlay run.
#[derive(Clone, Debug)]
pub struct OverlayOpts {
    /// Body layout of the keypoint records.
    pub format: SkeletonFormat,
    /// Maximum frames per segment; `None` writes a single segment.
    pub max_frames_per_chunk: Option<usize>,
    /// Draw skeletons on black instead of the video picture.
    pub no_background: bool,
    /// Parent of the per-run segment directory; defaults to [`default_temp_dir`].
    pub temp_dir: Option<PathBuf>,
    /// When set, every composited frame is also saved here as a PNG.
    pub images_dir: Option<PathBuf>,
    /// Frames to render.
    pub selection: FrameSelection,
    /// Handling of undecodable keypoint records. Malformed arrays always abort.
    pub keypoint_policy: KeypointErrorPolicy,
    /// Delete segment files and the segment directory after stitching.
    pub cleanup: bool,
    /// Replace an existing output file.
    pub overwrite: bool,
}

impl Default for OverlayOpts {
    fn default() -> Self {
        Self {
            format: SkeletonFormat::default(),
            max_frames_per_chunk: Some(DEFAULT_MAX_FRAMES_PER_CHUNK),
            no_background: false,
            temp_dir: None,
            images_dir: None,
            selection: FrameSelection::default(),
            keypoint_policy: KeypointErrorPolicy::default(),
            cleanup: true,
            overwrite: true,
        }
    }
}

/// Summary of a finished overlay run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderReport {
    /// Composited frames handed to the segment writer.
    pub frames_written: usize,
    /// Segments written, in order.
    pub segments: Vec<Segment>,
    /// Stitched output, or `None` when no frame was rendered.
    pub output: Option<PathBuf>,
    /// `true` when the video ended before the frame plan did.
    pub stopped_early: bool,
}

/// Reject output paths whose extension is not `.mp4`.
pub fn validate_output_path(output: &Path) -> PoseVizResult<()> {
    match output.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case(OUTPUT_EXTENSION) => Ok(()),
        _ => Err(PoseVizError::config(format!(
            "output '{}' must have a .{OUTPUT_EXTENSION} extension",
            output.display()
        ))),
    }
}

/// Render `keypoints` over `video` into `output` using the system `ffmpeg`/`ffprobe`.
///
/// The output extension and the keypoint location are checked before anything is probed or
/// decoded.
#[tracing::instrument(skip(opts))]
pub fn render_overlay(
    video: &Path,
    keypoints: &Path,
    output: &Path,
    opts: &OverlayOpts,
) -> PoseVizResult<RenderReport> {
    validate_output_path(output)?;
    let mut source = KeypointSource::open(keypoints)?;
    let info = probe_video(video)?;
    tracing::info!(
        width = info.size.width,
        height = info.size.height,
        fps = %info.fps,
        frames = ?info.frame_count,
        keypoints = source.len(),
        "inputs opened"
    );

    let mut decoder = FfmpegDecoder::open(info.clone())?;
    let mut encoder = FfmpegSegmentEncoder::new(FfmpegEncodeOpts::default());
    run_overlay(
        &mut source,
        &info,
        output,
        opts,
        &mut decoder,
        &mut encoder,
        &mut FfmpegConcat,
    )
}

/// Run the frame loop over already-opened collaborators.
///
/// Frames are composited and buffered in index order, flushed as numbered segments into a
/// per-run temp directory, then stitched into `output`. A decoder that runs dry ends the loop
/// and the segments written so far are still stitched. Keypoint errors (subject to
/// [`KeypointErrorPolicy`]) and encoder errors abort the run without stitching.
pub fn run_overlay(
    source: &mut KeypointSource,
    info: &VideoSourceInfo,
    output: &Path,
    opts: &OverlayOpts,
    decoder: &mut dyn VideoDecoder,
    encoder: &mut dyn SegmentEncoder,
    concat: &mut dyn SegmentConcat,
) -> PoseVizResult<RenderReport> {
    validate_output_path(output)?;
    if !opts.overwrite && output.exists() {
        return Err(PoseVizError::io(format!(
            "output '{}' already exists",
            output.display()
        )));
    }

    let plan = FramePlan::new(info.frame_count, source.names(), &opts.selection)?;
    let configured_temp = opts.temp_dir.clone().unwrap_or_else(default_temp_dir);
    let temp_dir = prepare_temp_dir(&configured_temp)?;
    if let Some(dir) = &opts.images_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create image dir '{}'", dir.display()))?;
    }
    tracing::info!(
        frames = plan.len(),
        temp_dir = %temp_dir.display(),
        "rendering"
    );

    let compositor = FrameCompositor::new(CompositeOpts {
        format: opts.format,
        no_background: opts.no_background,
    });
    let chunk_opts = ChunkOpts::for_output(&temp_dir, output, opts.max_frames_per_chunk);
    let mut writer = ChunkedWriter::new(chunk_opts, info.fps, encoder)?;

    let outcome = drive(decoder, &plan, |planned, raw| {
        let keypoints = match source.open_frame(&planned.keypoint_name) {
            Ok(kp) => kp,
            Err(PoseVizError::Parse(msg))
                if opts.keypoint_policy == KeypointErrorPolicy::RenderBare =>
            {
                tracing::warn!(
                    frame = planned.index.0,
                    error = %msg,
                    "undecodable keypoint record; rendering frame without skeletons"
                );
                KeypointFrame::default()
            }
            Err(e) => return Err(e),
        };

        let frame = compositor.composite(&raw, &keypoints);
        tracing::debug!(
            frame = planned.index.0,
            people = keypoints.people.len(),
            keypoints = %planned.keypoint_name,
            "frame composited"
        );
        if let Some(dir) = &opts.images_dir {
            save_still(dir, &planned.keypoint_name, &frame)?;
        }
        writer.push(CompositedFrame {
            index: planned.index,
            keypoint_name: planned.keypoint_name.clone(),
            frame,
        })
    })?;

    let segments = writer.finish()?;
    let frames_written = segments.iter().map(|s| s.frames).sum();

    let output = if segments.is_empty() {
        tracing::warn!("no frames rendered; nothing to stitch");
        if opts.cleanup
            && let Err(e) = std::fs::remove_dir(&temp_dir)
        {
            tracing::debug!(dir = %temp_dir.display(), error = %e, "temp dir left in place");
        }
        None
    } else {
        stitch_segments(&temp_dir, output, opts.cleanup, concat)?.output
    };

    Ok(RenderReport {
        frames_written,
        segments,
        output,
        stopped_early: outcome.stopped_early,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/driver.rs"]
mod tests;
