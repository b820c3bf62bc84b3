use crate::foundation::core::FrameIndex;
use crate::foundation::error::{PoseVizError, PoseVizResult};
use crate::media::decode::VideoDecoder;
use crate::render::frame::VideoFrame;

/// Requested `(start, stop, step)` slice of the frame sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameSelection {
    /// First frame index (inclusive).
    pub start: u64,
    /// Last frame index (exclusive); `None` runs to the end.
    pub stop: Option<u64>,
    /// Distance between visited frames; must be at least 1.
    pub step: u64,
}

impl Default for FrameSelection {
    fn default() -> Self {
        Self {
            start: 0,
            stop: None,
            step: 1,
        }
    }
}

impl FrameSelection {
    /// Reject zero steps and inverted ranges.
    pub fn validate(&self) -> PoseVizResult<()> {
        if self.step == 0 {
            return Err(PoseVizError::config("frame step must be >= 1"));
        }
        if let Some(stop) = self.stop
            && stop < self.start
        {
            return Err(PoseVizError::config(format!(
                "frame stop ({stop}) must be >= start ({})",
                self.start
            )));
        }
        Ok(())
    }
}

/// One visited frame: its logical index and the keypoint entry paired with it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlannedFrame {
    /// Index in the source video (not renumbered).
    pub index: FrameIndex,
    /// Keypoint entry name at the same position of the sorted entry list.
    pub keypoint_name: String,
}

/// Bounded iteration plan pairing video frames with keypoint entries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FramePlan {
    start: u64,
    step: u64,
    frames: Vec<PlannedFrame>,
}

impl FramePlan {
    /// Build the plan for `selection` over the shorter of the decodable frames and the keypoint
    /// entries. `decodable_frames` is `None` when the container does not report a count; the
    /// decoder running dry then ends iteration instead.
    pub fn new(
        decodable_frames: Option<u64>,
        keypoint_names: &[String],
        selection: &FrameSelection,
    ) -> PoseVizResult<Self> {
        selection.validate()?;

        let mut total = keypoint_names.len() as u64;
        if let Some(n) = decodable_frames {
            total = total.min(n);
        }
        let stop = selection.stop.map_or(total, |s| s.min(total));

        let frames = (selection.start..stop)
            .step_by(usize::try_from(selection.step).unwrap_or(usize::MAX))
            .map(|i| PlannedFrame {
                index: FrameIndex(i),
                keypoint_name: keypoint_names[i as usize].clone(),
            })
            .collect();

        Ok(Self {
            start: selection.start,
            step: selection.step,
            frames,
        })
    }

    /// Frame the decoder must be positioned at before the first read.
    pub fn start(&self) -> FrameIndex {
        FrameIndex(self.start)
    }

    /// Raw frames consumed per visited frame.
    pub fn step(&self) -> u64 {
        self.step
    }

    /// Planned frames in visiting order.
    pub fn frames(&self) -> &[PlannedFrame] {
        &self.frames
    }

    /// Number of planned frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// `true` when nothing is to be visited.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// How a [`drive`] run ended.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DriveOutcome {
    /// Frames handed to the visitor.
    pub visited: usize,
    /// `true` when the decoder ran out before the plan did.
    pub stopped_early: bool,
}

/// Walk `plan`, keeping `decoder` in step with it, and hand each decoded frame to `visit`.
///
/// The decoder is seeked to the plan start when it is past frame 0. After each kept frame,
/// `step - 1` frames are decoded and discarded. The first frame the decoder fails to produce
/// ends the walk without error; errors returned by `visit` abort it.
pub fn drive<D, F>(decoder: &mut D, plan: &FramePlan, mut visit: F) -> PoseVizResult<DriveOutcome>
where
    D: VideoDecoder + ?Sized,
    F: FnMut(&PlannedFrame, VideoFrame) -> PoseVizResult<()>,
{
    let mut outcome = DriveOutcome::default();
    if plan.is_empty() {
        return Ok(outcome);
    }
    if plan.start > 0 {
        decoder.seek(plan.start())?;
    }

    for planned in plan.frames() {
        let frame = match decoder.read_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                tracing::warn!(
                    frame = planned.index.0,
                    "video ended before keypoints; stopping"
                );
                outcome.stopped_early = true;
                break;
            }
            Err(e) => {
                tracing::warn!(
                    frame = planned.index.0,
                    error = %e,
                    "frame decode failed; stopping"
                );
                outcome.stopped_early = true;
                break;
            }
        };

        visit(planned, frame)?;
        outcome.visited += 1;

        for _ in 1..plan.step {
            match decoder.skip_frame() {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) => {
                    tracing::warn!(error = %e, "frame skip failed");
                    break;
                }
            }
        }
    }

    Ok(outcome)
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/range.rs"]
mod tests;
