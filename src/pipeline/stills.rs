use std::path::{Path, PathBuf};

use crate::foundation::error::{PoseVizError, PoseVizResult};
use crate::keypoints::source::KEYPOINT_EXTENSION;
use crate::render::frame::{ChannelOrder, VideoFrame};

/// Suffix the pose estimator appends to every keypoint file stem.
pub const KEYPOINT_SUFFIX: &str = "_keypoints";
/// Tag and extension of saved still images.
pub const STILL_SUFFIX: &str = "-rendered.png";

/// Still-image file name for keypoint entry `keypoint_name`.
///
/// `clip_000000000012_keypoints.json` becomes `clip_000000000012-rendered.png`. Archive
/// subdirectories are dropped.
pub fn still_image_name(keypoint_name: &str) -> String {
    let base = keypoint_name.rsplit('/').next().unwrap_or(keypoint_name);
    let base = base.strip_suffix(KEYPOINT_EXTENSION).unwrap_or(base);
    let base = base.strip_suffix(KEYPOINT_SUFFIX).unwrap_or(base);
    format!("{base}{STILL_SUFFIX}")
}

/// Save `frame` as a PNG in `dir`, named after `keypoint_name`.
pub fn save_still(dir: &Path, keypoint_name: &str, frame: &VideoFrame) -> PoseVizResult<PathBuf> {
    let path = dir.join(still_image_name(keypoint_name));
    let rgb = match frame.order {
        ChannelOrder::Rgb => frame.pixels.clone(),
        ChannelOrder::Bgr => frame.clone().into_order(ChannelOrder::Rgb).pixels,
    };
    rgb.save_with_format(&path, image::ImageFormat::Png)
        .map_err(|e| PoseVizError::io(format!("failed to write '{}': {e}", path.display())))?;
    Ok(path)
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/stills.rs"]
mod tests;
