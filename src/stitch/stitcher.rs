use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::encode::sink::SegmentConcat;
use crate::foundation::error::{PoseVizError, PoseVizResult};
use crate::stitch::natural::natural_cmp;

/// Outcome of [`stitch_segments`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StitchReport {
    /// Segments concatenated, in stitch order.
    pub segments: Vec<PathBuf>,
    /// Final file, or `None` when there was nothing to stitch.
    pub output: Option<PathBuf>,
    /// Segment files deleted during cleanup.
    pub removed: usize,
}

/// List the segment files in `dir` in natural numeric order.
///
/// When `extension` is given (with or without the leading dot, in any letter case), other files
/// are ignored.
pub fn list_segments(dir: &Path, extension: Option<&str>) -> PoseVizResult<Vec<PathBuf>> {
    let want = extension.map(|e| e.trim_start_matches('.'));
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read segment directory '{}'", dir.display()))?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry
            .with_context(|| format!("failed to read segment directory '{}'", dir.display()))?;
        if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
            continue;
        }
        let path = entry.path();
        if let Some(want) = want
            && !path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case(want))
        {
            continue;
        }
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    names.sort_by(|a, b| natural_cmp(a, b));
    Ok(names.into_iter().map(|n| dir.join(n)).collect())
}

/// Concatenate every segment in `dir` into `out_path`.
///
/// Zero segments is a no-op. With `cleanup`, segment files and then the directory itself are
/// removed; failures there are logged and skipped.
#[tracing::instrument(skip(concat))]
pub fn stitch_segments(
    dir: &Path,
    out_path: &Path,
    cleanup: bool,
    concat: &mut dyn SegmentConcat,
) -> PoseVizResult<StitchReport> {
    if !dir.is_dir() {
        return Err(PoseVizError::io(format!(
            "segment directory '{}' does not exist",
            dir.display()
        )));
    }
    let extension = out_path.extension().and_then(|e| e.to_str());
    let segments = list_segments(dir, extension)?;
    if segments.is_empty() {
        tracing::info!(dir = %dir.display(), "no segments to stitch");
        return Ok(StitchReport::default());
    }

    concat.concat(&segments, out_path)?;
    tracing::info!(
        segments = segments.len(),
        output = %out_path.display(),
        "segments stitched"
    );

    let removed = if cleanup {
        remove_segments(dir, &segments)
    } else {
        0
    };
    Ok(StitchReport {
        segments,
        output: Some(out_path.to_path_buf()),
        removed,
    })
}

fn remove_segments(dir: &Path, segments: &[PathBuf]) -> usize {
    let mut removed = 0;
    for seg in segments {
        match std::fs::remove_file(seg) {
            Ok(()) => removed += 1,
            Err(e) => {
                tracing::warn!(path = %seg.display(), error = %e, "failed to remove segment");
            }
        }
    }
    if let Err(e) = std::fs::remove_dir(dir) {
        tracing::warn!(dir = %dir.display(), error = %e, "failed to remove segment directory");
    }
    removed
}

#[cfg(test)]
#[path = "../../tests/unit/stitch/stitcher.rs"]
mod tests;
