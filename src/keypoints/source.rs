use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use zip::ZipArchive;

use crate::foundation::error::{PoseVizError, PoseVizResult};
use crate::keypoints::model::KeypointFrame;

/// File-name suffix identifying keypoint records.
pub const KEYPOINT_EXTENSION: &str = ".json";

/// Upper bound on the buffer reserved from an archive's declared entry size.
const MAX_ENTRY_PREALLOC: usize = 1 << 20;

enum Backend {
    Directory,
    Archive(ZipArchive<BufReader<File>>),
}

/// Lazily-read sequence of per-frame keypoint records.
///
/// The location is either a plain directory or a single zip archive. Only entry names are
/// listed up front; record bytes are read on demand by [`KeypointSource::open_frame`], so a
/// long video never has all of its records in memory at once.
pub struct KeypointSource {
    location: PathBuf,
    names: Vec<String>,
    backend: Backend,
}

impl std::fmt::Debug for KeypointSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeypointSource")
            .field("location", &self.location)
            .field("entries", &self.names.len())
            .field("archive", &matches!(self.backend, Backend::Archive(_)))
            .finish()
    }
}

impl KeypointSource {
    /// Open `location` and list its keypoint entries in ascending name order.
    pub fn open(location: &Path) -> PoseVizResult<Self> {
        if !location.exists() {
            return Err(PoseVizError::config(format!(
                "keypoint location '{}' does not exist",
                location.display()
            )));
        }

        if location.is_dir() {
            let mut names = Vec::new();
            let entries = std::fs::read_dir(location)
                .with_context(|| format!("list keypoint directory '{}'", location.display()))?;
            for entry in entries {
                let entry = entry.context("read keypoint directory entry")?;
                if !entry.file_type().context("stat keypoint entry")?.is_file() {
                    continue;
                }
                let name = entry.file_name().to_string_lossy().into_owned();
                if name.ends_with(KEYPOINT_EXTENSION) {
                    names.push(name);
                }
            }
            names.sort();
            return Ok(Self {
                location: location.to_path_buf(),
                names,
                backend: Backend::Directory,
            });
        }

        let file = File::open(location)
            .with_context(|| format!("open keypoint archive '{}'", location.display()))?;
        let archive = ZipArchive::new(BufReader::new(file)).map_err(|e| {
            PoseVizError::io(format!(
                "'{}' is neither a directory nor a readable zip archive: {e}",
                location.display()
            ))
        })?;
        let mut names: Vec<String> = archive
            .file_names()
            .filter(|n| n.ends_with(KEYPOINT_EXTENSION))
            .map(str::to_owned)
            .collect();
        names.sort();

        Ok(Self {
            location: location.to_path_buf(),
            names,
            backend: Backend::Archive(archive),
        })
    }

    /// The directory or archive path this source reads from.
    pub fn location(&self) -> &Path {
        &self.location
    }

    /// Entry names in ascending order; position `i` pairs with video frame `i`.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of keypoint entries.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// `true` when no keypoint entries were found.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Read the raw bytes of entry `name`.
    pub fn read_bytes(&mut self, name: &str) -> PoseVizResult<Vec<u8>> {
        match &mut self.backend {
            Backend::Directory => {
                let path = self.location.join(name);
                std::fs::read(&path).map_err(|e| {
                    PoseVizError::io(format!("read keypoint file '{}': {e}", path.display()))
                })
            }
            Backend::Archive(archive) => {
                let mut entry = archive.by_name(name).map_err(|e| {
                    PoseVizError::io(format!(
                        "archive '{}' has no entry '{name}': {e}",
                        self.location.display()
                    ))
                })?;
                let mut bytes = Vec::with_capacity(prealloc_len(entry.size()));
                entry
                    .read_to_end(&mut bytes)
                    .map_err(|e| PoseVizError::io(format!("read archive entry '{name}': {e}")))?;
                Ok(bytes)
            }
        }
    }

    /// Read and decode entry `name`.
    pub fn open_frame(&mut self, name: &str) -> PoseVizResult<KeypointFrame> {
        let bytes = self.read_bytes(name)?;
        KeypointFrame::from_json_slice(&bytes).map_err(|e| match e {
            PoseVizError::Parse(msg) => PoseVizError::parse(format!("{name}: {msg}")),
            PoseVizError::Format(msg) => PoseVizError::format(format!("{name}: {msg}")),
            other => other,
        })
    }
}

// The declared size comes from the archive header and is not trusted for allocation.
fn prealloc_len(declared: u64) -> usize {
    usize::try_from(declared)
        .unwrap_or(usize::MAX)
        .min(MAX_ENTRY_PREALLOC)
}

#[cfg(test)]
#[path = "../../tests/unit/keypoints/source.rs"]
mod tests;
