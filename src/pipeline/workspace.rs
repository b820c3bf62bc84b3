use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Context as _;

use crate::foundation::error::{PoseVizError, PoseVizResult};

const MAX_CLAIM_ATTEMPTS: u32 = 1024;

/// Default temp directory for segment files.
pub fn default_temp_dir() -> PathBuf {
    std::env::temp_dir().join("poseviz")
}

/// Claim the segment directory for one run.
///
/// `configured` is created if missing but never written into directly: every run gets its own
/// `run-<pid>-<nanos>` subdirectory, created with a single `create_dir` so two concurrent runs
/// can never share one. A name that already exists gets a `-<n>` suffix and is retried.
pub fn prepare_temp_dir(configured: &Path) -> PoseVizResult<PathBuf> {
    std::fs::create_dir_all(configured)
        .with_context(|| format!("failed to create temp dir '{}'", configured.display()))?;

    let pid = std::process::id();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    for attempt in 0..MAX_CLAIM_ATTEMPTS {
        let name = if attempt == 0 {
            format!("run-{pid}-{nanos}")
        } else {
            format!("run-{pid}-{nanos}-{attempt}")
        };
        let dir = configured.join(name);
        match std::fs::create_dir(&dir) {
            Ok(()) => {
                tracing::debug!(
                    configured = %configured.display(),
                    using = %dir.display(),
                    "claimed run temp dir"
                );
                return Ok(dir);
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(e) => {
                return Err(anyhow::Error::new(e)
                    .context(format!("failed to create temp dir '{}'", dir.display()))
                    .into());
            }
        }
    }
    Err(PoseVizError::io(format!(
        "no free run directory under '{}' after {MAX_CLAIM_ATTEMPTS} attempts",
        configured.display()
    )))
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/workspace.rs"]
mod tests;
