/// Convenience result type used across poseviz.
pub type PoseVizResult<T> = Result<T, PoseVizError>;

/// Top-level error taxonomy used by the overlay pipeline.
#[derive(thiserror::Error, Debug)]
pub enum PoseVizError {
    /// A keypoint record could not be decoded (bad JSON, bad encoding, missing `people`).
    #[error("parse error: {0}")]
    Parse(String),

    /// A keypoint record decoded but its arrays have an unexpected shape.
    #[error("format error: {0}")]
    Format(String),

    /// Missing input paths, unwritable outputs, unreadable entries.
    #[error("io error: {0}")]
    Io(String),

    /// Invalid run configuration, reported before any processing begins.
    #[error("config error: {0}")]
    Config(String),

    /// Failures of the external `ffmpeg`/`ffprobe` tools.
    #[error("media error: {0}")]
    Media(String),

    /// A caller broke an API contract, such as pushing frames out of order.
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PoseVizError {
    /// Build a [`PoseVizError::Parse`] value.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Build a [`PoseVizError::Format`] value.
    pub fn format(msg: impl Into<String>) -> Self {
        Self::Format(msg.into())
    }

    /// Build a [`PoseVizError::Io`] value.
    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    /// Build a [`PoseVizError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`PoseVizError::Media`] value.
    pub fn media(msg: impl Into<String>) -> Self {
        Self::Media(msg.into())
    }

    /// Build a [`PoseVizError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
