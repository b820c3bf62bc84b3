use crate::foundation::error::{PoseVizError, PoseVizResult};

/// Zero-based index of a frame in the source video's native decode order.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Rational frame rate, as reported by `ffprobe` (`30000/1001`, `25/1`, ...).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator, frames.
    pub num: u32,
    /// Denominator, seconds. Always > 0.
    pub den: u32,
}

impl Fps {
    /// Build a validated frame rate; both parts must be non-zero.
    pub fn new(num: u32, den: u32) -> PoseVizResult<Self> {
        if den == 0 {
            return Err(PoseVizError::config("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(PoseVizError::config("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Parse an ffmpeg-style `num/den` ratio.
    ///
    /// Returns `None` for malformed text and for indeterminate rates such as `0/0`.
    pub fn parse_ratio(s: &str) -> Option<Self> {
        let (a, b) = s.trim().split_once('/')?;
        let num = a.parse::<u32>().ok()?;
        let den = b.parse::<u32>().ok()?;
        Self::new(num, den).ok()
    }

    /// Frames per second as a float.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }
}

impl std::fmt::Display for Fps {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}

/// Pixel dimensions of a video stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FrameSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl FrameSize {
    /// Byte length of one packed 3-channel 8-bit frame.
    pub fn packed_len(self) -> usize {
        self.width as usize * self.height as usize * 3
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
