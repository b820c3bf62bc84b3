use image::RgbImage;

use crate::foundation::core::{FrameIndex, FrameSize};
use crate::foundation::error::{PoseVizError, PoseVizResult};

/// Byte order of the three color channels in a [`VideoFrame`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChannelOrder {
    /// Blue, green, red. Decoded frames arrive in this order.
    Bgr,
    /// Red, green, blue. Encoders and image files expect this order.
    Rgb,
}

/// Packed 8-bit, 3-channel frame buffer tagged with its channel order.
///
/// The pixel container is an [`RgbImage`] so drawing primitives can operate on it directly;
/// `order` says how its three channels are to be interpreted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VideoFrame {
    /// Pixel storage.
    pub pixels: RgbImage,
    /// Interpretation of the three channels.
    pub order: ChannelOrder,
}

impl VideoFrame {
    /// Wrap a packed buffer of `size.packed_len()` bytes.
    pub fn from_packed(size: FrameSize, order: ChannelOrder, data: Vec<u8>) -> PoseVizResult<Self> {
        if data.len() != size.packed_len() {
            return Err(PoseVizError::validation(format!(
                "frame buffer has {} bytes, expected {} for {}x{}",
                data.len(),
                size.packed_len(),
                size.width,
                size.height
            )));
        }
        let pixels = RgbImage::from_raw(size.width, size.height, data)
            .ok_or_else(|| PoseVizError::validation("frame buffer does not match its dimensions"))?;
        Ok(Self { pixels, order })
    }

    /// All-zero frame of the given dimensions.
    pub fn black(size: FrameSize, order: ChannelOrder) -> Self {
        Self {
            pixels: RgbImage::new(size.width, size.height),
            order,
        }
    }

    /// Frame dimensions.
    pub fn size(&self) -> FrameSize {
        FrameSize {
            width: self.pixels.width(),
            height: self.pixels.height(),
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Packed channel bytes, row-major.
    pub fn as_bytes(&self) -> &[u8] {
        self.pixels.as_raw()
    }

    /// Return this frame in `order`, swapping the first and third channel when needed.
    pub fn into_order(mut self, order: ChannelOrder) -> Self {
        if self.order != order {
            for px in self.pixels.pixels_mut() {
                px.0.swap(0, 2);
            }
            self.order = order;
        }
        self
    }
}

/// An annotated frame ready for buffering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompositedFrame {
    /// Logical index of the source frame.
    pub index: FrameIndex,
    /// Keypoint entry the skeleton was drawn from.
    pub keypoint_name: String,
    /// Annotated pixels.
    pub frame: VideoFrame,
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame.rs"]
mod tests;
