use image::{Rgb, RgbImage};

use crate::keypoints::model::{KeypointFrame, Region};
use crate::render::draw::{draw_disc, draw_thick_line};
use crate::render::frame::{ChannelOrder, VideoFrame};
use crate::skeleton::topology::{ResolutionClass, SkeletonFormat, connections_for, thickness_for};

/// Connections with either endpoint below this confidence are not drawn.
pub const VISIBILITY_THRESHOLD: f32 = 0.05;
/// Weight of the unannotated frame in the final blend.
pub const ORIGINAL_WEIGHT: f32 = 0.1;
/// Weight of the annotated working copy in the final blend.
pub const OVERLAY_WEIGHT: f32 = 0.9;

/// Options for [`FrameCompositor`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CompositeOpts {
    /// Body layout of the keypoint records.
    pub format: SkeletonFormat,
    /// Draw onto a black frame instead of the decoded picture.
    pub no_background: bool,
}

/// Draws keypoint skeletons onto decoded frames.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameCompositor {
    opts: CompositeOpts,
}

impl FrameCompositor {
    /// Create a compositor with `opts`.
    pub fn new(opts: CompositeOpts) -> Self {
        Self { opts }
    }

    /// Options this compositor was built with.
    pub fn opts(&self) -> CompositeOpts {
        self.opts
    }

    /// Produce the annotated version of `raw`.
    ///
    /// All people and regions are drawn into one working copy, which is then blended once with
    /// the base frame (`0.1 * base + 0.9 * copy`). In no-background mode the base is black.
    /// The result keeps the channel order of `raw`.
    pub fn composite(&self, raw: &VideoFrame, keypoints: &KeypointFrame) -> VideoFrame {
        let base = if self.opts.no_background {
            VideoFrame::black(raw.size(), raw.order)
        } else {
            raw.clone()
        };

        let mut canvas = base.pixels.clone();
        let class = ResolutionClass::from_width(raw.width());
        draw_skeleton(&mut canvas, keypoints, self.opts.format, class, raw.order);
        blend_into(&mut canvas, &base.pixels);

        VideoFrame {
            pixels: canvas,
            order: raw.order,
        }
    }
}

/// Draw every visible connection and joint marker of `keypoints` onto `canvas`.
pub fn draw_skeleton(
    canvas: &mut RgbImage,
    keypoints: &KeypointFrame,
    format: SkeletonFormat,
    class: ResolutionClass,
    order: ChannelOrder,
) {
    for person in &keypoints.people {
        for region in Region::ALL {
            let topo = connections_for(format, region);
            let thickness = thickness_for(class, region);
            let marker = thickness + class.marker_extra();

            for ((ja, jb), color) in topo.edges() {
                let (Some(a), Some(b)) = (person.joint(region, ja), person.joint(region, jb))
                else {
                    continue;
                };
                if a.confidence < VISIBILITY_THRESHOLD || b.confidence < VISIBILITY_THRESHOLD {
                    continue;
                }
                let color = pixel_color(color, order);
                draw_thick_line(canvas, (a.x, a.y), (b.x, b.y), thickness, color);
                draw_disc(canvas, (a.x, a.y), marker, color);
            }
        }
    }
}

// Topology colors are listed blue-first.
fn pixel_color(bgr: [u8; 3], order: ChannelOrder) -> Rgb<u8> {
    match order {
        ChannelOrder::Bgr => Rgb(bgr),
        ChannelOrder::Rgb => Rgb([bgr[2], bgr[1], bgr[0]]),
    }
}

/// `canvas = 0.1 * original + 0.9 * canvas`, rounded and clamped per channel.
pub fn blend_into(canvas: &mut RgbImage, original: &RgbImage) {
    debug_assert_eq!(canvas.dimensions(), original.dimensions());
    for (c, o) in canvas.iter_mut().zip(original.iter()) {
        let v = ORIGINAL_WEIGHT * f32::from(*o) + OVERLAY_WEIGHT * f32::from(*c);
        *c = v.round().clamp(0.0, 255.0) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
