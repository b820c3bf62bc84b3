use crate::foundation::core::FrameSize;
use crate::keypoints::model::{Keypoint, Person};

use super::*;

fn gray_frame(width: u32, height: u32) -> VideoFrame {
    let size = FrameSize { width, height };
    VideoFrame::from_packed(size, ChannelOrder::Bgr, vec![40; size.packed_len()]).unwrap()
}

fn kp(x: f32, y: f32, confidence: f32) -> Keypoint {
    Keypoint { x, y, confidence }
}

// Neck (1) to right shoulder (2) is the first COCO limb.
fn one_limb(conf_a: f32, conf_b: f32) -> KeypointFrame {
    let mut pose = vec![kp(0.0, 0.0, 0.0); 18];
    pose[1] = kp(10.0, 20.0, conf_a);
    pose[2] = kp(50.0, 20.0, conf_b);
    KeypointFrame {
        people: vec![Person {
            pose,
            ..Person::default()
        }],
    }
}

#[test]
fn low_confidence_endpoint_draws_nothing() {
    let raw = gray_frame(64, 48);
    let comp = FrameCompositor::default();
    for (a, b) in [(0.04, 0.9), (0.9, 0.0499), (0.0, 0.0)] {
        let out = comp.composite(&raw, &one_limb(a, b));
        assert_eq!(out, raw, "conf ({a}, {b})");
    }
}

#[test]
fn visible_limb_is_blended_over_the_frame() {
    let raw = gray_frame(64, 48);
    let out = FrameCompositor::default().composite(&raw, &one_limb(0.05, 1.0));
    // Limb color [255, 0, 85] blended 0.9 over gray 40.
    let mid = out.pixels.get_pixel(30, 20).0;
    assert_eq!(mid, [(0.1f32 * 40.0 + 0.9 * 255.0).round() as u8, 4, 81]);
    // Far corner untouched.
    assert_eq!(out.pixels.get_pixel(63, 47).0, [40, 40, 40]);
}

#[test]
fn marker_is_larger_than_line() {
    let raw = gray_frame(64, 48);
    let out = FrameCompositor::default().composite(&raw, &one_limb(1.0, 1.0));
    // Standard pose thickness 2 (radius 1); marker 2 + 3 = 5 (radius 2) at joint A only.
    assert_ne!(out.pixels.get_pixel(10, 22).0, [40, 40, 40]);
    assert_eq!(out.pixels.get_pixel(30, 22).0, [40, 40, 40]);
}

#[test]
fn frames_wider_than_1300_use_the_thick_strokes() {
    const GRAY: [u8; 3] = [40, 40, 40];
    let comp = FrameCompositor::default();
    let limb = one_limb(1.0, 1.0);
    let standard = comp.composite(&gray_frame(1300, 40), &limb);
    let high = comp.composite(&gray_frame(1301, 40), &limb);

    // Three rows off the limb: inside the HD line radius 4, outside the standard radius 1.
    assert_ne!(high.pixels.get_pixel(30, 23).0, GRAY);
    assert_eq!(standard.pixels.get_pixel(30, 23).0, GRAY);
    assert_eq!(high.pixels.get_pixel(30, 26).0, GRAY);

    // Eight rows below joint A: inside the HD marker radius 10, outside the standard radius 2.
    assert_ne!(high.pixels.get_pixel(10, 28).0, GRAY);
    assert_eq!(standard.pixels.get_pixel(10, 28).0, GRAY);
    assert_eq!(high.pixels.get_pixel(10, 31).0, GRAY);
}

#[test]
fn no_background_renders_skeleton_on_black() {
    let raw = gray_frame(64, 48);
    let comp = FrameCompositor::new(CompositeOpts {
        no_background: true,
        ..CompositeOpts::default()
    });
    let out = comp.composite(&raw, &one_limb(1.0, 1.0));
    assert_eq!(out.pixels.get_pixel(63, 47).0, [0, 0, 0]);
    assert_eq!(out.pixels.get_pixel(30, 20).0, [230, 0, 77]);

    let empty = comp.composite(&raw, &KeypointFrame::default());
    assert!(empty.as_bytes().iter().all(|&b| b == 0));
}

#[test]
fn rgb_frames_get_swapped_colors() {
    let raw = gray_frame(64, 48).into_order(ChannelOrder::Rgb);
    let out = FrameCompositor::default().composite(&raw, &one_limb(1.0, 1.0));
    assert_eq!(out.order, ChannelOrder::Rgb);
    assert_eq!(out.pixels.get_pixel(30, 20).0, [81, 4, 234]);
}

#[test]
fn compositing_is_deterministic() {
    let raw = gray_frame(1400, 40);
    let mut frame = one_limb(1.0, 1.0);
    frame.people[0].hand_left = (0..21)
        .map(|i| kp(100.0 + i as f32 * 7.0, 10.0 + (i % 5) as f32 * 5.0, 0.8))
        .collect();
    frame.people[0].face = (0..70).map(|i| kp(i as f32 * 19.0, 30.0, 0.5)).collect();

    let comp = FrameCompositor::new(CompositeOpts {
        format: SkeletonFormat::Body25,
        no_background: false,
    });
    let a = comp.composite(&raw, &frame);
    let b = comp.composite(&raw, &frame);
    assert_eq!(a.as_bytes(), b.as_bytes());
    assert_ne!(a, raw);
}

#[test]
fn missing_joints_are_skipped() {
    let raw = gray_frame(32, 32);
    let frame = KeypointFrame {
        people: vec![Person {
            pose: vec![kp(5.0, 5.0, 1.0)],
            hand_right: vec![kp(5.0, 5.0, 1.0)],
            ..Person::default()
        }],
    };
    assert_eq!(FrameCompositor::default().composite(&raw, &frame), raw);
}

#[test]
fn blend_weights_are_one_tenth_and_nine_tenths() {
    let mut canvas = RgbImage::from_pixel(1, 1, Rgb([200, 0, 255]));
    let original = RgbImage::from_pixel(1, 1, Rgb([100, 255, 255]));
    blend_into(&mut canvas, &original);
    assert_eq!(canvas.get_pixel(0, 0).0, [190, 26, 255]);
}
