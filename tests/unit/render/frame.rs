use super::*;

fn size(width: u32, height: u32) -> FrameSize {
    FrameSize { width, height }
}

#[test]
fn from_packed_rejects_wrong_length() {
    assert!(matches!(
        VideoFrame::from_packed(size(2, 2), ChannelOrder::Bgr, vec![0; 11]),
        Err(PoseVizError::Validation(_))
    ));
    let f = VideoFrame::from_packed(size(2, 2), ChannelOrder::Bgr, vec![7; 12]).unwrap();
    assert_eq!(f.size(), size(2, 2));
    assert_eq!(f.as_bytes(), &[7u8; 12][..]);
}

#[test]
fn into_order_swaps_blue_and_red() {
    let f = VideoFrame::from_packed(size(2, 1), ChannelOrder::Bgr, vec![1, 2, 3, 4, 5, 6]).unwrap();
    let rgb = f.into_order(ChannelOrder::Rgb);
    assert_eq!(rgb.order, ChannelOrder::Rgb);
    assert_eq!(rgb.as_bytes(), &[3, 2, 1, 6, 5, 4]);

    let same = rgb.clone().into_order(ChannelOrder::Rgb);
    assert_eq!(same, rgb);
}

#[test]
fn black_frame_is_zeroed() {
    let f = VideoFrame::black(size(3, 2), ChannelOrder::Bgr);
    assert!(f.as_bytes().iter().all(|&b| b == 0));
    assert_eq!(f.as_bytes().len(), 18);
}
