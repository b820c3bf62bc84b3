use crate::encode::sink::InMemorySegmentEncoder;
use crate::render::frame::{ChannelOrder, VideoFrame};

use super::*;

fn frame(i: u64) -> CompositedFrame {
    CompositedFrame {
        index: FrameIndex(i),
        keypoint_name: format!("{i}_keypoints.json"),
        frame: VideoFrame::from_packed(
            crate::foundation::core::FrameSize {
                width: 2,
                height: 1,
            },
            ChannelOrder::Bgr,
            vec![i as u8; 6],
        )
        .unwrap(),
    }
}

fn opts(max: Option<usize>) -> ChunkOpts {
    ChunkOpts {
        dir: PathBuf::from("/tmp/chunks"),
        stem: "out".to_owned(),
        extension: ".mp4".to_owned(),
        max_frames_per_chunk: max,
    }
}

fn fps() -> Fps {
    Fps::new(30, 1).unwrap()
}

fn write_all(n: u64, max: Option<usize>) -> (Vec<Segment>, InMemorySegmentEncoder) {
    let mut enc = InMemorySegmentEncoder::new();
    let mut w = ChunkedWriter::new(opts(max), fps(), &mut enc).unwrap();
    for i in 0..n {
        w.push(frame(i)).unwrap();
    }
    let segs = w.finish().unwrap();
    (segs, enc)
}

#[test]
fn segment_names_embed_chunk_number() {
    assert_eq!(segment_file_name("clip", 1, ".mp4"), "clip_1.mp4");
    assert_eq!(segment_file_name("clip", 10, ".mp4"), "clip_10.mp4");
}

#[test]
fn opts_follow_output_stem_and_extension() {
    let o = ChunkOpts::for_output("/tmp/x", Path::new("/data/final.mp4"), Some(5));
    assert_eq!(o.stem, "final");
    assert_eq!(o.extension, ".mp4");
    assert_eq!(o.dir, PathBuf::from("/tmp/x"));
}

#[test]
fn three_frames_chunk_two_gives_two_segments() {
    let (segs, enc) = write_all(3, Some(2));
    assert_eq!(segs.len(), 2);
    assert_eq!(segs[0].frames, 2);
    assert_eq!(segs[1].frames, 1);
    assert_eq!(segs[0].path, PathBuf::from("/tmp/chunks/out_1.mp4"));
    assert_eq!(segs[1].path, PathBuf::from("/tmp/chunks/out_2.mp4"));
    assert_eq!((segs[1].first, segs[1].last), (FrameIndex(2), FrameIndex(2)));
    assert_eq!(enc.segments()[0].1.fps, fps());
}

#[test]
fn chunk_sizes_preserve_every_frame_in_order() {
    let n = 8u64;
    for k in [1usize, 4, 8, 9] {
        let (segs, enc) = write_all(n, Some(k));
        assert_eq!(segs.len(), (n as usize).div_ceil(k), "k={k}");
        let order: Vec<u64> = enc
            .segments()
            .iter()
            .flat_map(|(_, _, frames)| frames.iter().map(|f| f.index.0))
            .collect();
        assert_eq!(order, (0..n).collect::<Vec<_>>(), "k={k}");
        assert!(segs.iter().all(|s| s.frames <= k));
        let numbers: Vec<usize> = segs.iter().map(|s| s.number).collect();
        assert_eq!(numbers, (1..=segs.len()).collect::<Vec<_>>());
    }
}

#[test]
fn unbounded_chunk_writes_one_segment() {
    let (segs, _) = write_all(250, None);
    assert_eq!(segs.len(), 1);
    assert_eq!(segs[0].frames, 250);
}

#[test]
fn full_buffer_waits_for_the_next_frame() {
    let mut enc = InMemorySegmentEncoder::new();
    let mut w = ChunkedWriter::new(opts(Some(2)), fps(), &mut enc).unwrap();
    w.push(frame(0)).unwrap();
    w.push(frame(1)).unwrap();
    assert!(w.segments().is_empty());
    assert_eq!(w.buffered(), 2);
    w.push(frame(2)).unwrap();
    assert_eq!(w.segments().len(), 1);
    assert_eq!(w.buffered(), 1);
}

#[test]
fn empty_stream_writes_nothing() {
    let (segs, enc) = write_all(0, Some(3));
    assert!(segs.is_empty());
    assert!(enc.segments().is_empty());
}

#[test]
fn rejects_zero_chunk_and_out_of_order_frames() {
    let mut enc = InMemorySegmentEncoder::new();
    assert!(matches!(
        ChunkedWriter::new(opts(Some(0)), fps(), &mut enc),
        Err(PoseVizError::Config(_))
    ));

    let mut w = ChunkedWriter::new(opts(None), fps(), &mut enc).unwrap();
    w.push(frame(3)).unwrap();
    assert!(matches!(
        w.push(frame(3)),
        Err(PoseVizError::Validation(_))
    ));
    assert!(matches!(
        w.push(frame(1)),
        Err(PoseVizError::Validation(_))
    ));
}

#[test]
fn mixed_frame_sizes_are_a_validation_error() {
    let mut enc = InMemorySegmentEncoder::new();
    let mut w = ChunkedWriter::new(opts(None), fps(), &mut enc).unwrap();
    w.push(frame(0)).unwrap();
    let wide = CompositedFrame {
        index: FrameIndex(1),
        keypoint_name: "1_keypoints.json".to_owned(),
        frame: VideoFrame::black(
            crate::foundation::core::FrameSize {
                width: 4,
                height: 1,
            },
            ChannelOrder::Bgr,
        ),
    };
    let err = w.push(wide).unwrap_err();
    assert!(matches!(err, PoseVizError::Validation(_)), "{err}");
    assert_eq!(w.buffered(), 1);
}
