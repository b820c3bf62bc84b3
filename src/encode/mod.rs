//! Segment encoding.
//!
//! Composited frames are buffered by [`chunked::ChunkedWriter`] and flushed as numbered segment
//! files through a [`sink::SegmentEncoder`].

/// Bounded-memory chunked segment writer.
pub mod chunked;
/// `ffmpeg`-based segment encoder and concatenation.
pub mod ffmpeg;
/// Segment encoder and concatenation traits, plus an in-memory encoder.
pub mod sink;
