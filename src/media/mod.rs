/// Streaming frame decoders.
pub mod decode;
/// `ffprobe` stream metadata.
pub mod probe;
