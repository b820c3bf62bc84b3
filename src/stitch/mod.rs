/// Natural numeric string ordering.
pub mod natural;
/// Segment discovery, concatenation and cleanup.
pub mod stitcher;
