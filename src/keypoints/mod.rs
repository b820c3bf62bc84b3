/// Keypoint record types and the record parser.
pub mod model;
/// Directory/archive enumeration of keypoint records.
pub mod source;
