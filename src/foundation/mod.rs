/// Frame indices, frame rates and frame sizes.
pub mod core;
/// Error type shared by every module.
pub mod error;
