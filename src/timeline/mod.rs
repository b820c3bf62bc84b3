/// Frame-range planning and decoder synchronization.
pub mod range;
