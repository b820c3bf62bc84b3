//! End-to-end overlay runs: decode, composite, chunk, stitch.

/// Frame loop wiring and run options.
pub mod driver;
/// Per-frame PNG output.
pub mod stills;
/// Per-run segment directory.
pub mod workspace;
