/// Skeleton compositing onto decoded frames.
pub mod composite;
/// Thick-line and disc rasterization with canvas clipping.
pub mod draw;
/// Frame buffers and channel order.
pub mod frame;
