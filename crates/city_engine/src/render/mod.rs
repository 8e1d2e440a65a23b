//! Render backend seam
//!
//! The viewer describes each frame as a flat list of draw items and hands it
//! to a [`RenderBackend`]. Shading, meshes and windowing belong to the backend.

pub mod frame;
pub mod headless;

pub use frame::{DrawItem, FrameDescriptor};
pub use headless::{FrameStats, HeadlessBackend};

/// Consumer of frame descriptions
pub trait RenderBackend {
    /// Draw one frame
    fn submit(&mut self, frame: &FrameDescriptor);
}
