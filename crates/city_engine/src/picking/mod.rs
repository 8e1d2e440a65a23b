//! Pointer picking
//!
//! Pixel to NDC conversion, world rays, and nearest-hit resolution against
//! the visible renderables of a registry.

pub mod pointer;
pub mod pick;

pub use pointer::{PickEvent, PointerState};
pub use pick::{pick, Ray};
