//! Camera and framing

pub mod camera;
pub mod controller;

pub use camera::Camera;
pub use controller::{CameraController, FramingCamera, DEFAULT_EYE};
