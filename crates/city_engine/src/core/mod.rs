//! Core viewer configuration

pub mod config;

pub use config::{
    ViewerConfig, ViewportConfig, MaterialConfig, VisibilityConfig, CameraConfig,
};
