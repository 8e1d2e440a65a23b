//! # Viewer Configuration
//!
//! All tunables of the viewer in one serializable structure. Every field has a
//! default so a partial TOML/RON file only needs to name what it changes.
//!
//! ## Configuration Categories
//!
//! - **Transport**: generator API location and request timeout
//! - **Viewport**: pixel size used for pointer-to-NDC conversion
//! - **Materials**: graded palette resolution and fallback height
//! - **Visibility**: layers enabled when a scene is first shown
//! - **Camera**: projection and framing parameters

use serde::{Serialize, Deserialize};

pub use crate::config::{Config, ConfigError};

/// Default generator API base URL
pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:3000/api";

/// Surface layer name, the only layer enabled by default
pub const SURFACE_LAYER: &str = "surface";

/// # Viewer Configuration
///
/// Root configuration consumed by the application and by [`crate::viewer::CityViewer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Base URL of the generator API (`/scene` is appended)
    pub api_base_url: String,
    /// HTTP request timeout in seconds
    pub request_timeout_secs: u64,
    /// Log level used when `RUST_LOG` is unset
    pub log_level: String,
    /// Interval between render ticks in milliseconds
    pub tick_interval_ms: u64,
    /// Viewport dimensions
    pub viewport: ViewportConfig,
    /// Material resolution settings
    pub materials: MaterialConfig,
    /// Initial visibility settings
    pub visibility: VisibilityConfig,
    /// Camera settings
    pub camera: CameraConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: 30,
            log_level: "info".to_string(),
            tick_interval_ms: 16,
            viewport: ViewportConfig::default(),
            materials: MaterialConfig::default(),
            visibility: VisibilityConfig::default(),
            camera: CameraConfig::default(),
        }
    }
}

impl Config for ViewerConfig {}

impl ViewerConfig {
    /// Override the API base URL
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Override the log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("api_base_url cannot be empty".to_string()));
        }
        if self.viewport.width == 0 || self.viewport.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "viewport must be non-zero, got {}x{}",
                self.viewport.width, self.viewport.height
            )));
        }
        if self.materials.graded_steps == 0 {
            return Err(ConfigError::Invalid("materials.graded_steps must be at least 1".to_string()));
        }
        let height = self.materials.default_max_height;
        if height.is_nan() || height <= 0.0 {
            return Err(ConfigError::Invalid("materials.default_max_height must be positive".to_string()));
        }
        let (near, far) = (self.camera.near, self.camera.far);
        if near.is_nan() || far.is_nan() || near <= 0.0 || far <= near {
            return Err(ConfigError::Invalid("camera planes must satisfy 0 < near < far".to_string()));
        }
        Ok(())
    }
}

/// Viewport size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self { width: 1920, height: 1080 }
    }
}

impl ViewportConfig {
    /// Width over height
    #[allow(clippy::cast_precision_loss)]
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

/// Material resolution settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialConfig {
    /// Number of discrete steps in the height-graded building palette
    pub graded_steps: u32,
    /// Max building height assumed when a scene has no buildings
    pub default_max_height: f32,
}

impl Default for MaterialConfig {
    fn default() -> Self {
        Self {
            graded_steps: 8,
            default_max_height: 60.0,
        }
    }
}

/// Initial visibility settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisibilityConfig {
    /// Layers enabled when a scene is loaded
    pub default_layers: Vec<String>,
}

impl Default for VisibilityConfig {
    fn default() -> Self {
        Self {
            default_layers: vec![SURFACE_LAYER.to_string()],
        }
    }
}

/// Camera projection and framing settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
    /// Extra distance factor applied when framing bounds
    pub fit_margin: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 60.0,
            near: 1.0,
            far: 10_000.0,
            fit_margin: 1.2,
        }
    }
}
