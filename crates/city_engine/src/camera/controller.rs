//! Camera controllers
//!
//! The viewer only asks a controller to frame a bounding box once after load
//! and to advance each tick.

use super::camera::Camera;
use crate::core::config::CameraConfig;
use crate::foundation::math::Vec3;
use crate::scene::Aabb;

/// Bird's-eye position used before any bounds are known
pub const DEFAULT_EYE: [f32; 3] = [0.0, 1500.0, 1500.0];

/// Camera collaborator driven by the viewer
pub trait CameraController {
    /// Position the camera so the bounds are in view
    fn fit_to_bounds(&mut self, bounds: &Aabb);

    /// Advance by `dt` seconds
    fn update(&mut self, dt: f32);

    /// Current camera
    fn camera(&self) -> &Camera;
}

/// Static controller that frames bounds from a fixed diagonal
#[derive(Debug, Clone)]
pub struct FramingCamera {
    camera: Camera,
    fit_margin: f32,
}

impl FramingCamera {
    /// Create at the default bird's-eye pose looking at the origin
    pub fn new(config: &CameraConfig, aspect: f32) -> Self {
        Self {
            camera: Camera::from_config(Vec3::from(DEFAULT_EYE), config, aspect),
            fit_margin: config.fit_margin,
        }
    }
}

impl CameraController for FramingCamera {
    fn fit_to_bounds(&mut self, bounds: &Aabb) {
        let center = bounds.center();
        let radius = bounds.radius().max(1.0);
        let distance = radius / (self.camera.fov * 0.5).tan() * self.fit_margin;
        let direction = Vec3::new(0.0, 1.0, 1.0).normalize();

        self.camera.set_position(center + direction * distance);
        self.camera.look_at(center);
        if self.camera.far < distance + radius {
            self.camera.far = distance + radius;
        }
        log::debug!("Camera framed bounds at distance {:.1}", distance);
    }

    fn update(&mut self, _dt: f32) {}

    fn camera(&self) -> &Camera {
        &self.camera
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_pose() {
        let controller = FramingCamera::new(&CameraConfig::default(), 16.0 / 9.0);
        assert_relative_eq!(controller.camera().position, Vec3::from(DEFAULT_EYE));
        assert_relative_eq!(controller.camera().target, Vec3::zeros());
    }

    #[test]
    fn test_fit_to_bounds_centers_and_backs_off() {
        let mut controller = FramingCamera::new(&CameraConfig::default(), 1.0);
        let bounds = Aabb::new(Vec3::new(90.0, 0.0, -10.0), Vec3::new(110.0, 20.0, 10.0));
        controller.fit_to_bounds(&bounds);

        let camera = controller.camera();
        assert_relative_eq!(camera.target, Vec3::new(100.0, 10.0, 0.0));

        let expected = bounds.radius() / 30f32.to_radians().tan() * 1.2;
        assert_relative_eq!((camera.position - camera.target).norm(), expected, epsilon = 1e-3);
        assert!(camera.position.y > camera.target.y);
        assert!(camera.screen_to_world_ray(0.0, 0.0).is_some());
    }

    #[test]
    fn test_far_plane_grows_for_large_cities() {
        let mut controller = FramingCamera::new(&CameraConfig::default(), 1.0);
        let bounds = Aabb::new(Vec3::new(-9000.0, 0.0, -9000.0), Vec3::new(9000.0, 100.0, 9000.0));
        controller.fit_to_bounds(&bounds);
        assert!(controller.camera().far > 10_000.0);
    }
}
