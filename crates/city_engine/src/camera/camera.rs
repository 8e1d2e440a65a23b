//! # 3D Camera
//!
//! Perspective camera with look-at orientation and ray unprojection.
//!
//! # Coordinate System
//! Right-handed, Y-up. NDC follows the OpenGL convention: x right, y up,
//! depth in [-1, 1].

use crate::core::config::CameraConfig;
use crate::foundation::math::{Mat4, Point3, Vec3, Vec4, utils};
use crate::picking::Ray;

/// Perspective camera
#[derive(Debug, Clone)]
pub struct Camera {
    /// Camera position in world space
    pub position: Vec3,

    /// Point the camera is looking at in world space
    pub target: Vec3,

    /// Up vector for camera orientation (typically [0, 1, 0])
    pub up: Vec3,

    /// Vertical field of view in radians
    pub fov: f32,

    /// Aspect ratio (width / height)
    pub aspect: f32,

    /// Distance to near clipping plane
    pub near: f32,

    /// Distance to far clipping plane
    pub far: f32,
}

impl Camera {
    /// Create a perspective camera looking at the origin
    ///
    /// # Arguments
    /// * `position` - Camera position in world space
    /// * `fov_degrees` - Vertical field of view in degrees
    /// * `aspect` - Width over height of the viewport
    /// * `near` - Near clipping plane (must be > 0)
    /// * `far` - Far clipping plane (must be > near)
    pub fn perspective(position: Vec3, fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            position,
            target: Vec3::zeros(),
            up: Vec3::new(0.0, 1.0, 0.0),
            fov: utils::deg_to_rad(fov_degrees),
            aspect,
            near,
            far,
        }
    }

    /// Create a camera from configuration
    pub fn from_config(position: Vec3, config: &CameraConfig, aspect: f32) -> Self {
        Self::perspective(position, config.fov_degrees, aspect, config.near, config.far)
    }

    /// Update camera position
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        log::trace!("Camera position updated to: {:?}", position);
    }

    /// Point the camera at a target
    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
    }

    /// Unit vector from position towards target
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize()
    }

    /// World-to-view matrix
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(&Point3::from(self.position), &Point3::from(self.target), &self.up)
    }

    /// View-to-clip matrix
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::new_perspective(self.aspect, self.fov, self.near, self.far)
    }

    /// Combined view-projection matrix
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// World ray through an NDC point
    ///
    /// Returns `None` if the view-projection matrix is singular, e.g. when
    /// position equals target.
    pub fn screen_to_world_ray(&self, ndc_x: f32, ndc_y: f32) -> Option<Ray> {
        let inv_view_proj = self.view_projection_matrix().try_inverse()?;

        let unproject = |depth: f32| {
            let h = inv_view_proj * Vec4::new(ndc_x, ndc_y, depth, 1.0);
            Vec3::new(h.x / h.w, h.y / h.w, h.z / h.w)
        };
        let world_near = unproject(-1.0);
        let world_far = unproject(1.0);

        let direction = world_far - world_near;
        if !direction.iter().all(|c| c.is_finite()) || direction.norm() == 0.0 {
            return None;
        }
        Some(Ray::new(self.position, direction))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_center_ray_points_at_target() {
        let mut camera = Camera::perspective(Vec3::new(0.0, 100.0, 100.0), 60.0, 16.0 / 9.0, 1.0, 1000.0);
        camera.look_at(Vec3::zeros());

        let ray = camera.screen_to_world_ray(0.0, 0.0).unwrap();
        assert_relative_eq!(ray.direction, camera.forward(), epsilon = 1e-4);
        assert_relative_eq!(ray.origin, camera.position);
    }

    #[test]
    fn test_top_of_screen_points_higher() {
        let camera = Camera::perspective(Vec3::new(0.0, 0.0, 10.0), 60.0, 1.0, 0.1, 100.0);
        let center = camera.screen_to_world_ray(0.0, 0.0).unwrap();
        let top = camera.screen_to_world_ray(0.0, 1.0).unwrap();
        let right = camera.screen_to_world_ray(1.0, 0.0).unwrap();

        assert!(top.direction.y > center.direction.y);
        assert!(right.direction.x > center.direction.x);
        // The top edge sits at half the field of view
        assert_relative_eq!(top.direction.y / -top.direction.z, (30.0f32).to_radians().tan(), epsilon = 1e-3);
    }

    #[test]
    fn test_degenerate_camera_has_no_ray() {
        let camera = Camera::perspective(Vec3::zeros(), 60.0, 1.0, 0.1, 100.0);
        assert!(camera.screen_to_world_ray(0.0, 0.0).is_none());
    }
}
