//! Math aliases and the placement transform
//!
//! Scene entities are unit primitives stretched to their footprint, so a
//! placement is a centre, an orientation and per-axis extents.

pub use nalgebra::{Matrix4, Quaternion, Unit, Vector3, Vector4};

/// Single-precision 3-vector
pub type Vec3 = Vector3<f32>;

/// Homogeneous 4-vector used when unprojecting NDC coordinates
pub type Vec4 = Vector4<f32>;

/// Column-major 4x4 matrix
pub type Mat4 = Matrix4<f32>;

/// Single-precision point
pub type Point3 = nalgebra::Point3<f32>;

/// Unit quaternion
pub type Quat = Unit<Quaternion<f32>>;

/// Where a unit primitive sits in the world
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// Centre of the primitive
    pub position: Vec3,
    /// Orientation about the centre
    pub rotation: Quat,
    /// Full extents along the local axes
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::new(Vec3::zeros(), Quat::identity(), Vec3::repeat(1.0))
    }
}

impl Transform {
    /// Unit primitive at the origin
    pub fn identity() -> Self {
        Self::default()
    }

    /// Placement from centre, orientation and extents
    pub const fn new(position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self { position, rotation, scale }
    }

    /// Model matrix: scale, then rotate, then translate
    pub fn to_matrix(&self) -> Mat4 {
        let scaled = Mat4::new_nonuniform_scaling(&self.scale);
        Mat4::new_translation(&self.position) * self.rotation.to_homogeneous() * scaled
    }

    /// Map a local point into world space
    pub fn transform_point(&self, point: Point3) -> Point3 {
        let rotated = self.rotation * point.coords.component_mul(&self.scale);
        Point3::from(rotated + self.position)
    }
}

/// Wrap raw `[x, y, z, w]` quaternion components without renormalizing
///
/// Callers are expected to supply unit quaternions.
pub fn quat_from_xyzw(xyzw: [f32; 4]) -> Quat {
    let [x, y, z, w] = xyzw;
    Unit::new_unchecked(Quaternion::new(w, x, y, z))
}

/// Scalar helpers
pub mod utils {
    /// Degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees.to_radians()
    }

    /// Linear blend from `a` to `b`
    pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
        t.mul_add(b - a, a)
    }
}
