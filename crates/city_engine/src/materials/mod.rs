//! Material system
//!
//! Material parameters, the named and height-graded palettes, and the
//! [`MaterialContext`] that caches resolved handles for one scene lifetime.

pub mod material;
pub mod palette;
pub mod material_context;

pub use material::{Material, MaterialHandle};
pub use material_context::MaterialContext;
