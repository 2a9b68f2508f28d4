pub use ::nalgebra;
pub use ::nalgebra::{Matrix2, Matrix3, Matrix4};
pub use ::nalgebra::{Vector2, Vector3, Vector4};
pub use ::nalgebra::Unit;
pub use geometry::*;

pub mod geometry {
    pub use ::nalgebra::geometry::*;
}
