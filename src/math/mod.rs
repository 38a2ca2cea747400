mod bounds;

pub use bounds::{Aabb, Bound, BoundaryType, Face};

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Global geometric tolerance for floating-point comparisons.
///
/// Points closer than this to a surface are considered to lie on it.
pub const TOLERANCE: f64 = 1e-10;
