mod cylinder;
mod plane;
mod sphere;

pub use cylinder::Cylinder;
pub use plane::Plane;
pub use sphere::Sphere;

use crate::error::SurfaceError;
use crate::math::{Aabb, BoundaryType, Point3, Vector3, TOLERANCE};

/// Which side of a surface a half-space lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Sense {
    /// Points where the surface function is negative (inside a cylinder).
    Negative,
    /// Points where the surface function is positive (outside a cylinder).
    Positive,
}

impl Sense {
    /// Returns `-1.0` or `1.0`.
    #[must_use]
    pub fn sign(self) -> f64 {
        match self {
            Sense::Negative => -1.0,
            Sense::Positive => 1.0,
        }
    }

    /// Returns the opposite sense.
    #[must_use]
    pub fn flip(self) -> Self {
        match self {
            Sense::Negative => Sense::Positive,
            Sense::Positive => Sense::Negative,
        }
    }
}

/// Trait for implicit surfaces `f(p) = 0`.
///
/// Implementations return a signed distance-like value so that a single
/// tolerance can be applied to every surface kind.
pub trait Surface {
    /// Evaluates the surface function at `point`.
    fn evaluate(&self, point: &Point3) -> f64;

    /// Returns a box enclosing the half-space on the `sense` side.
    ///
    /// Faces derived from this surface carry `boundary`. The box may be
    /// unbounded (and is, whenever no cheap bound exists).
    fn halfspace_bounds(&self, sense: Sense, boundary: BoundaryType) -> Aabb;
}

/// The geometric shape of a surface.
#[derive(Debug, Clone)]
pub enum SurfaceShape {
    /// A plane.
    Plane(Plane),
    /// A cylinder of infinite length.
    Cylinder(Cylinder),
    /// A sphere.
    Sphere(Sphere),
}

impl Surface for SurfaceShape {
    fn evaluate(&self, point: &Point3) -> f64 {
        match self {
            SurfaceShape::Plane(s) => s.evaluate(point),
            SurfaceShape::Cylinder(s) => s.evaluate(point),
            SurfaceShape::Sphere(s) => s.evaluate(point),
        }
    }

    fn halfspace_bounds(&self, sense: Sense, boundary: BoundaryType) -> Aabb {
        match self {
            SurfaceShape::Plane(s) => s.halfspace_bounds(sense, boundary),
            SurfaceShape::Cylinder(s) => s.halfspace_bounds(sense, boundary),
            SurfaceShape::Sphere(s) => s.halfspace_bounds(sense, boundary),
        }
    }
}

impl From<Plane> for SurfaceShape {
    fn from(s: Plane) -> Self {
        SurfaceShape::Plane(s)
    }
}

impl From<Cylinder> for SurfaceShape {
    fn from(s: Cylinder) -> Self {
        SurfaceShape::Cylinder(s)
    }
}

impl From<Sphere> for SurfaceShape {
    fn from(s: Sphere) -> Self {
        SurfaceShape::Sphere(s)
    }
}

fn require_finite(parameter: &'static str, value: f64) -> Result<f64, SurfaceError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SurfaceError::NonFinite { parameter })
    }
}

/// Returns the axis index if `dir` (a unit vector) is parallel to a
/// coordinate axis.
fn aligned_axis(dir: &Vector3) -> Option<usize> {
    (0..3).find(|&a| (dir[a].abs() - 1.0).abs() < TOLERANCE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn sign_matches_sense() {
        assert_relative_eq!(Sense::Negative.sign(), -1.0);
        assert_relative_eq!(Sense::Positive.sign(), 1.0);
    }

    #[test]
    fn flip_is_involution() {
        assert_eq!(Sense::Negative.flip().flip(), Sense::Negative);
        assert_eq!(Sense::Positive.flip(), Sense::Negative);
    }
}
