use crate::error::{Result, SurfaceError};
use crate::math::{Aabb, Bound, BoundaryType, Face, Point3, Vector3, TOLERANCE};

use super::{require_finite, Sense, Surface};

/// A sphere; the negative side is its interior.
#[derive(Debug, Clone)]
pub struct Sphere {
    center: Point3,
    radius: f64,
}

impl Sphere {
    /// Creates a new sphere.
    ///
    /// # Errors
    ///
    /// Returns an error if the radius is non-positive or a parameter is not
    /// finite.
    pub fn new(center: Point3, radius: f64) -> Result<Self> {
        let radius = require_finite("radius", radius)?;
        if radius < TOLERANCE {
            return Err(SurfaceError::NonPositive {
                parameter: "radius",
                value: radius,
            }
            .into());
        }
        if !center.coords.iter().all(|c| c.is_finite()) {
            return Err(SurfaceError::NonFinite { parameter: "center" }.into());
        }
        Ok(Self { center, radius })
    }

    /// Returns the center of the sphere.
    #[must_use]
    pub fn center(&self) -> &Point3 {
        &self.center
    }

    /// Returns the radius.
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }
}

impl Surface for Sphere {
    fn evaluate(&self, point: &Point3) -> f64 {
        (point - self.center).norm() - self.radius
    }

    fn halfspace_bounds(&self, sense: Sense, boundary: BoundaryType) -> Aabb {
        match sense {
            Sense::Positive => Aabb::unbounded(),
            Sense::Negative => {
                let r = Vector3::repeat(self.radius);
                let b = Aabb::from_corners(self.center - r, self.center + r);
                Face::ALL.iter().fold(b, |acc, &face| {
                    let value = acc.face(face).value;
                    acc.with_face(face, Bound::new(value, boundary))
                })
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn evaluate_signed_distance() {
        let s = Sphere::new(Point3::new(1.0, 0.0, 0.0), 2.0).unwrap();
        assert_relative_eq!(s.evaluate(&Point3::new(1.0, 0.0, 0.0)), -2.0);
        assert_relative_eq!(s.evaluate(&Point3::new(1.0, 0.0, 5.0)), 3.0);
    }

    #[test]
    fn invalid_radius() {
        assert!(Sphere::new(Point3::origin(), 0.0).is_err());
    }

    #[test]
    fn interior_bounds() {
        let s = Sphere::new(Point3::new(0.0, 0.0, 1.0), 1.0).unwrap();
        let b = s.halfspace_bounds(Sense::Negative, BoundaryType::Vacuum);
        assert_relative_eq!(b.face(Face::MinZ).value, 0.0);
        assert_relative_eq!(b.face(Face::MaxZ).value, 2.0);
        assert_eq!(b.face(Face::MaxX).boundary, BoundaryType::Vacuum);
    }
}
