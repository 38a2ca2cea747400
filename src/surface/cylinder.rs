use crate::error::{Result, SurfaceError};
use crate::math::{Aabb, Bound, BoundaryType, Face, Point3, Vector3, TOLERANCE};

use super::{aligned_axis, require_finite, Sense, Surface};

/// An infinite circular cylinder.
///
/// Defined by a point on the axis, the axis direction and a radius.
/// `evaluate` returns the distance to the axis minus the radius, so the
/// negative side is the inside of the cylinder.
#[derive(Debug, Clone)]
pub struct Cylinder {
    center: Point3,
    axis: Vector3,
    radius: f64,
}

impl Cylinder {
    /// Creates a new cylinder.
    ///
    /// # Arguments
    ///
    /// * `center` - A point on the cylinder axis
    /// * `axis` - Axis direction (will be normalized)
    /// * `radius` - Radius (must be positive)
    ///
    /// # Errors
    ///
    /// Returns an error if the radius is non-positive, the axis is
    /// zero-length, or a parameter is not finite.
    pub fn new(center: Point3, axis: Vector3, radius: f64) -> Result<Self> {
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

        let axis_len = axis.norm();
        if !axis_len.is_finite() {
            return Err(SurfaceError::NonFinite { parameter: "axis" }.into());
        }
        if axis_len < TOLERANCE {
            return Err(SurfaceError::ZeroVector.into());
        }

        Ok(Self {
            center,
            axis: axis / axis_len,
            radius,
        })
    }

    /// A cylinder parallel to the z axis through `(x0, y0)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the radius is non-positive or a parameter is not
    /// finite.
    pub fn z(x0: f64, y0: f64, radius: f64) -> Result<Self> {
        Self::new(Point3::new(x0, y0, 0.0), Vector3::z(), radius)
    }

    /// Returns the point on the axis.
    #[must_use]
    pub fn center(&self) -> &Point3 {
        &self.center
    }

    /// Returns the axis direction (unit vector).
    #[must_use]
    pub fn axis(&self) -> &Vector3 {
        &self.axis
    }

    /// Returns the radius.
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }
}

impl Surface for Cylinder {
    fn evaluate(&self, point: &Point3) -> f64 {
        let dp = point - self.center;
        let radial = dp - self.axis * dp.dot(&self.axis);
        radial.norm() - self.radius
    }

    fn halfspace_bounds(&self, sense: Sense, boundary: BoundaryType) -> Aabb {
        if sense == Sense::Positive {
            return Aabb::unbounded();
        }
        let Some(axis) = aligned_axis(&self.axis) else {
            return Aabb::unbounded();
        };
        let min_faces = [Face::MinX, Face::MinY, Face::MinZ];
        let max_faces = [Face::MaxX, Face::MaxY, Face::MaxZ];
        let mut out = Aabb::unbounded();
        for a in (0..3).filter(|&a| a != axis) {
            out = out
                .with_face(min_faces[a], Bound::new(self.center[a] - self.radius, boundary))
                .with_face(max_faces[a], Bound::new(self.center[a] + self.radius, boundary));
        }
        out
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn inside_is_negative() {
        let c = Cylinder::z(0.0, 0.0, 0.5).unwrap();
        assert!(c.evaluate(&Point3::new(0.0, 0.0, 100.0)) < 0.0);
        assert!(c.evaluate(&Point3::new(1.0, 1.0, 0.0)) > 0.0);
    }

    #[test]
    fn evaluate_is_radial_distance() {
        let c = Cylinder::z(1.0, 1.0, 0.5).unwrap();
        assert_relative_eq!(c.evaluate(&Point3::new(3.0, 1.0, -7.0)), 1.5);
    }

    #[test]
    fn arbitrary_axis() {
        let c = Cylinder::new(Point3::origin(), Vector3::new(1.0, 1.0, 0.0), 1.0).unwrap();
        // on the axis
        assert_relative_eq!(c.evaluate(&Point3::new(2.0, 2.0, 0.0)), -1.0, epsilon = 1e-12);
        assert_relative_eq!(c.evaluate(&Point3::new(0.0, 0.0, 3.0)), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn invalid_radius() {
        assert!(Cylinder::z(0.0, 0.0, 0.0).is_err());
        assert!(Cylinder::z(0.0, 0.0, -1.0).is_err());
        assert!(Cylinder::z(0.0, 0.0, f64::NAN).is_err());
    }

    #[test]
    fn zero_axis() {
        assert!(Cylinder::new(Point3::origin(), Vector3::zeros(), 1.0).is_err());
    }

    #[test]
    fn inside_bounds_span_diameter() {
        let c = Cylinder::z(1.0, -1.0, 0.5).unwrap();
        let b = c.halfspace_bounds(Sense::Negative, BoundaryType::Interface);
        assert_relative_eq!(b.face(Face::MinX).value, 0.5);
        assert_relative_eq!(b.face(Face::MaxX).value, 1.5);
        assert_relative_eq!(b.face(Face::MinY).value, -1.5);
        assert!(!b.is_finite_along(2));
    }

    #[test]
    fn outside_is_unbounded() {
        let c = Cylinder::z(0.0, 0.0, 0.5).unwrap();
        assert_eq!(c.halfspace_bounds(Sense::Positive, BoundaryType::Interface), Aabb::unbounded());
    }
}
