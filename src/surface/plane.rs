use crate::error::{Result, SurfaceError};
use crate::math::{Aabb, Bound, BoundaryType, Face, Point3, Vector3, TOLERANCE};

use super::{aligned_axis, require_finite, Sense, Surface};

/// An infinite plane `A x + B y + C z + D = 0`.
///
/// Coefficients are normalized so that `evaluate` returns the signed
/// distance to the plane. The positive side is the one the normal points to.
#[derive(Debug, Clone)]
pub struct Plane {
    normal: Vector3,
    offset: f64,
}

impl Plane {
    /// Creates a plane from its general-form coefficients.
    ///
    /// # Errors
    ///
    /// Returns an error if a coefficient is not finite or `(A, B, C)` is
    /// zero-length.
    pub fn new(a: f64, b: f64, c: f64, d: f64) -> Result<Self> {
        let normal = Vector3::new(
            require_finite("A", a)?,
            require_finite("B", b)?,
            require_finite("C", c)?,
        );
        let d = require_finite("D", d)?;
        let len = normal.norm();
        if len < TOLERANCE {
            return Err(SurfaceError::ZeroVector.into());
        }
        Ok(Self {
            normal: normal / len,
            offset: d / len,
        })
    }

    /// Creates a plane through `origin` with the given normal.
    ///
    /// # Errors
    ///
    /// Returns an error if the normal is zero-length or a component is not
    /// finite.
    pub fn from_normal(origin: Point3, normal: Vector3) -> Result<Self> {
        Self::new(normal.x, normal.y, normal.z, -normal.dot(&origin.coords))
    }

    /// The plane `x = x0`; its negative side is `x < x0`.
    ///
    /// # Errors
    ///
    /// Returns an error if `x0` is not finite.
    pub fn x(x0: f64) -> Result<Self> {
        Self::new(1.0, 0.0, 0.0, -x0)
    }

    /// The plane `y = y0`; its negative side is `y < y0`.
    ///
    /// # Errors
    ///
    /// Returns an error if `y0` is not finite.
    pub fn y(y0: f64) -> Result<Self> {
        Self::new(0.0, 1.0, 0.0, -y0)
    }

    /// The plane `z = z0`; its negative side is `z < z0`.
    ///
    /// # Errors
    ///
    /// Returns an error if `z0` is not finite.
    pub fn z(z0: f64) -> Result<Self> {
        Self::new(0.0, 0.0, 1.0, -z0)
    }

    /// Returns the unit normal.
    #[must_use]
    pub fn normal(&self) -> &Vector3 {
        &self.normal
    }

    /// Returns the normalized offset `D`.
    #[must_use]
    pub fn offset(&self) -> f64 {
        self.offset
    }
}

impl Surface for Plane {
    fn evaluate(&self, point: &Point3) -> f64 {
        self.normal.dot(&point.coords) + self.offset
    }

    fn halfspace_bounds(&self, sense: Sense, boundary: BoundaryType) -> Aabb {
        let Some(axis) = aligned_axis(&self.normal) else {
            return Aabb::unbounded();
        };
        // n * x + d = 0 with n = +-1
        let n = self.normal[axis];
        let position = -self.offset * n;
        let upper = (sense == Sense::Negative) == (n > 0.0);
        let face = match (axis, upper) {
            (0, false) => Face::MinX,
            (0, true) => Face::MaxX,
            (1, false) => Face::MinY,
            (1, true) => Face::MaxY,
            (_, false) => Face::MinZ,
            (_, true) => Face::MaxZ,
        };
        Aabb::unbounded().with_face(face, Bound::new(position, boundary))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn evaluate_is_signed_distance() {
        let p = Plane::new(2.0, 0.0, 0.0, -4.0).unwrap();
        assert_relative_eq!(p.evaluate(&Point3::new(5.0, 1.0, 1.0)), 3.0);
        assert_relative_eq!(p.evaluate(&Point3::new(0.0, 0.0, 0.0)), -2.0);
    }

    #[test]
    fn axis_planes() {
        let x = Plane::x(1.5).unwrap();
        let y = Plane::y(-2.0).unwrap();
        let z = Plane::z(0.0).unwrap();
        let pt = Point3::new(1.0, 1.0, 1.0);
        assert!(x.evaluate(&pt) < 0.0);
        assert!(y.evaluate(&pt) > 0.0);
        assert!(z.evaluate(&pt) > 0.0);
    }

    #[test]
    fn from_normal_passes_through_origin() {
        let p =
            Plane::from_normal(Point3::new(1.0, 2.0, 3.0), Vector3::new(1.0, 1.0, 0.0)).unwrap();
        assert_relative_eq!(p.evaluate(&Point3::new(1.0, 2.0, 3.0)), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn zero_normal_is_rejected() {
        assert!(Plane::new(0.0, 0.0, 0.0, 1.0).is_err());
    }

    #[test]
    fn non_finite_is_rejected() {
        assert!(Plane::x(f64::NAN).is_err());
        assert!(Plane::new(f64::INFINITY, 0.0, 0.0, 0.0).is_err());
    }

    #[test]
    fn negative_side_of_x_plane_bounds_max_x() {
        let p = Plane::x(3.0).unwrap();
        let b = p.halfspace_bounds(Sense::Negative, BoundaryType::Reflective);
        assert_relative_eq!(b.face(Face::MaxX).value, 3.0);
        assert_eq!(b.face(Face::MaxX).boundary, BoundaryType::Reflective);
        assert!(b.face(Face::MinX).value.is_infinite());
    }

    #[test]
    fn flipped_normal_bounds_opposite_face() {
        let p = Plane::new(-1.0, 0.0, 0.0, 3.0).unwrap();
        let b = p.halfspace_bounds(Sense::Negative, BoundaryType::Vacuum);
        assert_relative_eq!(b.face(Face::MinX).value, 3.0);
        assert!(b.face(Face::MaxX).value.is_infinite());
    }

    #[test]
    fn oblique_plane_is_unbounded() {
        let p = Plane::new(1.0, 1.0, 0.0, 0.0).unwrap();
        let b = p.halfspace_bounds(Sense::Negative, BoundaryType::Vacuum);
        assert_eq!(b, Aabb::unbounded());
    }
}
