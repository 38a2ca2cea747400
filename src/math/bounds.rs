use super::{Point3, TOLERANCE};

/// Boundary condition attached to a surface or to a face of the geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BoundaryType {
    /// Particles leaving through the face are lost.
    Vacuum,
    /// Particles are mirrored back into the geometry.
    Reflective,
    /// Particles re-enter through the opposite face.
    Periodic,
    /// Internal surface without a boundary condition.
    #[default]
    Interface,
}

/// One of the six faces of an axis-aligned box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Face {
    MinX,
    MaxX,
    MinY,
    MaxY,
    MinZ,
    MaxZ,
}

impl Face {
    /// All faces, in axis order.
    pub const ALL: [Face; 6] = [
        Face::MinX,
        Face::MaxX,
        Face::MinY,
        Face::MaxY,
        Face::MinZ,
        Face::MaxZ,
    ];

    /// Returns the axis index (0 = x, 1 = y, 2 = z).
    #[must_use]
    pub fn axis(self) -> usize {
        match self {
            Face::MinX | Face::MaxX => 0,
            Face::MinY | Face::MaxY => 1,
            Face::MinZ | Face::MaxZ => 2,
        }
    }

    /// Returns `true` for the upper face of its axis.
    #[must_use]
    pub fn is_max(self) -> bool {
        matches!(self, Face::MaxX | Face::MaxY | Face::MaxZ)
    }
}

/// A coordinate bound on one face together with its boundary condition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bound {
    /// Coordinate of the face along its axis.
    pub value: f64,
    /// Boundary condition of the surface that defines the face.
    pub boundary: BoundaryType,
}

impl Bound {
    /// Creates a new bound.
    #[must_use]
    pub fn new(value: f64, boundary: BoundaryType) -> Self {
        Self { value, boundary }
    }

    fn lower_unbounded() -> Self {
        Self::new(f64::NEG_INFINITY, BoundaryType::Interface)
    }

    fn upper_unbounded() -> Self {
        Self::new(f64::INFINITY, BoundaryType::Interface)
    }

    /// Picks between two bounds at the same coordinate, preferring one that
    /// carries a boundary condition.
    fn prefer(self, other: Self, other_wins: bool) -> Self {
        if (self.value - other.value).abs() <= TOLERANCE
            || (self.value.is_infinite() && self.value == other.value)
        {
            if self.boundary == BoundaryType::Interface {
                other
            } else {
                self
            }
        } else if other_wins {
            other
        } else {
            self
        }
    }
}

/// An axis-aligned bounding box whose faces carry boundary conditions.
///
/// Any face may be infinite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    min: [Bound; 3],
    max: [Bound; 3],
}

impl Default for Aabb {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl Aabb {
    /// A box covering all of space.
    #[must_use]
    pub fn unbounded() -> Self {
        Self {
            min: [Bound::lower_unbounded(); 3],
            max: [Bound::upper_unbounded(); 3],
        }
    }

    /// Creates a box from two corners with no boundary conditions.
    #[must_use]
    pub fn from_corners(min: Point3, max: Point3) -> Self {
        let b = |v: f64| Bound::new(v, BoundaryType::Interface);
        Self {
            min: [b(min.x), b(min.y), b(min.z)],
            max: [b(max.x), b(max.y), b(max.z)],
        }
    }

    /// Returns a copy of this box with one face replaced.
    #[must_use]
    pub fn with_face(mut self, face: Face, bound: Bound) -> Self {
        if face.is_max() {
            self.max[face.axis()] = bound;
        } else {
            self.min[face.axis()] = bound;
        }
        self
    }

    /// Returns the bound of a face.
    #[must_use]
    pub fn face(&self, face: Face) -> Bound {
        if face.is_max() {
            self.max[face.axis()]
        } else {
            self.min[face.axis()]
        }
    }

    /// Returns the minimum corner (components may be infinite).
    #[must_use]
    pub fn min_point(&self) -> Point3 {
        Point3::new(self.min[0].value, self.min[1].value, self.min[2].value)
    }

    /// Returns the maximum corner (components may be infinite).
    #[must_use]
    pub fn max_point(&self) -> Point3 {
        Point3::new(self.max[0].value, self.max[1].value, self.max[2].value)
    }

    /// Returns `true` if the box is finite along `axis`.
    #[must_use]
    pub fn is_finite_along(&self, axis: usize) -> bool {
        self.min[axis].value.is_finite() && self.max[axis].value.is_finite()
    }

    /// Returns `true` if no point lies inside the box.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        (0..3).any(|a| self.min[a].value > self.max[a].value + TOLERANCE)
    }

    /// Returns `true` if `point` lies inside the box or within tolerance of
    /// its faces.
    #[must_use]
    pub fn contains(&self, point: &Point3) -> bool {
        (0..3).all(|a| {
            point[a] >= self.min[a].value - TOLERANCE && point[a] <= self.max[a].value + TOLERANCE
        })
    }

    /// Returns the box covered by both `self` and `other`.
    #[must_use]
    pub fn intersection(&self, other: &Aabb) -> Aabb {
        let mut out = *self;
        for a in 0..3 {
            out.min[a] = self.min[a].prefer(other.min[a], other.min[a].value > self.min[a].value);
            out.max[a] = self.max[a].prefer(other.max[a], other.max[a].value < self.max[a].value);
        }
        out
    }

    /// Returns the smallest box covering both `self` and `other`.
    #[must_use]
    pub fn union(&self, other: &Aabb) -> Aabb {
        let mut out = *self;
        for a in 0..3 {
            out.min[a] = self.min[a].prefer(other.min[a], other.min[a].value < self.min[a].value);
            out.max[a] = self.max[a].prefer(other.max[a], other.max[a].value > self.max[a].value);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> Aabb {
        Aabb::from_corners(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn unbounded_contains_everything() {
        let b = Aabb::unbounded();
        assert!(b.contains(&Point3::new(1e9, -1e9, 0.0)));
        assert!(!b.is_finite_along(0));
    }

    #[test]
    fn contains_is_closed() {
        let b = unit_box();
        assert!(b.contains(&Point3::new(1.0, 0.0, 0.5)));
        assert!(!b.contains(&Point3::new(1.1, 0.5, 0.5)));
    }

    #[test]
    fn intersection_takes_tighter_faces() {
        let a = unit_box();
        let b = Aabb::from_corners(Point3::new(0.5, -1.0, 0.0), Point3::new(2.0, 0.5, 1.0));
        let c = a.intersection(&b);
        assert_eq!(c.min_point(), Point3::new(0.5, 0.0, 0.0));
        assert_eq!(c.max_point(), Point3::new(1.0, 0.5, 1.0));
    }

    #[test]
    fn union_takes_looser_faces() {
        let a = unit_box();
        let b = Aabb::from_corners(Point3::new(0.5, -1.0, 0.0), Point3::new(2.0, 0.5, 1.0));
        let c = a.union(&b);
        assert_eq!(c.min_point(), Point3::new(0.0, -1.0, 0.0));
        assert_eq!(c.max_point(), Point3::new(2.0, 1.0, 1.0));
    }

    #[test]
    fn intersection_keeps_boundary_condition_on_tie() {
        let a = unit_box();
        let b = Aabb::unbounded().with_face(Face::MaxX, Bound::new(1.0, BoundaryType::Reflective));
        let c = a.intersection(&b);
        assert_eq!(c.face(Face::MaxX).boundary, BoundaryType::Reflective);
        let d = b.intersection(&a);
        assert_eq!(d.face(Face::MaxX).boundary, BoundaryType::Reflective);
    }

    #[test]
    fn disjoint_intersection_is_empty() {
        let a = unit_box();
        let b = Aabb::from_corners(Point3::new(2.0, 2.0, 2.0), Point3::new(3.0, 3.0, 3.0));
        assert!(a.intersection(&b).is_empty());
        assert!(!a.is_empty());
    }
}
