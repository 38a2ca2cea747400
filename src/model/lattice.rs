use std::fmt;

use crate::math::{Aabb, Point3, TOLERANCE};

use super::UniverseId;

/// Integer coordinates of a lattice element, counted from the element with
/// the smallest x, y and z.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LatticeIndex {
    pub i: usize,
    pub j: usize,
    pub k: usize,
}

impl LatticeIndex {
    /// Creates a new index.
    #[must_use]
    pub fn new(i: usize, j: usize, k: usize) -> Self {
        Self { i, j, k }
    }
}

impl fmt::Display for LatticeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.i, self.j, self.k)
    }
}

/// Shape and placement of a lattice, passed to
/// [`ModelBuilder::add_lattice`](super::ModelBuilder::add_lattice).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatticeSpec {
    pub(crate) shape: [usize; 3],
    pub(crate) pitch: [f64; 3],
    pub(crate) center: Point3,
    pub(crate) extruded: bool,
}

impl LatticeSpec {
    /// A 2D lattice of `nx` by `ny` elements, infinite along z.
    #[must_use]
    pub fn planar(nx: usize, ny: usize, pitch_x: f64, pitch_y: f64) -> Self {
        Self {
            shape: [nx, ny, 1],
            pitch: [pitch_x, pitch_y, f64::INFINITY],
            center: Point3::origin(),
            extruded: true,
        }
    }

    /// A 3D lattice of `nx` by `ny` by `nz` elements.
    #[must_use]
    pub fn volumetric(shape: [usize; 3], pitch: [f64; 3]) -> Self {
        Self {
            shape,
            pitch,
            center: Point3::origin(),
            extruded: false,
        }
    }

    /// Places the lattice centre at `center` (the origin by default).
    #[must_use]
    pub fn centered_at(mut self, center: Point3) -> Self {
        self.center = center;
        self
    }

    /// Checks dimensions and pitch, returning a reason on failure.
    pub(crate) fn check(&self) -> Result<(), String> {
        let axes = if self.extruded { 2 } else { 3 };
        for a in 0..axes {
            if self.shape[a] == 0 {
                return Err(format!("dimension {a} is zero"));
            }
            if !(self.pitch[a].is_finite() && self.pitch[a] > TOLERANCE) {
                return Err(format!("pitch {} along axis {a} is not positive", self.pitch[a]));
            }
        }
        if !self.center.coords.iter().all(|c| c.is_finite()) {
            return Err("centre is not finite".into());
        }
        if self.element_count().is_none() {
            return Err(format!("{:?} elements overflow the address space", self.shape));
        }
        Ok(())
    }

    fn element_count(&self) -> Option<usize> {
        self.shape.iter().try_fold(1_usize, |n, &d| n.checked_mul(d))
    }
}

/// A regular array of sub-universes.
///
/// Element `(i, j, k)` covers
/// `lower_left + (i, j, k) * pitch .. lower_left + (i + 1, j + 1, k + 1) * pitch`,
/// and its sub-universe is queried in coordinates centred on the element.
/// Extruded lattices ignore z.
#[derive(Debug, Clone)]
pub struct Lattice {
    shape: [usize; 3],
    pitch: [f64; 3],
    center: Point3,
    extruded: bool,
    grid: Vec<Option<UniverseId>>,
    outer: Option<UniverseId>,
}

impl Lattice {
    /// Expects a checked `LatticeSpec`; an oversized shape yields an empty grid.
    pub(crate) fn from_spec(spec: LatticeSpec) -> Self {
        let len = spec.element_count().unwrap_or(0);
        Self {
            shape: spec.shape,
            pitch: spec.pitch,
            center: spec.center,
            extruded: spec.extruded,
            grid: vec![None; len],
            outer: None,
        }
    }

    /// Returns `[nx, ny, nz]`.
    #[must_use]
    pub fn shape(&self) -> [usize; 3] {
        self.shape
    }

    /// Returns the pitch along each axis (infinite along z when extruded).
    #[must_use]
    pub fn pitch(&self) -> [f64; 3] {
        self.pitch
    }

    /// Returns the lattice centre.
    #[must_use]
    pub fn center(&self) -> &Point3 {
        &self.center
    }

    /// Returns `true` for a 2D lattice that ignores z.
    #[must_use]
    pub fn is_extruded(&self) -> bool {
        self.extruded
    }

    /// Returns the universe filling points outside the array, if any.
    #[must_use]
    pub fn outer(&self) -> Option<UniverseId> {
        self.outer
    }

    /// Returns the universe at `index`, or `None` if the index is outside the
    /// array or the element is not filled yet.
    #[must_use]
    pub fn universe_at(&self, index: LatticeIndex) -> Option<UniverseId> {
        self.flat(index).and_then(|n| self.grid[n])
    }

    /// Iterates over the filled elements' universes (with repetitions).
    pub fn universes(&self) -> impl Iterator<Item = UniverseId> + '_ {
        self.grid.iter().filter_map(|u| *u)
    }

    /// Iterates over every index of the array, i fastest.
    pub fn indices(&self) -> impl Iterator<Item = LatticeIndex> {
        let [nx, ny, nz] = self.shape;
        (0..nz).flat_map(move |k| {
            (0..ny).flat_map(move |j| (0..nx).map(move |i| LatticeIndex::new(i, j, k)))
        })
    }

    /// Returns the corner with the smallest coordinates (z is infinite when
    /// extruded).
    #[must_use]
    pub fn lower_left(&self) -> Point3 {
        let mut out = self.center;
        for a in 0..self.axes() {
            out[a] -= self.half_width(a);
        }
        if self.extruded {
            out.z = f64::NEG_INFINITY;
        }
        out
    }

    /// Returns the box covered by the array.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        let min = self.lower_left();
        let mut max = self.center;
        for a in 0..3 {
            max[a] = if a < self.axes() {
                min[a] + self.width(a)
            } else {
                f64::INFINITY
            };
        }
        Aabb::from_corners(min, max)
    }

    /// Computes the element coordinates of `point` without range checks.
    ///
    /// Points within tolerance of the outer faces are clamped onto the
    /// nearest edge element.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn raw_index(&self, point: &Point3) -> [i64; 3] {
        let lower_left = self.lower_left();
        let mut out = [0_i64; 3];
        for a in 0..self.axes() {
            let lower = lower_left[a];
            let n = self.shape[a] as i64;
            let mut index = ((point[a] - lower) / self.pitch[a]).floor() as i64;
            if index == n && point[a] <= lower + self.width(a) + TOLERANCE {
                index = n - 1;
            } else if index == -1 && point[a] >= lower - TOLERANCE {
                index = 0;
            }
            out[a] = index;
        }
        out
    }

    /// Returns the index of the element containing `point`, or `None` if the
    /// point lies outside the array.
    #[must_use]
    pub fn index_for(&self, point: &Point3) -> Option<LatticeIndex> {
        let raw = self.raw_index(point);
        let mut out = [0_usize; 3];
        for a in 0..3 {
            let v = usize::try_from(raw[a]).ok()?;
            if v >= self.shape[a] {
                return None;
            }
            out[a] = v;
        }
        Some(LatticeIndex::new(out[0], out[1], out[2]))
    }

    /// Returns the centre of element `index`; for extruded lattices z is the
    /// lattice centre's z.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn element_center(&self, index: LatticeIndex) -> Point3 {
        let ijk = [index.i, index.j, index.k];
        let lower_left = self.lower_left();
        let mut out = self.center;
        for a in 0..self.axes() {
            out[a] = lower_left[a] + (ijk[a] as f64 + 0.5) * self.pitch[a];
        }
        out
    }

    /// Converts `point` into the coordinates of element `index`.
    #[must_use]
    pub fn local_point(&self, point: &Point3, index: LatticeIndex) -> Point3 {
        let c = self.element_center(index);
        let mut out = *point;
        for a in 0..self.axes() {
            out[a] -= c[a];
        }
        out
    }

    pub(crate) fn set(&mut self, index: LatticeIndex, universe: UniverseId) -> bool {
        match self.flat(index) {
            Some(n) => {
                self.grid[n] = Some(universe);
                true
            }
            None => false,
        }
    }

    pub(crate) fn set_outer(&mut self, universe: UniverseId) {
        self.outer = Some(universe);
    }

    /// Returns the first element without a universe.
    #[must_use]
    pub fn first_unfilled(&self) -> Option<LatticeIndex> {
        self.indices().find(|&index| self.universe_at(index).is_none())
    }

    fn flat(&self, index: LatticeIndex) -> Option<usize> {
        let [nx, ny, nz] = self.shape;
        (index.i < nx && index.j < ny && index.k < nz)
            .then(|| (index.k * ny + index.j) * nx + index.i)
    }

    fn axes(&self) -> usize {
        if self.extruded {
            2
        } else {
            3
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn width(&self, axis: usize) -> f64 {
        self.shape[axis] as f64 * self.pitch[axis]
    }

    fn half_width(&self, axis: usize) -> f64 {
        self.width(axis) / 2.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;
    use slotmap::SlotMap;

    fn pin_lattice(n: usize, pitch: f64) -> Lattice {
        Lattice::from_spec(LatticeSpec::planar(n, n, pitch, pitch))
    }

    #[test]
    fn index_from_lower_left() {
        let l = pin_lattice(17, 1.26);
        let half = 17.0 * 1.26 / 2.0;
        assert_eq!(
            l.index_for(&Point3::new(-half + 0.1, -half + 0.1, 3.0)),
            Some(LatticeIndex::new(0, 0, 0))
        );
        assert_eq!(
            l.index_for(&Point3::new(0.0, 0.0, -50.0)),
            Some(LatticeIndex::new(8, 8, 0))
        );
    }

    #[test]
    fn outer_faces_clamp_to_edge_elements() {
        let l = pin_lattice(2, 1.0);
        assert_eq!(l.index_for(&Point3::new(1.0, -1.0, 0.0)), Some(LatticeIndex::new(1, 0, 0)));
        assert_eq!(l.index_for(&Point3::new(1.0 + 1e-3, 0.0, 0.0)), None);
        assert_eq!(l.index_for(&Point3::new(-1.5, 0.0, 0.0)), None);
        assert_eq!(l.raw_index(&Point3::new(-1.5, 0.0, 0.0)), [-1, 1, 0]);
    }

    #[test]
    fn local_point_is_centred() {
        let spec = LatticeSpec::planar(3, 3, 2.0, 2.0).centered_at(Point3::new(10.0, 0.0, 0.0));
        let l = Lattice::from_spec(spec);
        let p = Point3::new(12.5, 2.0, 7.0);
        let index = l.index_for(&p).unwrap();
        assert_eq!(index, LatticeIndex::new(2, 2, 0));
        let local = l.local_point(&p, index);
        assert_relative_eq!(local.x, 0.5);
        assert_relative_eq!(local.y, 0.0);
        assert_relative_eq!(local.z, 7.0);
    }

    #[test]
    fn volumetric_uses_z() {
        let l = Lattice::from_spec(LatticeSpec::volumetric([2, 2, 4], [1.0, 1.0, 0.5]));
        assert_eq!(
            l.index_for(&Point3::new(-0.5, 0.5, 0.9)),
            Some(LatticeIndex::new(0, 1, 3))
        );
        assert_eq!(l.index_for(&Point3::new(0.0, 0.0, 1.5)), None);
        assert!(l.bounds().is_finite_along(2));
    }

    #[test]
    fn extruded_bounds_are_open_in_z() {
        let l = pin_lattice(2, 1.0);
        let b = l.bounds();
        assert!(b.is_finite_along(0));
        assert!(!b.is_finite_along(2));
        assert!(l.lower_left().z.is_infinite());
    }

    #[test]
    fn bounds_start_at_lower_left() {
        let spec = LatticeSpec::volumetric([4, 2, 3], [0.5, 1.0, 2.0])
            .centered_at(Point3::new(1.0, -2.0, 3.0));
        let l = Lattice::from_spec(spec);
        let corner = l.lower_left();
        assert_relative_eq!(corner.x, 0.0);
        assert_relative_eq!(corner.y, -3.0);
        assert_relative_eq!(corner.z, 0.0);
        assert_eq!(l.bounds().min_point(), corner);
        assert_relative_eq!(l.bounds().max_point().z, 6.0);
        assert_eq!(l.raw_index(&corner), [0, 0, 0]);
        assert_eq!(l.index_for(&Point3::new(1.9, -1.1, 5.9)), Some(LatticeIndex::new(3, 1, 2)));
    }

    #[test]
    fn fill_tracking() {
        let mut universes: SlotMap<UniverseId, ()> = SlotMap::with_key();
        let u = universes.insert(());
        let mut l = pin_lattice(2, 1.0);
        assert_eq!(l.first_unfilled(), Some(LatticeIndex::new(0, 0, 0)));
        for index in l.indices().collect::<Vec<_>>() {
            assert!(l.set(index, u));
        }
        assert!(!l.set(LatticeIndex::new(2, 0, 0), u));
        assert_eq!(l.first_unfilled(), None);
        assert_eq!(l.universes().count(), 4);
    }

    #[test]
    fn spec_checks() {
        assert!(LatticeSpec::planar(0, 1, 1.0, 1.0).check().is_err());
        assert!(LatticeSpec::planar(1, 1, -1.0, 1.0).check().is_err());
        assert!(LatticeSpec::volumetric([1, 1, 1], [1.0, 1.0, f64::INFINITY]).check().is_err());
        assert!(LatticeSpec::planar(17, 17, 1.26, 1.26).check().is_ok());
    }

    #[test]
    fn oversized_shape_is_rejected() {
        let spec = LatticeSpec::volumetric([usize::MAX, 2, 1], [1.0, 1.0, 1.0]);
        let reason = spec.check().unwrap_err();
        assert!(reason.contains("overflow"), "{reason}");
        assert!(LatticeSpec::planar(usize::MAX, usize::MAX, 1.0, 1.0).check().is_err());
        assert!(LatticeSpec::volumetric([1 << 20, 1 << 20, 1], [1.0; 3]).check().is_ok());
    }

    proptest! {
        #[test]
        fn element_centre_maps_back(
            nx in 1usize..20, ny in 1usize..20, nz in 1usize..6,
            px in 0.1f64..5.0, py in 0.1f64..5.0, pz in 0.1f64..5.0,
            cx in -50.0f64..50.0, cy in -50.0f64..50.0, cz in -50.0f64..50.0,
            seed in any::<u64>(),
        ) {
            let spec = LatticeSpec::volumetric([nx, ny, nz], [px, py, pz])
                .centered_at(Point3::new(cx, cy, cz));
            let l = Lattice::from_spec(spec);
            #[allow(clippy::cast_possible_truncation)]
            let pick = |n: usize, salt: u64| (seed.rotate_left(salt as u32) % n as u64) as usize;
            let index = LatticeIndex::new(pick(nx, 0), pick(ny, 21), pick(nz, 42));
            let centre = l.element_center(index);
            prop_assert_eq!(l.index_for(&centre), Some(index));
            let local = l.local_point(&centre, index);
            prop_assert!(local.coords.norm() < 1e-9);
        }
    }
}
