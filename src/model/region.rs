use crate::error::ModelError;
use crate::math::{Aabb, Point3, TOLERANCE};
use crate::surface::{Sense, Surface};

use super::{ModelStore, SurfaceId};

/// A region of space built from surface half-spaces.
///
/// A cell defined by an ordered list of `(surface, sense)` pairs uses an
/// [`Region::Intersection`] of half-spaces; unions and complements cover
/// the rest of constructive solid geometry.
#[derive(Debug, Clone, PartialEq)]
pub enum Region {
    /// All of space. Marks a cell that is deliberately unbounded.
    Unbounded,
    /// One side of a surface.
    Halfspace { surface: SurfaceId, sense: Sense },
    /// Points inside every node.
    Intersection(Vec<Region>),
    /// Points inside at least one node.
    Union(Vec<Region>),
    /// Points outside the node.
    Complement(Box<Region>),
}

/// How points on a surface are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Containment {
    /// Points within tolerance of a surface belong to both sides.
    Closed,
    /// Points must be at least tolerance away from every surface.
    Interior,
}

impl Containment {
    fn opposite(self) -> Self {
        match self {
            Containment::Closed => Containment::Interior,
            Containment::Interior => Containment::Closed,
        }
    }
}

impl Region {
    /// A single half-space.
    #[must_use]
    pub fn halfspace(surface: SurfaceId, sense: Sense) -> Self {
        Region::Halfspace { surface, sense }
    }

    /// The intersection of a list of half-spaces.
    pub fn from_halfspaces(halfspaces: impl IntoIterator<Item = (SurfaceId, Sense)>) -> Self {
        Region::Intersection(
            halfspaces
                .into_iter()
                .map(|(surface, sense)| Region::halfspace(surface, sense))
                .collect(),
        )
    }

    /// The complement of this region.
    #[must_use]
    pub fn complement(self) -> Self {
        Region::Complement(Box::new(self))
    }

    /// Returns `true` if an intersection or union anywhere in the region has
    /// no nodes.
    #[must_use]
    pub fn has_empty_node(&self) -> bool {
        match self {
            Region::Unbounded | Region::Halfspace { .. } => false,
            Region::Intersection(nodes) | Region::Union(nodes) => {
                nodes.is_empty() || nodes.iter().any(Region::has_empty_node)
            }
            Region::Complement(node) => node.has_empty_node(),
        }
    }

    /// Collects every surface referenced by the region.
    #[must_use]
    pub fn surfaces(&self) -> Vec<SurfaceId> {
        let mut out = Vec::new();
        self.collect_surfaces(&mut out);
        out
    }

    fn collect_surfaces(&self, out: &mut Vec<SurfaceId>) {
        match self {
            Region::Unbounded => {}
            Region::Halfspace { surface, .. } => {
                if !out.contains(surface) {
                    out.push(*surface);
                }
            }
            Region::Intersection(nodes) | Region::Union(nodes) => {
                for node in nodes {
                    node.collect_surfaces(out);
                }
            }
            Region::Complement(node) => node.collect_surfaces(out),
        }
    }

    /// Returns `true` if `point` lies in the region; points on a bounding
    /// surface are included.
    ///
    /// # Errors
    ///
    /// Returns an error if a referenced surface is not in `store`.
    pub fn contains(&self, point: &Point3, store: &ModelStore) -> Result<bool, ModelError> {
        self.test(point, store, Containment::Closed)
    }

    /// Returns `true` if `point` lies strictly inside the region, at least
    /// [`TOLERANCE`] away from its bounding surfaces.
    ///
    /// # Errors
    ///
    /// Returns an error if a referenced surface is not in `store`.
    pub fn interior_contains(
        &self,
        point: &Point3,
        store: &ModelStore,
    ) -> Result<bool, ModelError> {
        self.test(point, store, Containment::Interior)
    }

    pub(crate) fn test(
        &self,
        point: &Point3,
        store: &ModelStore,
        mode: Containment,
    ) -> Result<bool, ModelError> {
        match self {
            Region::Unbounded => Ok(true),
            Region::Halfspace { surface, sense } => {
                let value = sense.sign() * store.surface(*surface)?.evaluate(point);
                Ok(match mode {
                    Containment::Closed => value >= -TOLERANCE,
                    Containment::Interior => value > TOLERANCE,
                })
            }
            Region::Intersection(nodes) => {
                for node in nodes {
                    if !node.test(point, store, mode)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Region::Union(nodes) => {
                for node in nodes {
                    if node.test(point, store, mode)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            Region::Complement(node) => Ok(!node.test(point, store, mode.opposite())?),
        }
    }

    /// Computes a box enclosing the region.
    ///
    /// Faces carry the boundary condition of the surface that defines them.
    /// Complements are treated as unbounded.
    ///
    /// # Errors
    ///
    /// Returns an error if a referenced surface is not in `store`.
    pub fn bounds(&self, store: &ModelStore) -> Result<Aabb, ModelError> {
        match self {
            Region::Unbounded | Region::Complement(_) => Ok(Aabb::unbounded()),
            Region::Halfspace { surface, sense } => {
                let data = store.surface(*surface)?;
                Ok(data.shape.halfspace_bounds(*sense, data.boundary))
            }
            Region::Intersection(nodes) => nodes.iter().try_fold(Aabb::unbounded(), |acc, node| {
                Ok(acc.intersection(&node.bounds(store)?))
            }),
            Region::Union(nodes) => {
                let mut iter = nodes.iter();
                let Some(first) = iter.next() else {
                    return Ok(Aabb::unbounded());
                };
                iter.try_fold(first.bounds(store)?, |acc, node| {
                    Ok(acc.union(&node.bounds(store)?))
                })
            }
        }
    }
}
