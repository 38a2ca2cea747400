use crate::error::ModelError;
use crate::math::{Point3, Vector3};
use crate::surface::Sense;

use super::{ModelStore, Region, SurfaceId, UniverseId};

slotmap::new_key_type! {
    /// Unique identifier for a cell in the model store.
    pub struct CellId;
}

/// Opaque handle to a material owned by an external material catalog.
///
/// The geometry stores and forwards it without interpretation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MaterialId(pub u32);

/// The content of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fill {
    /// A terminal cell filled with a material.
    Material(MaterialId),
    /// A cell filled with a nested universe or lattice.
    Universe(UniverseId),
}

/// Data associated with a cell.
#[derive(Debug, Clone)]
pub struct CellData {
    /// Unique name of the cell.
    pub name: String,
    /// The region the cell occupies.
    pub region: Region,
    /// What the cell is filled with.
    pub fill: Fill,
    /// Offset of the fill universe's origin in this cell's coordinates.
    pub translation: Option<Vector3>,
}

impl CellData {
    /// Returns `true` if `point` lies in the cell's region.
    ///
    /// # Errors
    ///
    /// Returns an error if a bounding surface is not in `store`.
    pub fn contains(&self, point: &Point3, store: &ModelStore) -> Result<bool, ModelError> {
        self.region.contains(point, store)
    }

    /// Returns what the cell is filled with.
    #[must_use]
    pub fn fill(&self) -> &Fill {
        &self.fill
    }

    /// Returns the material of a terminal cell.
    #[must_use]
    pub fn material(&self) -> Option<MaterialId> {
        match self.fill {
            Fill::Material(m) => Some(m),
            Fill::Universe(_) => None,
        }
    }

    /// Converts a point into the coordinates of the fill universe.
    #[must_use]
    pub fn to_fill_coords(&self, point: &Point3) -> Point3 {
        match self.translation {
            Some(t) => point - t,
            None => *point,
        }
    }
}

/// Description of a cell to be created by a
/// [`ModelBuilder`](super::ModelBuilder).
///
/// Exactly one of [`material`](Self::material) and
/// [`fill_universe`](Self::fill_universe) must be set, and the region must
/// reference at least one surface or be marked [`unbounded`](Self::unbounded).
#[derive(Debug, Clone)]
pub struct CellSpec {
    name: String,
    region: Option<Region>,
    material: Option<MaterialId>,
    universe: Option<UniverseId>,
    translation: Option<Vector3>,
}

impl CellSpec {
    /// Starts a cell description.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            region: None,
            material: None,
            universe: None,
            translation: None,
        }
    }

    /// Adds a half-space constraint. Constraints accumulate into an
    /// intersection, evaluated in the order they were added.
    #[must_use]
    pub fn halfspace(mut self, surface: SurfaceId, sense: Sense) -> Self {
        let node = Region::halfspace(surface, sense);
        self.region = Some(match self.region.take() {
            None => Region::Intersection(vec![node]),
            Some(Region::Intersection(mut nodes)) => {
                nodes.push(node);
                Region::Intersection(nodes)
            }
            Some(Region::Unbounded) => Region::Intersection(vec![node]),
            Some(other) => Region::Intersection(vec![other, node]),
        });
        self
    }

    /// Replaces the region.
    #[must_use]
    pub fn region(mut self, region: Region) -> Self {
        self.region = Some(region);
        self
    }

    /// Marks the cell as covering all of space.
    #[must_use]
    pub fn unbounded(mut self) -> Self {
        self.region = Some(Region::Unbounded);
        self
    }

    /// Fills the cell with a material.
    #[must_use]
    pub fn material(mut self, material: MaterialId) -> Self {
        self.material = Some(material);
        self
    }

    /// Fills the cell with a universe or lattice.
    #[must_use]
    pub fn fill_universe(mut self, universe: UniverseId) -> Self {
        self.universe = Some(universe);
        self
    }

    /// Shifts the fill universe's origin to `offset` in this cell's frame.
    #[must_use]
    pub fn translation(mut self, offset: Vector3) -> Self {
        self.translation = Some(offset);
        self
    }

    /// Returns the cell name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Validates the description and produces the cell data.
    pub(crate) fn build(self) -> Result<CellData, ModelError> {
        let fill = match (self.material, self.universe) {
            (Some(m), None) => Fill::Material(m),
            (None, Some(u)) => Fill::Universe(u),
            (Some(_), Some(_)) => {
                return Err(ModelError::InvalidFill {
                    cell: self.name,
                    reason: "both a material and a universe are set",
                })
            }
            (None, None) => {
                return Err(ModelError::InvalidFill {
                    cell: self.name,
                    reason: "neither a material nor a universe is set",
                })
            }
        };
        let region = match self.region {
            Some(region) if !region.has_empty_node() => region,
            _ => return Err(ModelError::EmptyRegion { cell: self.name }),
        };
        Ok(CellData {
            name: self.name,
            region,
            fill,
            translation: self.translation,
        })
    }
}
