mod catalog;
mod chain;
mod options;
mod validate;

pub use catalog::MaterialCatalog;
pub use chain::{ChainLink, ContainmentChain, Location};
pub use options::GeometryOptions;

use crate::error::{ModelError, QueryError, Result};
use crate::math::{Aabb, BoundaryType, Face, Point3};
use crate::model::{
    CellData, CellId, Fill, LatticeIndex, MaterialId, ModelStore, NameIndex, SurfaceData,
    SurfaceId, UniverseData, UniverseId, UniverseKind,
};

/// A finalized, read-only model.
///
/// Produced by [`ModelBuilder::finalize`](crate::model::ModelBuilder::finalize)
/// once the model has passed validation:
///
/// 1. a root universe is set;
/// 2. every cell universe has cells and every lattice element is filled;
/// 3. containment is acyclic;
/// 4. the bounding box, sampled on a grid, is tiled without gaps or
///    overlaps (see [`GeometryOptions`]).
///
/// Nothing in a `Geometry` can change after construction, so it may be
/// shared between any number of threads for concurrent queries.
#[derive(Debug)]
pub struct Geometry {
    store: ModelStore,
    names: NameIndex,
    root: UniverseId,
    bounds: Aabb,
    options: GeometryOptions,
}

impl Geometry {
    // --- Queries ---

    /// Resolves `point` from the root universe down to the material-filled
    /// cell that contains it.
    ///
    /// # Errors
    ///
    /// - [`QueryError::OutsideGeometry`] if the point is outside [`bounds`](Self::bounds);
    /// - [`QueryError::NoContainingCell`] if a universe on the way has a gap;
    /// - [`QueryError::OutOfLatticeBounds`] if a lattice without an outer
    ///   universe does not cover the point;
    /// - [`QueryError::CyclicContainment`] if the chain grows beyond
    ///   [`GeometryOptions::max_depth`].
    pub fn find_cell_containing_point(&self, point: &Point3) -> Result<ContainmentChain> {
        if !self.bounds.contains(point) {
            return Err(QueryError::OutsideGeometry { point: *point }.into());
        }
        self.descend(self.root, *point)
    }

    /// Returns the material at `point`.
    ///
    /// # Errors
    ///
    /// See [`find_cell_containing_point`](Self::find_cell_containing_point).
    pub fn material_at(&self, point: &Point3) -> Result<MaterialId> {
        Ok(self.find_cell_containing_point(point)?.material())
    }

    /// Finds the first cell of a cell universe containing `point`, given in
    /// that universe's coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::NoContainingCell`] if no cell contains the point
    /// and [`QueryError::NotACellUniverse`] for a lattice.
    pub fn find_cell(&self, universe: UniverseId, point: &Point3) -> Result<CellId> {
        self.store.find_cell(universe, point)
    }

    /// Returns the element of `lattice` containing `point`, given in the
    /// lattice's coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::OutOfLatticeBounds`] if the point lies outside
    /// the array and [`QueryError::NotALattice`] if `lattice` is a cell
    /// universe.
    pub fn index_for(&self, lattice: UniverseId, point: &Point3) -> Result<LatticeIndex> {
        let data = self.store.universe(lattice)?;
        let Some(grid) = data.lattice() else {
            return Err(QueryError::NotALattice {
                universe: data.name.clone(),
            }
            .into());
        };
        grid.index_for(point).ok_or_else(|| {
            QueryError::OutOfLatticeBounds {
                lattice: data.name.clone(),
                index: grid.raw_index(point),
            }
            .into()
        })
    }

    fn descend(&self, start: UniverseId, point: Point3) -> Result<ContainmentChain> {
        let mut links = Vec::new();
        let mut universe = start;
        let mut local = point;
        for _ in 0..self.options.max_depth {
            let data = self.store.universe(universe)?;
            match &data.kind {
                UniverseKind::Cells(_) => {
                    let cell_id = self.store.find_cell(universe, &local)?;
                    links.push(ChainLink {
                        universe,
                        location: Location::Cell(cell_id),
                        point: local,
                    });
                    let cell = self.store.cell(cell_id)?;
                    match cell.fill {
                        Fill::Material(material) => {
                            return Ok(ContainmentChain {
                                links,
                                cell: cell_id,
                                material,
                            })
                        }
                        Fill::Universe(next) => {
                            local = cell.to_fill_coords(&local);
                            universe = next;
                        }
                    }
                }
                UniverseKind::Lattice(grid) => {
                    if let Some(index) = grid.index_for(&local) {
                        let next = grid.universe_at(index).ok_or_else(|| {
                            ModelError::IncompleteLattice {
                                lattice: data.name.clone(),
                                index,
                            }
                        })?;
                        links.push(ChainLink {
                            universe,
                            location: Location::LatticeElement(index),
                            point: local,
                        });
                        local = grid.local_point(&local, index);
                        universe = next;
                    } else if let Some(outer) = grid.outer() {
                        links.push(ChainLink {
                            universe,
                            location: Location::Outer,
                            point: local,
                        });
                        universe = outer;
                    } else {
                        return Err(QueryError::OutOfLatticeBounds {
                            lattice: data.name.clone(),
                            index: grid.raw_index(&local),
                        }
                        .into());
                    }
                }
            }
        }
        Err(QueryError::CyclicContainment {
            depth: self.options.max_depth,
        }
        .into())
    }

    // --- Metadata ---

    /// Returns the root universe.
    #[must_use]
    pub fn root(&self) -> UniverseId {
        self.root
    }

    /// Returns the bounding box of the root universe.
    #[must_use]
    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    /// Returns the boundary condition on one face of the bounding box.
    ///
    /// Consulted by transport consumers when a track leaves the geometry.
    #[must_use]
    pub fn boundary(&self, face: Face) -> BoundaryType {
        self.bounds.face(face).boundary
    }

    /// Returns the options the geometry was finalized with.
    #[must_use]
    pub fn options(&self) -> &GeometryOptions {
        &self.options
    }

    /// Returns the underlying arena.
    #[must_use]
    pub fn store(&self) -> &ModelStore {
        &self.store
    }

    /// Returns the cell data.
    ///
    /// # Errors
    ///
    /// Returns an error if the cell belongs to another model.
    pub fn cell(&self, id: CellId) -> Result<&CellData> {
        Ok(self.store.cell(id)?)
    }

    /// Returns the universe data.
    ///
    /// # Errors
    ///
    /// Returns an error if the universe belongs to another model.
    pub fn universe(&self, id: UniverseId) -> Result<&UniverseData> {
        Ok(self.store.universe(id)?)
    }

    /// Returns the surface data.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface belongs to another model.
    pub fn surface(&self, id: SurfaceId) -> Result<&SurfaceData> {
        Ok(self.store.surface(id)?)
    }

    /// Iterates over all cells.
    pub fn cells(&self) -> impl Iterator<Item = (CellId, &CellData)> {
        self.store.cells()
    }

    /// Iterates over the cells filled with a material.
    pub fn material_cells(&self) -> impl Iterator<Item = (CellId, &CellData)> {
        self.store
            .cells()
            .filter(|(_, cell)| matches!(cell.fill, Fill::Material(_)))
    }

    /// Iterates over all universes, lattices included.
    pub fn universes(&self) -> impl Iterator<Item = (UniverseId, &UniverseData)> {
        self.store.universes()
    }

    /// Iterates over all surfaces.
    pub fn surfaces(&self) -> impl Iterator<Item = (SurfaceId, &SurfaceData)> {
        self.store.surfaces()
    }

    /// Returns the number of cells.
    #[must_use]
    pub fn num_cells(&self) -> usize {
        self.store.num_cells()
    }

    /// Looks up a cell by name.
    #[must_use]
    pub fn cell_by_name(&self, name: &str) -> Option<CellId> {
        self.names.cell(name)
    }

    /// Looks up a universe or lattice by name.
    #[must_use]
    pub fn universe_by_name(&self, name: &str) -> Option<UniverseId> {
        self.names.universe(name)
    }

    /// Looks up a surface by name.
    #[must_use]
    pub fn surface_by_name(&self, name: &str) -> Option<SurfaceId> {
        self.names.surface(name)
    }

    // --- Rejected mutations ---

    /// Always fails: a finalized geometry cannot gain cells.
    ///
    /// # Errors
    ///
    /// Always returns [`ModelError::ImmutableGeometry`].
    #[allow(clippy::unused_self)]
    pub fn add_cell(&self, _universe: UniverseId, _cell: CellId) -> Result<()> {
        Err(ModelError::ImmutableGeometry {
            operation: "add_cell",
        }
        .into())
    }

    /// Always fails: a finalized geometry cannot gain universes.
    ///
    /// # Errors
    ///
    /// Always returns [`ModelError::ImmutableGeometry`].
    #[allow(clippy::unused_self)]
    pub fn add_universe(&self, _name: &str) -> Result<UniverseId> {
        Err(ModelError::ImmutableGeometry {
            operation: "add_universe",
        }
        .into())
    }
}
