pub mod builder;
pub mod cell;
pub mod lattice;
pub mod region;
pub mod surface;
pub mod universe;

pub use builder::ModelBuilder;
pub use cell::{CellData, CellId, CellSpec, Fill, MaterialId};
pub use lattice::{Lattice, LatticeIndex, LatticeSpec};
pub use region::Region;
pub use surface::{SurfaceData, SurfaceId};
pub use universe::{UniverseData, UniverseId, UniverseKind};

use std::collections::HashMap;

use crate::error::{EntityKind, ModelError};
use slotmap::SlotMap;

/// Central arena that owns all model entities.
///
/// Entities reference each other via typed IDs (generational indices), so a
/// universe can fill any number of cells and a cell can belong to any number
/// of universes without shared ownership.
#[derive(Debug, Default)]
pub struct ModelStore {
    surfaces: SlotMap<SurfaceId, SurfaceData>,
    cells: SlotMap<CellId, CellData>,
    universes: SlotMap<UniverseId, UniverseData>,
}

impl ModelStore {
    /// Creates a new, empty model store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Surfaces ---

    pub(crate) fn insert_surface(&mut self, data: SurfaceData) -> SurfaceId {
        self.surfaces.insert(data)
    }

    /// Returns a reference to the surface data.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface is not in this store.
    pub fn surface(&self, id: SurfaceId) -> Result<&SurfaceData, ModelError> {
        self.surfaces
            .get(id)
            .ok_or(ModelError::EntityNotFound(EntityKind::Surface))
    }

    /// Iterates over all surfaces.
    pub fn surfaces(&self) -> impl Iterator<Item = (SurfaceId, &SurfaceData)> {
        self.surfaces.iter()
    }

    // --- Cells ---

    pub(crate) fn insert_cell(&mut self, data: CellData) -> CellId {
        self.cells.insert(data)
    }

    /// Returns a reference to the cell data.
    ///
    /// # Errors
    ///
    /// Returns an error if the cell is not in this store.
    pub fn cell(&self, id: CellId) -> Result<&CellData, ModelError> {
        self.cells
            .get(id)
            .ok_or(ModelError::EntityNotFound(EntityKind::Cell))
    }

    /// Iterates over all cells.
    pub fn cells(&self) -> impl Iterator<Item = (CellId, &CellData)> {
        self.cells.iter()
    }

    /// Returns the number of cells.
    #[must_use]
    pub fn num_cells(&self) -> usize {
        self.cells.len()
    }

    // --- Universes ---

    pub(crate) fn insert_universe(&mut self, data: UniverseData) -> UniverseId {
        self.universes.insert(data)
    }

    /// Returns a reference to the universe data.
    ///
    /// # Errors
    ///
    /// Returns an error if the universe is not in this store.
    pub fn universe(&self, id: UniverseId) -> Result<&UniverseData, ModelError> {
        self.universes
            .get(id)
            .ok_or(ModelError::EntityNotFound(EntityKind::Universe))
    }

    pub(crate) fn universe_mut(&mut self, id: UniverseId) -> Result<&mut UniverseData, ModelError> {
        self.universes
            .get_mut(id)
            .ok_or(ModelError::EntityNotFound(EntityKind::Universe))
    }

    /// Iterates over all universes and lattices.
    pub fn universes(&self) -> impl Iterator<Item = (UniverseId, &UniverseData)> {
        self.universes.iter()
    }

    /// Returns the number of universes, lattices included.
    #[must_use]
    pub fn num_universes(&self) -> usize {
        self.universes.len()
    }
}

/// Name registry for the entities of one model.
#[derive(Debug, Default)]
pub struct NameIndex {
    pub(crate) surfaces: HashMap<String, SurfaceId>,
    pub(crate) cells: HashMap<String, CellId>,
    pub(crate) universes: HashMap<String, UniverseId>,
}

impl NameIndex {
    /// Looks up a surface by name.
    #[must_use]
    pub fn surface(&self, name: &str) -> Option<SurfaceId> {
        self.surfaces.get(name).copied()
    }

    /// Looks up a cell by name.
    #[must_use]
    pub fn cell(&self, name: &str) -> Option<CellId> {
        self.cells.get(name).copied()
    }

    /// Looks up a universe or lattice by name.
    #[must_use]
    pub fn universe(&self, name: &str) -> Option<UniverseId> {
        self.universes.get(name).copied()
    }
}
