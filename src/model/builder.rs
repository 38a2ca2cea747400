use tracing::debug;

use crate::error::{CsgError, EntityKind, ModelError, Result, SurfaceError};
use crate::geometry::{Geometry, GeometryOptions};
use crate::math::BoundaryType;
use crate::surface::{Plane, Sense, SurfaceShape};

use super::{
    CellId, CellSpec, Fill, Lattice, LatticeIndex, LatticeSpec, ModelStore, NameIndex, Region,
    SurfaceData, SurfaceId, UniverseData, UniverseId, UniverseKind,
};

/// Construction context for a model.
///
/// Surfaces, cells, universes and lattices are registered here by name and
/// wired together; [`finalize`](Self::finalize) validates the model and
/// consumes the builder, producing a read-only [`Geometry`].
#[derive(Debug, Default)]
pub struct ModelBuilder {
    store: ModelStore,
    names: NameIndex,
    root: Option<UniverseId>,
}

impl ModelBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the entities registered so far.
    #[must_use]
    pub fn store(&self) -> &ModelStore {
        &self.store
    }

    /// Returns the name registry.
    #[must_use]
    pub fn names(&self) -> &NameIndex {
        &self.names
    }

    // --- Surfaces ---

    /// Registers a surface without a boundary condition.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::DuplicateId`] if the name is taken.
    pub fn add_surface(&mut self, name: &str, shape: impl Into<SurfaceShape>) -> Result<SurfaceId> {
        self.add_surface_with_boundary(name, shape, BoundaryType::Interface)
    }

    /// Registers a surface carrying a boundary condition.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::DuplicateId`] if the name is taken.
    pub fn add_surface_with_boundary(
        &mut self,
        name: &str,
        shape: impl Into<SurfaceShape>,
        boundary: BoundaryType,
    ) -> Result<SurfaceId> {
        if self.names.surfaces.contains_key(name) {
            return Err(duplicate(EntityKind::Surface, name));
        }
        let id = self.store.insert_surface(SurfaceData {
            name: name.to_owned(),
            shape: shape.into(),
            boundary,
        });
        self.names.surfaces.insert(name.to_owned(), id);
        debug!("Registered surface {name} ({boundary:?})");
        Ok(id)
    }

    /// Registers the four planes of a z-aligned rectangular prism and returns
    /// the region inside them.
    ///
    /// The planes are named `"{name} min x"`, `"{name} max x"`,
    /// `"{name} min y"` and `"{name} max y"`, and all carry `boundary`.
    ///
    /// # Errors
    ///
    /// Returns an error if a width is not positive, a coordinate is not
    /// finite, or a plane name is taken.
    pub fn add_rectangular_prism(
        &mut self,
        name: &str,
        width: [f64; 2],
        center: [f64; 2],
        boundary: BoundaryType,
    ) -> Result<Region> {
        for (parameter, w) in [("width x", width[0]), ("width y", width[1])] {
            if !(w > 0.0) {
                return Err(SurfaceError::NonPositive {
                    parameter,
                    value: w,
                }
                .into());
            }
        }
        let planes = [
            ("min x", Plane::x(center[0] - width[0] / 2.0)?, Sense::Positive),
            ("max x", Plane::x(center[0] + width[0] / 2.0)?, Sense::Negative),
            ("min y", Plane::y(center[1] - width[1] / 2.0)?, Sense::Positive),
            ("max y", Plane::y(center[1] + width[1] / 2.0)?, Sense::Negative),
        ];
        for (suffix, _, _) in &planes {
            let full = format!("{name} {suffix}");
            if self.names.surfaces.contains_key(&full) {
                return Err(duplicate(EntityKind::Surface, &full));
            }
        }
        let mut halfspaces = Vec::with_capacity(planes.len());
        for (suffix, plane, sense) in planes {
            let id = self.add_surface_with_boundary(&format!("{name} {suffix}"), plane, boundary)?;
            halfspaces.push((id, sense));
        }
        Ok(Region::from_halfspaces(halfspaces))
    }

    // --- Cells ---

    /// Creates a cell. The cell is not yet part of any universe.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::DuplicateId`] if the name is taken,
    /// [`ModelError::InvalidFill`] unless exactly one fill is set,
    /// [`ModelError::EmptyRegion`] if the region has no surfaces and is not
    /// unbounded, and [`ModelError::EntityNotFound`] for unknown surfaces or
    /// universes.
    pub fn create_cell(&mut self, spec: CellSpec) -> Result<CellId> {
        if self.names.cells.contains_key(spec.name()) {
            return Err(duplicate(EntityKind::Cell, spec.name()));
        }
        let data = spec.build()?;
        for surface in data.region.surfaces() {
            self.store.surface(surface)?;
        }
        if let Fill::Universe(u) = data.fill {
            self.store.universe(u)?;
        }
        debug!("Created cell {} with fill {:?}", data.name, data.fill);
        let name = data.name.clone();
        let id = self.store.insert_cell(data);
        self.names.cells.insert(name, id);
        Ok(id)
    }

    /// Appends `cell` to the members of `universe`.
    ///
    /// Registration order is the order in which cells are tested by
    /// [`ModelStore::find_cell`].
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::DuplicateId`] if the cell is already a member,
    /// [`ModelError::NotACellUniverse`] for a lattice, and
    /// [`ModelError::EntityNotFound`] for unknown ids.
    pub fn add_cell(&mut self, universe: UniverseId, cell: CellId) -> Result<()> {
        let cell_name = self.store.cell(cell)?.name.clone();
        let data = self.store.universe_mut(universe)?;
        let UniverseKind::Cells(cells) = &mut data.kind else {
            return Err(ModelError::NotACellUniverse {
                universe: data.name.clone(),
            }
            .into());
        };
        if cells.contains(&cell) {
            return Err(duplicate(EntityKind::Cell, &cell_name));
        }
        cells.push(cell);
        debug!("Added cell {cell_name} to universe {}", data.name);
        Ok(())
    }

    // --- Universes ---

    /// Registers an empty cell universe.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::DuplicateId`] if the name is taken.
    pub fn add_universe(&mut self, name: &str) -> Result<UniverseId> {
        self.insert_universe(name, UniverseKind::Cells(Vec::new()))
    }

    /// Registers a lattice universe with no elements filled.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::DuplicateId`] if the name is taken and
    /// [`ModelError::InvalidLattice`] for a zero dimension, a non-positive
    /// pitch or more elements than fit in memory.
    pub fn add_lattice(&mut self, name: &str, spec: LatticeSpec) -> Result<UniverseId> {
        if let Err(reason) = spec.check() {
            return Err(ModelError::InvalidLattice {
                lattice: name.to_owned(),
                reason,
            }
            .into());
        }
        self.insert_universe(name, UniverseKind::Lattice(Lattice::from_spec(spec)))
    }

    fn insert_universe(&mut self, name: &str, kind: UniverseKind) -> Result<UniverseId> {
        if self.names.universes.contains_key(name) {
            return Err(duplicate(EntityKind::Universe, name));
        }
        let id = self.store.insert_universe(UniverseData {
            name: name.to_owned(),
            kind,
        });
        self.names.universes.insert(name.to_owned(), id);
        debug!("Registered universe {name}");
        Ok(id)
    }

    /// Places `universe` at one element of `lattice`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidLattice`] if the index is outside the
    /// array or `lattice` is not a lattice.
    pub fn set_lattice_universe(
        &mut self,
        lattice: UniverseId,
        index: LatticeIndex,
        universe: UniverseId,
    ) -> Result<()> {
        self.store.universe(universe)?;
        let (name, grid) = self.lattice_mut(lattice)?;
        if !grid.set(index, universe) {
            return Err(invalid_lattice(&name, format!("index {index} is outside the array")));
        }
        Ok(())
    }

    /// Fills a single-layer lattice from rows of universes.
    ///
    /// Rows are listed from the largest y to the smallest, as a lattice map
    /// reads on the page; each row runs from the smallest x to the largest.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidLattice`] if the lattice has more than
    /// one layer or the rows do not match its shape.
    pub fn fill_lattice_rows(
        &mut self,
        lattice: UniverseId,
        rows: &[Vec<UniverseId>],
    ) -> Result<()> {
        self.fill_lattice_layers(lattice, std::slice::from_ref(&rows.to_vec()))
    }

    /// Fills a lattice from layers of rows.
    ///
    /// Layers are listed from the largest z to the smallest, rows as in
    /// [`fill_lattice_rows`](Self::fill_lattice_rows).
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidLattice`] if the layers do not match the
    /// lattice shape.
    pub fn fill_lattice_layers(
        &mut self,
        lattice: UniverseId,
        layers: &[Vec<Vec<UniverseId>>],
    ) -> Result<()> {
        for u in layers.iter().flatten().flatten() {
            self.store.universe(*u)?;
        }
        let (name, grid) = self.lattice_mut(lattice)?;
        let [nx, ny, nz] = grid.shape();
        if layers.len() != nz {
            let reason = format!("expected {nz} layers, got {}", layers.len());
            return Err(invalid_lattice(&name, reason));
        }
        for layer in layers {
            if layer.len() != ny {
                let reason = format!("expected {ny} rows, got {}", layer.len());
                return Err(invalid_lattice(&name, reason));
            }
            if let Some(row) = layer.iter().find(|row| row.len() != nx) {
                let reason = format!("expected {nx} columns, got {}", row.len());
                return Err(invalid_lattice(&name, reason));
            }
        }
        for (l, layer) in layers.iter().enumerate() {
            for (r, row) in layer.iter().enumerate() {
                for (i, &u) in row.iter().enumerate() {
                    grid.set(LatticeIndex::new(i, ny - 1 - r, nz - 1 - l), u);
                }
            }
        }
        debug!("Filled lattice {name} ({nx} x {ny} x {nz})");
        Ok(())
    }

    /// Sets the universe that fills points outside the lattice array.
    ///
    /// # Errors
    ///
    /// Returns an error if either id is unknown or `lattice` is not a
    /// lattice.
    pub fn set_lattice_outer(&mut self, lattice: UniverseId, universe: UniverseId) -> Result<()> {
        self.store.universe(universe)?;
        let (_, grid) = self.lattice_mut(lattice)?;
        grid.set_outer(universe);
        Ok(())
    }

    fn lattice_mut(&mut self, lattice: UniverseId) -> Result<(String, &mut Lattice)> {
        let data = self.store.universe_mut(lattice)?;
        match &mut data.kind {
            UniverseKind::Lattice(grid) => Ok((data.name.clone(), grid)),
            UniverseKind::Cells(_) => Err(invalid_lattice(&data.name, "not a lattice".into())),
        }
    }

    /// Chooses the universe at the top of the containment hierarchy.
    ///
    /// # Errors
    ///
    /// Returns an error if the universe is unknown.
    pub fn set_root(&mut self, universe: UniverseId) -> Result<()> {
        let name = &self.store.universe(universe)?.name;
        debug!("Root universe set to {name}");
        self.root = Some(universe);
        Ok(())
    }

    /// Validates the model and freezes it into a [`Geometry`].
    ///
    /// The builder is consumed whether or not validation succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidOptions`] if `options.max_depth` is zero,
    /// otherwise the first validation failure; see [`Geometry`] for the checks.
    pub fn finalize(self, options: GeometryOptions) -> Result<Geometry> {
        Geometry::build(self.store, self.names, self.root, options)
    }

    /// Looks up a surface by name.
    #[must_use]
    pub fn surface_by_name(&self, name: &str) -> Option<SurfaceId> {
        self.names.surface(name)
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
}

fn duplicate(kind: EntityKind, name: &str) -> CsgError {
    ModelError::DuplicateId {
        kind,
        name: name.to_owned(),
    }
    .into()
}

fn invalid_lattice(lattice: &str, reason: String) -> CsgError {
    ModelError::InvalidLattice {
        lattice: lattice.to_owned(),
        reason,
    }
    .into()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::{Face, Point3};
    use crate::model::MaterialId;
    use crate::surface::Cylinder;

    #[test]
    fn duplicate_names_rejected() {
        let mut b = ModelBuilder::new();
        b.add_surface("pin", Cylinder::z(0.0, 0.0, 0.5).unwrap()).unwrap();
        let err = b.add_surface("pin", Plane::x(0.0).unwrap()).unwrap_err();
        assert!(matches!(
            err,
            CsgError::Model(ModelError::DuplicateId { kind: EntityKind::Surface, .. })
        ));

        b.add_universe("UO2").unwrap();
        assert!(b.add_universe("UO2").is_err());

        b.create_cell(CellSpec::new("c").unbounded().material(MaterialId(0))).unwrap();
        assert!(b
            .create_cell(CellSpec::new("c").unbounded().material(MaterialId(1)))
            .is_err());
    }

    #[test]
    fn cells_keep_registration_order() {
        let mut b = ModelBuilder::new();
        let u = b.add_universe("u").unwrap();
        let c1 = b.create_cell(CellSpec::new("a").unbounded().material(MaterialId(0))).unwrap();
        let c2 = b.create_cell(CellSpec::new("b").unbounded().material(MaterialId(1))).unwrap();
        b.add_cell(u, c2).unwrap();
        b.add_cell(u, c1).unwrap();
        assert_eq!(b.store().universe(u).unwrap().cells(), &[c2, c1]);
    }

    #[test]
    fn cell_may_join_several_universes() {
        let mut b = ModelBuilder::new();
        let shared = b
            .create_cell(CellSpec::new("Moderator").unbounded().material(MaterialId(7)))
            .unwrap();
        let u1 = b.add_universe("UO2").unwrap();
        let u2 = b.add_universe("Guide Tube").unwrap();
        b.add_cell(u1, shared).unwrap();
        b.add_cell(u2, shared).unwrap();
        let err = b.add_cell(u2, shared).unwrap_err();
        assert!(matches!(err, CsgError::Model(ModelError::DuplicateId { .. })));
        assert_eq!(b.store().universe(u2).unwrap().cells().len(), 1);
    }

    #[test]
    fn cells_cannot_join_lattices() {
        let mut b = ModelBuilder::new();
        let lat = b.add_lattice("lat", LatticeSpec::planar(1, 1, 1.0, 1.0)).unwrap();
        let c = b.create_cell(CellSpec::new("c").unbounded().material(MaterialId(0))).unwrap();
        assert!(matches!(
            b.add_cell(lat, c),
            Err(CsgError::Model(ModelError::NotACellUniverse { .. }))
        ));
    }

    #[test]
    fn unknown_fill_universe_rejected() {
        let mut other = ModelBuilder::new();
        let foreign = other.add_universe("elsewhere").unwrap();
        let mut b = ModelBuilder::new();
        let err = b
            .create_cell(CellSpec::new("c").unbounded().fill_universe(foreign))
            .unwrap_err();
        assert!(matches!(
            err,
            CsgError::Model(ModelError::EntityNotFound(EntityKind::Universe))
        ));
        assert!(b.cell_by_name("c").is_none());
    }

    #[test]
    fn rows_fill_top_down() {
        let mut b = ModelBuilder::new();
        let a = b.add_universe("a").unwrap();
        let c = b.add_universe("c").unwrap();
        let lat = b.add_lattice("lat", LatticeSpec::planar(2, 2, 1.0, 1.0)).unwrap();
        b.fill_lattice_rows(lat, &[vec![a, a], vec![c, a]]).unwrap();
        let grid = b.store().universe(lat).unwrap().lattice().unwrap();
        assert_eq!(grid.universe_at(LatticeIndex::new(0, 0, 0)), Some(c));
        assert_eq!(grid.universe_at(LatticeIndex::new(0, 1, 0)), Some(a));
        assert_eq!(grid.first_unfilled(), None);
    }

    #[test]
    fn row_shape_mismatch_rejected() {
        let mut b = ModelBuilder::new();
        let a = b.add_universe("a").unwrap();
        let lat = b.add_lattice("lat", LatticeSpec::planar(2, 2, 1.0, 1.0)).unwrap();
        let err = b.fill_lattice_rows(lat, &[vec![a, a], vec![a]]).unwrap_err();
        assert!(matches!(err, CsgError::Model(ModelError::InvalidLattice { .. })));
        let err = b.fill_lattice_rows(lat, &[vec![a, a]]).unwrap_err();
        assert!(matches!(err, CsgError::Model(ModelError::InvalidLattice { .. })));
    }

    #[test]
    fn set_lattice_universe_checks_index() {
        let mut b = ModelBuilder::new();
        let a = b.add_universe("a").unwrap();
        let lat = b.add_lattice("lat", LatticeSpec::planar(2, 2, 1.0, 1.0)).unwrap();
        b.set_lattice_universe(lat, LatticeIndex::new(1, 1, 0), a).unwrap();
        assert!(b.set_lattice_universe(lat, LatticeIndex::new(2, 0, 0), a).is_err());
        assert!(b.set_lattice_universe(a, LatticeIndex::new(0, 0, 0), a).is_err());
    }

    #[test]
    fn invalid_lattice_spec_rejected() {
        let mut b = ModelBuilder::new();
        let err = b.add_lattice("lat", LatticeSpec::planar(0, 2, 1.0, 1.0)).unwrap_err();
        assert!(matches!(err, CsgError::Model(ModelError::InvalidLattice { .. })));
        assert!(b.universe_by_name("lat").is_none());
    }

    #[test]
    fn rectangular_prism_region() {
        let mut b = ModelBuilder::new();
        let region = b
            .add_rectangular_prism("core", [4.0, 2.0], [0.0, 0.0], BoundaryType::Reflective)
            .unwrap();
        assert_eq!(region.surfaces().len(), 4);
        assert!(b.surface_by_name("core max y").is_some());
        let store = b.store();
        assert!(region.contains(&Point3::new(1.9, 0.9, 0.0), store).unwrap());
        assert!(!region.contains(&Point3::new(2.1, 0.0, 0.0), store).unwrap());
        let bounds = region.bounds(store).unwrap();
        assert_eq!(
            bounds.face(Face::MinY).boundary,
            BoundaryType::Reflective
        );
        assert!(b
            .add_rectangular_prism("core", [1.0, 1.0], [0.0, 0.0], BoundaryType::Vacuum)
            .is_err());
        assert!(b
            .add_rectangular_prism("flat", [0.0, 1.0], [0.0, 0.0], BoundaryType::Vacuum)
            .is_err());
    }
}
