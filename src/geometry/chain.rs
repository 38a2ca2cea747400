use crate::math::Point3;
use crate::model::{CellId, LatticeIndex, MaterialId, UniverseId};

/// Where a point was found inside one universe of a containment chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    /// The cell of a cell universe that contains the point.
    Cell(CellId),
    /// The element of a lattice that contains the point.
    LatticeElement(LatticeIndex),
    /// The point is outside a lattice array and lies in its outer universe.
    Outer,
}

/// One level of a containment chain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainLink {
    /// The universe searched at this level.
    pub universe: UniverseId,
    /// Where the point was found in it.
    pub location: Location,
    /// The point in this universe's coordinates.
    pub point: Point3,
}

/// The universes and cells visited resolving a point, from the root down to
/// the terminal material-filled cell.
#[derive(Debug, Clone, PartialEq)]
pub struct ContainmentChain {
    pub(crate) links: Vec<ChainLink>,
    pub(crate) cell: CellId,
    pub(crate) material: MaterialId,
}

impl ContainmentChain {
    /// Returns every level, root first.
    #[must_use]
    pub fn links(&self) -> &[ChainLink] {
        &self.links
    }

    /// Returns the `(universe, cell)` pairs of the chain, root first,
    /// skipping lattice levels.
    pub fn cells(&self) -> impl Iterator<Item = (UniverseId, CellId)> + '_ {
        self.links.iter().filter_map(|link| match link.location {
            Location::Cell(cell) => Some((link.universe, cell)),
            Location::LatticeElement(_) | Location::Outer => None,
        })
    }

    /// Returns the terminal cell.
    #[must_use]
    pub fn terminal_cell(&self) -> CellId {
        self.cell
    }

    /// Returns the material of the terminal cell.
    #[must_use]
    pub fn material(&self) -> MaterialId {
        self.material
    }

    /// Returns the number of levels.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.links.len()
    }

    /// Returns the point in the terminal universe's coordinates.
    #[must_use]
    pub fn local_point(&self) -> Option<Point3> {
        self.links.last().map(|link| link.point)
    }
}
