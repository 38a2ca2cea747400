use crate::error::{QueryError, Result};
use crate::math::Point3;

use super::{CellId, Fill, Lattice, ModelStore};

slotmap::new_key_type! {
    /// Unique identifier for a universe or lattice in the model store.
    pub struct UniverseId;
}

/// The structure of a universe.
#[derive(Debug, Clone)]
pub enum UniverseKind {
    /// A collection of cells, in registration order.
    Cells(Vec<CellId>),
    /// A regular array of sub-universes.
    Lattice(Lattice),
}

/// Data associated with a universe.
#[derive(Debug, Clone)]
pub struct UniverseData {
    /// Unique name of the universe.
    pub name: String,
    /// Cells or lattice.
    pub kind: UniverseKind,
}

impl UniverseData {
    /// Returns the member cells; empty for a lattice.
    #[must_use]
    pub fn cells(&self) -> &[CellId] {
        match &self.kind {
            UniverseKind::Cells(cells) => cells,
            UniverseKind::Lattice(_) => &[],
        }
    }

    /// Returns the lattice if this universe is one.
    #[must_use]
    pub fn lattice(&self) -> Option<&Lattice> {
        match &self.kind {
            UniverseKind::Cells(_) => None,
            UniverseKind::Lattice(lattice) => Some(lattice),
        }
    }

    /// Returns `true` if this universe is a lattice.
    #[must_use]
    pub fn is_lattice(&self) -> bool {
        matches!(self.kind, UniverseKind::Lattice(_))
    }

    /// Returns the universes nested directly inside this one, without
    /// duplicates, in first-reference order.
    ///
    /// # Errors
    ///
    /// Returns an error if a member cell is not in `store`.
    pub fn children(&self, store: &ModelStore) -> Result<Vec<UniverseId>> {
        let mut out = Vec::new();
        let mut push = |id: UniverseId| {
            if !out.contains(&id) {
                out.push(id);
            }
        };
        match &self.kind {
            UniverseKind::Cells(cells) => {
                for &cell in cells {
                    if let Fill::Universe(u) = store.cell(cell)?.fill {
                        push(u);
                    }
                }
            }
            UniverseKind::Lattice(lattice) => {
                lattice.universes().for_each(&mut push);
                if let Some(outer) = lattice.outer() {
                    push(outer);
                }
            }
        }
        Ok(out)
    }
}

impl ModelStore {
    /// Finds the first cell of `universe`, in registration order, that
    /// contains `point`.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::NoContainingCell`] if no cell contains the
    /// point, and [`QueryError::NotACellUniverse`] for a lattice.
    pub fn find_cell(&self, universe: UniverseId, point: &Point3) -> Result<CellId> {
        let data = self.universe(universe)?;
        let UniverseKind::Cells(cells) = &data.kind else {
            return Err(QueryError::NotACellUniverse {
                universe: data.name.clone(),
            }
            .into());
        };
        for &cell in cells {
            if self.cell(cell)?.contains(point, self)? {
                return Ok(cell);
            }
        }
        Err(QueryError::NoContainingCell {
            universe: data.name.clone(),
            point: *point,
        }
        .into())
    }
}
