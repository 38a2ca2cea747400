use std::collections::HashMap;

use crate::error::Result;
use crate::model::{Fill, MaterialId, UniverseId, UniverseKind};

use super::Geometry;

/// External source of material properties.
///
/// The geometry only stores [`MaterialId`] handles; questions about what a
/// material is are forwarded here.
pub trait MaterialCatalog {
    /// Returns `true` if the material contains fissionable nuclides.
    fn is_fissionable(&self, material: MaterialId) -> bool;
}

impl<F> MaterialCatalog for F
where
    F: Fn(MaterialId) -> bool,
{
    fn is_fissionable(&self, material: MaterialId) -> bool {
        self(material)
    }
}

impl Geometry {
    /// Determines, for every universe, whether any material reachable from
    /// it is fissionable.
    ///
    /// # Errors
    ///
    /// Returns an error only if the arena is inconsistent.
    pub fn compute_fissionability(
        &self,
        catalog: &impl MaterialCatalog,
    ) -> Result<HashMap<UniverseId, bool>> {
        let mut memo = HashMap::with_capacity(self.store.num_universes());
        for (id, _) in self.store.universes() {
            self.fissionable(id, catalog, &mut memo)?;
        }
        Ok(memo)
    }

    fn fissionable(
        &self,
        universe: UniverseId,
        catalog: &impl MaterialCatalog,
        memo: &mut HashMap<UniverseId, bool>,
    ) -> Result<bool> {
        if let Some(&known) = memo.get(&universe) {
            return Ok(known);
        }
        let data = self.store.universe(universe)?;
        let mut result = false;
        match &data.kind {
            UniverseKind::Cells(cells) => {
                for &cell in cells {
                    let hit = match self.store.cell(cell)?.fill {
                        Fill::Material(m) => catalog.is_fissionable(m),
                        Fill::Universe(u) => self.fissionable(u, catalog, memo)?,
                    };
                    if hit {
                        result = true;
                        break;
                    }
                }
            }
            UniverseKind::Lattice(_) => {
                for child in data.children(&self.store)? {
                    if self.fissionable(child, catalog, memo)? {
                        result = true;
                        break;
                    }
                }
            }
        }
        memo.insert(universe, result);
        Ok(result)
    }
}
