use std::collections::{HashMap, HashSet, VecDeque};

use tracing::{debug, info, warn};

use crate::error::{CsgError, ModelError, QueryError, Result};
use crate::math::{Aabb, Point3};
use crate::model::{ModelStore, NameIndex, UniverseId, UniverseKind};

use super::{ContainmentChain, Geometry, GeometryOptions, Location};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Active,
    Done,
}

impl Geometry {
    /// Validates a model and wraps it into a geometry.
    pub(crate) fn build(
        store: ModelStore,
        names: NameIndex,
        root: Option<UniverseId>,
        options: GeometryOptions,
    ) -> Result<Self> {
        if options.max_depth == 0 {
            return Err(ModelError::InvalidOptions {
                reason: "max_depth must be at least 1",
            }
            .into());
        }
        let root = root.ok_or(ModelError::NoRootUniverse)?;
        store.universe(root)?;
        check_members(&store)?;
        check_acyclic(&store)?;
        warn_unreachable(&store, root)?;
        let bounds = root_bounds(&store, root)?;

        let geometry = Geometry {
            store,
            names,
            root,
            bounds,
            options,
        };
        if options.check_tiling {
            geometry.sample_tiling()?;
        }
        info!(
            "Finalized geometry: {} surfaces, {} cells, {} universes",
            geometry.store.surfaces().count(),
            geometry.store.num_cells(),
            geometry.store.num_universes()
        );
        Ok(geometry)
    }

    /// Resolves a grid of points across the bounding box, failing on the
    /// first gap or overlap.
    #[allow(clippy::cast_precision_loss)]
    fn sample_tiling(&self) -> Result<()> {
        if self.bounds.is_empty() {
            warn!("Bounding box of the root universe is empty; skipping tiling check");
            return Ok(());
        }
        let min = self.bounds.min_point();
        let max = self.bounds.max_point();
        let axes: Vec<Vec<f64>> = (0..3)
            .map(|a| {
                if !self.bounds.is_finite_along(a) {
                    warn!("Geometry is unbounded along axis {a}; sampling a single plane");
                }
                axis_samples(min[a], max[a], self.options.tiling_samples[a])
            })
            .collect();

        let mut count = 0_usize;
        for &z in &axes[2] {
            for &y in &axes[1] {
                for &x in &axes[0] {
                    let point = Point3::new(x, y, z);
                    let chain = self
                        .descend(self.root, point)
                        .map_err(|e| as_tiling_error(e, point))?;
                    if self.options.check_overlaps {
                        self.check_overlaps(&chain)?;
                    }
                    count += 1;
                }
            }
        }
        debug!("Tiling check passed for {count} sample points");
        Ok(())
    }

    fn check_overlaps(&self, chain: &ContainmentChain) -> Result<()> {
        for link in chain.links() {
            let Location::Cell(_) = link.location else {
                continue;
            };
            let universe = self.store.universe(link.universe)?;
            let mut first = None;
            for &cell in universe.cells() {
                let data = self.store.cell(cell)?;
                if !data.region.interior_contains(&link.point, &self.store)? {
                    continue;
                }
                if let Some(first) = first {
                    return Err(ModelError::OverlappingCells {
                        universe: universe.name.clone(),
                        first,
                        second: data.name.clone(),
                        point: link.point,
                    }
                    .into());
                }
                first = Some(data.name.clone());
            }
        }
        Ok(())
    }
}

/// Sample coordinates along one axis: cell-centred when the axis is finite,
/// otherwise a single coordinate one unit inside the finite face, or zero.
#[allow(clippy::cast_precision_loss)]
fn axis_samples(min: f64, max: f64, n: usize) -> Vec<f64> {
    match (min.is_finite(), max.is_finite()) {
        (true, true) => {
            let n = n.max(1);
            let step = (max - min) / n as f64;
            (0..n).map(|i| min + (i as f64 + 0.5) * step).collect()
        }
        (true, false) => vec![min + 1.0],
        (false, true) => vec![max - 1.0],
        (false, false) => vec![0.0],
    }
}

fn as_tiling_error(error: CsgError, sample: Point3) -> CsgError {
    match error {
        CsgError::Query(QueryError::NoContainingCell { universe, point }) => {
            ModelError::IncompleteTiling { universe, point }.into()
        }
        CsgError::Query(QueryError::OutOfLatticeBounds { lattice, .. }) => {
            ModelError::IncompleteTiling {
                universe: lattice,
                point: sample,
            }
            .into()
        }
        other => other,
    }
}

fn check_members(store: &ModelStore) -> Result<()> {
    for (_, universe) in store.universes() {
        match &universe.kind {
            UniverseKind::Cells(cells) if cells.is_empty() => {
                return Err(ModelError::EmptyUniverse {
                    universe: universe.name.clone(),
                }
                .into());
            }
            UniverseKind::Cells(_) => {}
            UniverseKind::Lattice(grid) => {
                if let Some(index) = grid.first_unfilled() {
                    return Err(ModelError::IncompleteLattice {
                        lattice: universe.name.clone(),
                        index,
                    }
                    .into());
                }
            }
        }
    }
    Ok(())
}

fn check_acyclic(store: &ModelStore) -> Result<()> {
    let mut marks = HashMap::with_capacity(store.num_universes());
    let mut path = Vec::new();
    for (id, _) in store.universes() {
        visit(store, id, &mut marks, &mut path)?;
    }
    Ok(())
}

fn visit(
    store: &ModelStore,
    id: UniverseId,
    marks: &mut HashMap<UniverseId, Mark>,
    path: &mut Vec<UniverseId>,
) -> Result<()> {
    match marks.get(&id) {
        Some(Mark::Done) => return Ok(()),
        Some(Mark::Active) => {
            let start = path.iter().position(|&u| u == id).unwrap_or(0);
            let mut cycle = Vec::with_capacity(path.len() - start + 1);
            for &u in &path[start..] {
                cycle.push(store.universe(u)?.name.clone());
            }
            cycle.push(store.universe(id)?.name.clone());
            return Err(ModelError::CyclicContainment { cycle }.into());
        }
        None => {}
    }
    marks.insert(id, Mark::Active);
    path.push(id);
    for child in store.universe(id)?.children(store)? {
        visit(store, child, marks, path)?;
    }
    path.pop();
    marks.insert(id, Mark::Done);
    Ok(())
}

fn warn_unreachable(store: &ModelStore, root: UniverseId) -> Result<()> {
    let mut seen = HashSet::from([root]);
    let mut queue = VecDeque::from([root]);
    while let Some(id) = queue.pop_front() {
        for child in store.universe(id)?.children(store)? {
            if seen.insert(child) {
                queue.push_back(child);
            }
        }
    }
    for (id, universe) in store.universes() {
        if !seen.contains(&id) {
            warn!("Universe {} is not reachable from the root", universe.name);
        }
    }
    Ok(())
}

fn root_bounds(store: &ModelStore, root: UniverseId) -> Result<Aabb> {
    let universe = store.universe(root)?;
    match &universe.kind {
        UniverseKind::Cells(cells) => {
            let mut out: Option<Aabb> = None;
            for &cell in cells {
                let b = store.cell(cell)?.region.bounds(store)?;
                out = Some(match out {
                    None => b,
                    Some(acc) => acc.union(&b),
                });
            }
            Ok(out.unwrap_or_default())
        }
        UniverseKind::Lattice(grid) => Ok(match grid.outer() {
            Some(_) => Aabb::unbounded(),
            None => grid.bounds(),
        }),
    }
}
