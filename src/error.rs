use std::fmt;

use thiserror::Error;

use crate::math::Point3;
use crate::model::LatticeIndex;

/// Top-level error type for the csgeo geometry core.
#[derive(Debug, Error)]
pub enum CsgError {
    #[error(transparent)]
    Surface(#[from] SurfaceError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Query(#[from] QueryError),
}

/// Errors raised while constructing surfaces.
#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("parameter {parameter} = {value} must be positive")]
    NonPositive { parameter: &'static str, value: f64 },

    #[error("parameter {parameter} is not finite")]
    NonFinite { parameter: &'static str },

    #[error("zero-length vector")]
    ZeroVector,
}

/// The kind of entity an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Surface,
    Cell,
    Universe,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Surface => "surface",
            Self::Cell => "cell",
            Self::Universe => "universe",
        };
        f.write_str(name)
    }
}

/// Errors raised while building or finalizing a model.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("duplicate {kind} id: {name}")]
    DuplicateId { kind: EntityKind, name: String },

    #[error("{0} not found")]
    EntityNotFound(EntityKind),

    #[error("cell {cell} has an invalid fill: {reason}")]
    InvalidFill { cell: String, reason: &'static str },

    #[error("cell {cell} has no bounding surface and is not marked unbounded")]
    EmptyRegion { cell: String },

    #[error("universe {universe} is a lattice and cannot hold cells")]
    NotACellUniverse { universe: String },

    #[error("invalid lattice {lattice}: {reason}")]
    InvalidLattice { lattice: String, reason: String },

    #[error("lattice {lattice} has no universe at {index}")]
    IncompleteLattice { lattice: String, index: LatticeIndex },

    #[error("universe {universe} has no cells")]
    EmptyUniverse { universe: String },

    #[error("no root universe set")]
    NoRootUniverse,

    #[error("cyclic containment: {}", cycle.join(" -> "))]
    CyclicContainment { cycle: Vec<String> },

    #[error("incomplete tiling: no cell of universe {universe} contains {point}")]
    IncompleteTiling { universe: String, point: Point3 },

    #[error("cells {first} and {second} of universe {universe} overlap at {point}")]
    OverlappingCells {
        universe: String,
        first: String,
        second: String,
        point: Point3,
    },

    #[error("geometry is finalized; {operation} is not permitted")]
    ImmutableGeometry { operation: &'static str },

    #[error("invalid geometry options: {reason}")]
    InvalidOptions { reason: &'static str },
}

/// Errors raised by point containment queries.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("no cell of universe {universe} contains {point}")]
    NoContainingCell { universe: String, point: Point3 },

    #[error("index ({}, {}, {}) is outside lattice {lattice}", index[0], index[1], index[2])]
    OutOfLatticeBounds { lattice: String, index: [i64; 3] },

    #[error("containment depth exceeded {depth} levels")]
    CyclicContainment { depth: usize },

    #[error("point {point} is outside the geometry bounds")]
    OutsideGeometry { point: Point3 },

    #[error("universe {universe} is a lattice, not a cell universe")]
    NotACellUniverse { universe: String },

    #[error("universe {universe} is a cell universe, not a lattice")]
    NotALattice { universe: String },
}

/// Convenience type alias for results using [`CsgError`].
pub type Result<T> = std::result::Result<T, CsgError>;
