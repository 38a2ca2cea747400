pub mod error;
pub mod geometry;
pub mod math;
pub mod model;
pub mod surface;

pub use error::{CsgError, Result};
pub use geometry::{ContainmentChain, Geometry, GeometryOptions};
pub use model::{CellSpec, Fill, LatticeSpec, MaterialId, ModelBuilder, Region};
