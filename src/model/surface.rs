use crate::math::{BoundaryType, Point3};
use crate::surface::{Surface, SurfaceShape};

slotmap::new_key_type! {
    /// Unique identifier for a surface in the model store.
    pub struct SurfaceId;
}

/// Data associated with a registered surface.
#[derive(Debug, Clone)]
pub struct SurfaceData {
    /// Unique name of the surface.
    pub name: String,
    /// The geometric shape.
    pub shape: SurfaceShape,
    /// Boundary condition applied where this surface bounds the geometry.
    pub boundary: BoundaryType,
}

impl SurfaceData {
    /// Evaluates the surface function at `point`.
    #[must_use]
    pub fn evaluate(&self, point: &Point3) -> f64 {
        self.shape.evaluate(point)
    }
}
