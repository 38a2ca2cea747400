/// Settings for [`ModelBuilder::finalize`](crate::model::ModelBuilder::finalize)
/// and for queries on the resulting geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GeometryOptions {
    /// Maximum number of containment levels a query may descend; must be at
    /// least 1. Default: 32.
    pub max_depth: usize,
    /// Sample the bounding box for gaps during finalization. Default: true.
    pub check_tiling: bool,
    /// Samples per axis when checking the tiling. Axes on which the geometry
    /// is unbounded are sampled on a single plane. Default: `[8, 8, 1]`.
    pub tiling_samples: [usize; 3],
    /// Report overlapping cells while sampling. Default: true.
    pub check_overlaps: bool,
}

impl Default for GeometryOptions {
    fn default() -> Self {
        Self {
            max_depth: 32,
            check_tiling: true,
            tiling_samples: [8, 8, 1],
            check_overlaps: true,
        }
    }
}

impl GeometryOptions {
    /// Sets the maximum containment depth.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Enables or disables tiling sampling.
    #[must_use]
    pub fn with_tiling_check(mut self, enabled: bool) -> Self {
        self.check_tiling = enabled;
        self
    }

    /// Sets the number of tiling samples per axis.
    #[must_use]
    pub fn with_tiling_samples(mut self, samples: [usize; 3]) -> Self {
        self.tiling_samples = samples;
        self
    }

    /// Enables or disables overlap detection.
    #[must_use]
    pub fn with_overlap_check(mut self, enabled: bool) -> Self {
        self.check_overlaps = enabled;
        self
    }
}
