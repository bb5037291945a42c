use crate::{BuildError, BuildResult, BVH_STACK_SIZE};

/// Parameters of the BVH builder.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BuildOptions {
    /// Number of bins used at the root when looking for a splitting plane;
    /// deeper levels use `bin_count / (depth + 1)` bins, but never less than
    /// [`Self::MIN_BIN_COUNT`].
    pub bin_count: u32,

    /// Nodes with this many references (or less) become leaves without
    /// looking for a split (except for the root).
    pub ref_threshold: u32,

    /// Nodes at this depth always become leaves.
    ///
    /// Must be lower than [`BVH_STACK_SIZE`] so that the traversal stack
    /// can't overflow.
    pub max_depth: u32,

    /// Whether spatial splits (clipping triangles across the splitting plane)
    /// are considered at all.
    pub spatial_splits: bool,

    /// Spatial splits are considered only up to (and including) this depth.
    pub spatial_split_depth_limit: u32,

    /// Spatial splits are considered only when the children of the best
    /// object split overlap by at least `root_area * min_overlap_factor`.
    pub min_overlap_factor: f32,

    /// Whether the top of the tree gets built in parallel.
    pub parallel: bool,

    /// Children of nodes up to (and including) this depth are built in
    /// parallel.
    pub parallel_depth_limit: u32,

    /// Whether the flattened tree lays out the child with the larger surface
    /// area first, which makes any-hit queries find large occluders sooner.
    pub larger_child_first: bool,
}

impl BuildOptions {
    pub const MIN_BIN_COUNT: u32 = 16;

    /// Options suited for bare bounding boxes: more bins would make the
    /// one-primitive-per-leaf trees slower to build without making them
    /// better.
    pub fn for_boxes() -> Self {
        Self {
            bin_count: 64,
            ref_threshold: 1,
            spatial_splits: false,
            ..Default::default()
        }
    }

    pub fn with_bin_count(mut self, bin_count: u32) -> Self {
        self.bin_count = bin_count;
        self
    }

    pub fn with_ref_threshold(mut self, ref_threshold: u32) -> Self {
        self.ref_threshold = ref_threshold;
        self
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_spatial_splits(mut self, spatial_splits: bool) -> Self {
        self.spatial_splits = spatial_splits;
        self
    }

    pub fn with_spatial_split_depth_limit(mut self, limit: u32) -> Self {
        self.spatial_split_depth_limit = limit;
        self
    }

    pub fn with_min_overlap_factor(mut self, factor: f32) -> Self {
        self.min_overlap_factor = factor;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_parallel_depth_limit(mut self, limit: u32) -> Self {
        self.parallel_depth_limit = limit;
        self
    }

    pub fn with_larger_child_first(mut self, larger_child_first: bool) -> Self {
        self.larger_child_first = larger_child_first;
        self
    }

    pub fn validate(&self) -> BuildResult<()> {
        if self.bin_count == 0 {
            return Err(BuildError::InvalidOption {
                option: "bin_count",
                reason: "must be greater than zero",
            });
        }

        if self.ref_threshold == 0 {
            return Err(BuildError::InvalidOption {
                option: "ref_threshold",
                reason: "must be greater than zero",
            });
        }

        if self.max_depth as usize >= BVH_STACK_SIZE {
            return Err(BuildError::InvalidOption {
                option: "max_depth",
                reason: "must be lower than the traversal stack's size",
            });
        }

        if self.min_overlap_factor.is_nan() || self.min_overlap_factor < 0.0 {
            return Err(BuildError::InvalidOption {
                option: "min_overlap_factor",
                reason: "must be a non-negative number",
            });
        }

        Ok(())
    }

    pub(crate) fn bin_count_at(&self, depth: u32) -> usize {
        (self.bin_count / (depth + 1)).max(Self::MIN_BIN_COUNT) as usize
    }
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            bin_count: 256,
            ref_threshold: 2,
            max_depth: 32,
            spatial_splits: true,
            spatial_split_depth_limit: 16,
            min_overlap_factor: 1e-5,
            parallel: true,
            parallel_depth_limit: 5,
            larger_child_first: true,
        }
    }
}
