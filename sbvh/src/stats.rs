/// Diagnostics gathered while building a BVH.
///
/// Each parallel branch of the builder gathers its own stats which then get
/// merged together when branches join.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BuildStats {
    /// Depth of the deepest node (the root is at depth zero).
    pub max_depth: u32,

    /// Number of references in the smallest leaf; zero when there are no
    /// leaves.
    pub min_leaf_size: usize,

    /// Number of references in the largest leaf.
    pub max_leaf_size: usize,

    pub leaf_count: usize,

    /// Number of nodes, internal and leaves together.
    pub node_count: usize,

    /// Number of references across all leaves; larger than the number of
    /// input primitives when spatial splits duplicated some of them.
    pub reference_count: usize,

    /// Number of nodes split by a spatial split.
    pub spatial_splits: usize,

    /// Sum of the surface areas of all nodes.
    pub total_surface_area: f32,
}

impl BuildStats {
    pub(crate) fn add_internal(&mut self, depth: u32, area: f32) {
        self.add_node(depth, area);
    }

    pub(crate) fn add_leaf(&mut self, depth: u32, area: f32, size: usize) {
        self.add_node(depth, area);

        if self.leaf_count == 0 {
            self.min_leaf_size = size;
        } else {
            self.min_leaf_size = self.min_leaf_size.min(size);
        }

        self.max_leaf_size = self.max_leaf_size.max(size);
        self.leaf_count += 1;
        self.reference_count += size;
    }

    fn add_node(&mut self, depth: u32, area: f32) {
        self.max_depth = self.max_depth.max(depth);
        self.node_count += 1;
        self.total_surface_area += area;
    }

    pub(crate) fn merge(&mut self, other: Self) {
        if other.leaf_count > 0 {
            self.min_leaf_size = if self.leaf_count == 0 {
                other.min_leaf_size
            } else {
                self.min_leaf_size.min(other.min_leaf_size)
            };
        }

        self.max_depth = self.max_depth.max(other.max_depth);
        self.max_leaf_size = self.max_leaf_size.max(other.max_leaf_size);
        self.leaf_count += other.leaf_count;
        self.node_count += other.node_count;
        self.reference_count += other.reference_count;
        self.spatial_splits += other.spatial_splits;
        self.total_surface_area += other.total_surface_area;
    }

    /// Returns the average number of references per leaf.
    pub fn average_leaf_size(&self) -> f32 {
        if self.leaf_count == 0 {
            0.0
        } else {
            (self.reference_count as f32) / (self.leaf_count as f32)
        }
    }
}
