mod binning;
mod median_split;
mod nodes;
mod object_split;
mod reference;
mod spatial_split;

use glam::Vec3;

pub(crate) use self::binning::*;
pub(crate) use self::median_split::*;
pub(crate) use self::nodes::*;
pub(crate) use self::object_split::*;
pub(crate) use self::reference::*;
pub(crate) use self::spatial_split::*;
use crate::{BoundingBox, BuildOptions, BuildStats};

/// Top-down SAH builder.
///
/// When given triangles, the builder considers spatial splits as well;
/// without them (i.e. for bare bounding boxes) only object splits are
/// performed.
#[derive(Debug)]
pub(crate) struct Builder<'a> {
    triangles: &'a [[Vec3; 3]],
    options: &'a BuildOptions,
    min_overlap: f32,
    median_fallback: MedianFallback,
}

/// Which nodes fall back to a median split when the SAH finds no split
/// cheaper than a leaf.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum MedianFallback {
    RootOnly,
    Always,
}

impl<'a> Builder<'a> {
    pub fn for_triangles(
        triangles: &'a [[Vec3; 3]],
        options: &'a BuildOptions,
        root_bb: BoundingBox,
    ) -> Self {
        Self {
            triangles,
            options,
            min_overlap: root_bb.area() * options.min_overlap_factor,
            median_fallback: MedianFallback::RootOnly,
        }
    }

    pub fn for_boxes(options: &'a BuildOptions) -> Self {
        Self {
            triangles: &[],
            options,
            min_overlap: 0.0,
            median_fallback: MedianFallback::Always,
        }
    }

    /// Builds the tree; the root lands at [`BuildNodeId::root()`].
    pub fn run(&self, refs: Vec<Reference>) -> (BuildNodes, BuildStats) {
        let bb = refs.iter().map(|r| r.bb).collect();

        self.run_detached(refs, bb, 0)
    }

    fn run_detached(
        &self,
        refs: Vec<Reference>,
        bb: BoundingBox,
        depth: u32,
    ) -> (BuildNodes, BuildStats) {
        let mut nodes = BuildNodes::default();
        let mut stats = BuildStats::default();

        self.build(
            &mut nodes,
            &mut stats,
            BuildNodeId::root(),
            refs,
            bb,
            depth,
        );

        (nodes, stats)
    }

    fn build(
        &self,
        nodes: &mut BuildNodes,
        stats: &mut BuildStats,
        id: BuildNodeId,
        refs: Vec<Reference>,
        bb: BoundingBox,
        depth: u32,
    ) {
        let (left, right) = match self.decide(&refs, bb, depth) {
            Decision::Leaf => {
                stats.add_leaf(depth, bb.area(), refs.len());
                nodes[id] = BuildNode::Leaf { bb, refs };
                return;
            }

            Decision::Object(split) => split.perform(refs),

            Decision::Spatial(left, right) => {
                stats.spatial_splits += 1;
                (left, right)
            }

            Decision::Median => median_split(refs, bb),
        };

        let left_bb = left.iter().map(|r| r.bb).collect();
        let right_bb = right.iter().map(|r| r.bb).collect();

        stats.add_internal(depth, bb.area());

        let (left_id, right_id) = if self.options.parallel
            && depth <= self.options.parallel_depth_limit
        {
            let ((left_nodes, left_stats), (right_nodes, right_stats)) =
                rayon::join(
                    || self.run_detached(left, left_bb, depth + 1),
                    || self.run_detached(right, right_bb, depth + 1),
                );

            stats.merge(left_stats);
            stats.merge(right_stats);

            (nodes.append(left_nodes), nodes.append(right_nodes))
        } else {
            let left_id = nodes.reserve();
            let right_id = nodes.reserve();

            self.build(nodes, stats, left_id, left, left_bb, depth + 1);
            self.build(nodes, stats, right_id, right, right_bb, depth + 1);

            (left_id, right_id)
        };

        nodes[id] = BuildNode::Internal {
            bb,
            left_id,
            right_id,
        };
    }

    fn decide(
        &self,
        refs: &[Reference],
        bb: BoundingBox,
        depth: u32,
    ) -> Decision {
        if refs.len() <= 1 {
            return Decision::Leaf;
        }

        if depth > 0
            && (refs.len() <= self.options.ref_threshold as usize
                || depth >= self.options.max_depth)
        {
            return Decision::Leaf;
        }

        let node_cost = (refs.len() as f32) * bb.area();
        let bin_count = self.options.bin_count_at(depth);
        let object = ObjectSplit::find(refs, bb, bin_count);

        let spatial = object
            .filter(|object| self.should_try_spatial_split(object, depth))
            .and_then(|_| {
                SpatialSplit::find(self.triangles, refs, bb, bin_count)
            });

        let object_cost = object.map_or(f32::INFINITY, |split| split.cost);
        let spatial_cost = spatial.map_or(f32::INFINITY, |split| split.cost);

        if object_cost >= node_cost && spatial_cost >= node_cost {
            return if depth == 0
                || self.median_fallback == MedianFallback::Always
            {
                Decision::Median
            } else {
                Decision::Leaf
            };
        }

        // Ties prefer the object split
        if let Some(spatial) = spatial.filter(|_| spatial_cost < object_cost) {
            if let Some((left, right)) = spatial.perform(self.triangles, refs)
            {
                return Decision::Spatial(left, right);
            }
        }

        match object {
            Some(object) => Decision::Object(object),
            None => Decision::Leaf,
        }
    }

    fn should_try_spatial_split(
        &self,
        object: &ObjectSplit,
        depth: u32,
    ) -> bool {
        self.options.spatial_splits
            && !self.triangles.is_empty()
            && depth <= self.options.spatial_split_depth_limit
            && object.overlap() >= self.min_overlap
    }
}

#[derive(Debug)]
enum Decision {
    Leaf,
    Object(ObjectSplit),
    Spatial(Vec<Reference>, Vec<Reference>),
    Median,
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::vec3;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;

    fn refs_of(triangles: &[[Vec3; 3]]) -> Vec<Reference> {
        triangles
            .iter()
            .enumerate()
            .map(|(triangle_id, triangle)| Reference {
                triangle_id: triangle_id as u32,
                bb: BoundingBox::from_points(*triangle),
            })
            .collect()
    }

    fn random_triangles(seed: u64, count: usize) -> Vec<[Vec3; 3]> {
        let mut rng = StdRng::seed_from_u64(seed);

        (0..count)
            .map(|_| {
                let center = vec3(
                    rng.gen_range(-50.0..50.0),
                    rng.gen_range(-50.0..50.0),
                    rng.gen_range(-50.0..50.0),
                );

                [0, 1, 2].map(|_| {
                    center
                        + vec3(
                            rng.gen_range(-5.0..5.0),
                            rng.gen_range(-5.0..5.0),
                            rng.gen_range(-5.0..5.0),
                        )
                })
            })
            .collect()
    }

    fn build(
        triangles: &[[Vec3; 3]],
        options: &BuildOptions,
    ) -> (BuildNodes, BuildStats) {
        let refs = refs_of(triangles);
        let root_bb = refs.iter().map(|r| r.bb).collect();

        Builder::for_triangles(triangles, options, root_bb).run(refs)
    }

    /// Returns triangle ids of all leaves, in depth-first order.
    fn leaves(nodes: &BuildNodes, id: BuildNodeId) -> Vec<Vec<u32>> {
        match &nodes[id] {
            BuildNode::Internal {
                left_id, right_id, ..
            } => {
                let mut out = leaves(nodes, *left_id);

                out.extend(leaves(nodes, *right_id));
                out
            }

            BuildNode::Leaf { refs, .. } => {
                vec![refs.iter().map(|r| r.triangle_id).collect()]
            }
        }
    }

    fn assert_contains_children(nodes: &BuildNodes, id: BuildNodeId) {
        if let BuildNode::Internal {
            bb,
            left_id,
            right_id,
        } = &nodes[id]
        {
            for child_id in [*left_id, *right_id] {
                assert!(bb.contains(&nodes[child_id].bb()));
                assert_contains_children(nodes, child_id);
            }
        }
    }

    #[test]
    fn single_reference() {
        let triangles = [[Vec3::ZERO, Vec3::X, Vec3::Y]];
        let (nodes, stats) = build(&triangles, &BuildOptions::default());

        assert_eq!(vec![vec![0]], leaves(&nodes, BuildNodeId::root()));
        assert_eq!(1, stats.node_count);
        assert_eq!(1, stats.leaf_count);
        assert_eq!(0, stats.max_depth);
    }

    #[test]
    fn root_always_splits() {
        // ---
        // Case 1: two references, below `ref_threshold`

        let triangles = [
            [Vec3::ZERO, Vec3::X, Vec3::Y],
            [Vec3::Z, Vec3::Z + Vec3::X, Vec3::Z + Vec3::Y],
        ];

        let (nodes, stats) = build(&triangles, &BuildOptions::default());

        assert_eq!(vec![vec![0], vec![1]], leaves(&nodes, BuildNodeId::root()));
        assert_eq!(3, stats.node_count);

        // ---
        // Case 2: references that can't be told apart

        let triangles = vec![[Vec3::ZERO, Vec3::X, Vec3::Y]; 10];
        let (nodes, stats) = build(&triangles, &BuildOptions::default());

        assert_eq!(
            vec![vec![0, 1, 2, 3, 4], vec![5, 6, 7, 8, 9]],
            leaves(&nodes, BuildNodeId::root())
        );

        assert_eq!(3, stats.node_count);
        assert_eq!(2, stats.leaf_count);
        assert_eq!(1, stats.max_depth);
        assert_eq!(5, stats.min_leaf_size);
        assert_eq!(5, stats.max_leaf_size);
    }

    #[test]
    fn boxes_split_down_to_single_references() {
        let options = BuildOptions::for_boxes();

        let refs = (0..8)
            .map(|triangle_id| Reference {
                triangle_id,
                bb: BoundingBox::new(Vec3::ZERO, Vec3::ONE),
            })
            .collect();

        let (nodes, stats) = Builder::for_boxes(&options).run(refs);

        assert_eq!(8, leaves(&nodes, BuildNodeId::root()).len());
        assert_eq!(15, stats.node_count);
        assert_eq!(3, stats.max_depth);
        assert_eq!(1, stats.max_leaf_size);
        assert_eq!(0, stats.spatial_splits);
    }

    #[test]
    fn random_scene() {
        let triangles = random_triangles(1234, 2000);
        let (nodes, stats) = build(&triangles, &BuildOptions::default());

        assert_eq!(stats.node_count, nodes.len());
        assert_eq!(stats.node_count, 2 * stats.leaf_count - 1);
        assert!(stats.max_depth <= 32);
        assert!(stats.max_leaf_size >= 1);
        assert!(stats.average_leaf_size() <= 8.0);
        assert!(stats.reference_count >= triangles.len());

        let leaves = leaves(&nodes, BuildNodeId::root());

        assert_eq!(stats.leaf_count, leaves.len());

        // Every triangle is referenced at least once, but never twice within
        // the same leaf
        let mut seen = vec![false; triangles.len()];

        for leaf in &leaves {
            let mut unique = leaf.clone();

            unique.sort();
            unique.dedup();

            assert_eq!(leaf.len(), unique.len());

            for triangle_id in unique {
                seen[triangle_id as usize] = true;
            }
        }

        assert!(seen.into_iter().all(|seen| seen));

        assert_contains_children(&nodes, BuildNodeId::root());
    }

    #[test]
    fn parallel_and_sequential_builds_match() {
        let triangles = random_triangles(4321, 1000);

        let (parallel_nodes, parallel_stats) = build(
            &triangles,
            &BuildOptions::default().with_parallel(true),
        );

        let (sequential_nodes, sequential_stats) = build(
            &triangles,
            &BuildOptions::default().with_parallel(false),
        );

        assert_eq!(
            leaves(&sequential_nodes, BuildNodeId::root()),
            leaves(&parallel_nodes, BuildNodeId::root()),
        );

        assert_eq!(sequential_stats.node_count, parallel_stats.node_count);
        assert_eq!(sequential_stats.max_depth, parallel_stats.max_depth);

        assert_eq!(
            sequential_stats.reference_count,
            parallel_stats.reference_count
        );

        assert_eq!(
            sequential_stats.spatial_splits,
            parallel_stats.spatial_splits
        );

        assert_relative_eq!(
            sequential_stats.total_surface_area,
            parallel_stats.total_surface_area,
            max_relative = 1e-4
        );
    }

    #[test]
    fn spatial_splits() {
        // Long, thin triangles crossing each other in a star shape; there's
        // no good way of separating them without clipping
        let triangles: Vec<_> = (0..64)
            .map(|i| {
                let angle = (i as f32) * std::f32::consts::PI / 64.0;
                let dir = vec3(angle.cos(), angle.sin(), 0.0) * 50.0;
                let offset = vec3(0.0, 0.0, (i as f32) * 0.01);

                [-dir + offset, dir + offset, dir + offset + Vec3::Z * 0.1]
            })
            .collect();

        let (_, with) = build(&triangles, &BuildOptions::default());

        let (_, without) = build(
            &triangles,
            &BuildOptions::default().with_spatial_splits(false),
        );

        assert!(with.spatial_splits > 0);
        assert!(with.reference_count > triangles.len());
        assert_eq!(0, without.spatial_splits);
        assert_eq!(triangles.len(), without.reference_count);
    }
}
