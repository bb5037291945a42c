use glam::Vec3;

use crate::builder::{Builder, Reference};
use crate::metrics::{measure, measure_phase};
use crate::{
    flatten, BoundingBox, BuildError, BuildOptions, BuildResult, BuildStats,
    BvhNode, BvhStack, BvhTriangle, Hit, Ray, Triangle, TriangleId,
};

/// Bounding volume hierarchy over a static set of triangles.
///
/// Once built, the tree is immutable and can be queried from many threads at
/// once; changing the geometry requires building a new one.
#[derive(Clone, Debug)]
pub struct Bvh<P = ()> {
    nodes: Vec<BvhNode>,
    triangles: Vec<BvhTriangle<P>>,
    triangle_count: usize,
    bounds: BoundingBox,
    stats: BuildStats,
}

impl<P> Bvh<P>
where
    P: Clone,
{
    /// Builds a BVH over given triangles, where `aabbs[i]` is the bounding
    /// box of `triangles[i]`.
    pub fn build(
        aabbs: &[BoundingBox],
        triangles: &[Triangle<P>],
        options: &BuildOptions,
    ) -> BuildResult<Self> {
        options.validate()?;

        if aabbs.len() != triangles.len() {
            return Err(BuildError::MismatchedInputs {
                aabbs: aabbs.len(),
                triangles: triangles.len(),
            });
        }

        if triangles.len() > u32::MAX as usize {
            return Err(BuildError::TooManyPrimitives {
                count: triangles.len(),
            });
        }

        log::debug!(
            "Building BVH; triangles = {}, options = {:?}",
            triangles.len(),
            options
        );

        let bounds: BoundingBox = aabbs.iter().copied().collect();

        if triangles.is_empty() {
            return Ok(Self {
                nodes: Default::default(),
                triangles: Default::default(),
                triangle_count: 0,
                bounds,
                stats: Default::default(),
            });
        }

        let ((nodes, triangles_out, stats), tt) = measure(|| {
            let positions: Vec<[Vec3; 3]> =
                triangles.iter().map(|t| t.positions()).collect();

            let refs = aabbs
                .iter()
                .enumerate()
                .map(|(triangle_id, bb)| Reference {
                    triangle_id: triangle_id as u32,
                    bb: *bb,
                })
                .collect();

            let (build_nodes, stats) = measure_phase("bvh.build", || {
                Builder::for_triangles(&positions, options, bounds).run(refs)
            });

            let (nodes, triangles_out) = measure_phase("bvh.flatten", || {
                flatten::run(&build_nodes, options.larger_child_first, |r| {
                    BvhTriangle {
                        triangle: triangles[r.triangle_id as usize].clone(),
                        triangle_id: TriangleId::new(r.triangle_id),
                    }
                })
            });

            (nodes, triangles_out, stats)
        });

        log::info!(
            "BVH built; triangles = {}, nodes = {}, references = {}, \
             depth = {}, spatial-splits = {}, tt = {:?}",
            triangles.len(),
            nodes.len(),
            triangles_out.len(),
            stats.max_depth,
            stats.spatial_splits,
            tt,
        );

        Ok(Self {
            nodes,
            triangles: triangles_out,
            triangle_count: triangles.len(),
            bounds,
            stats,
        })
    }

    /// Builds a BVH over given triangles, deriving their bounding boxes
    /// from their vertices.
    pub fn from_triangles(
        triangles: &[Triangle<P>],
        options: &BuildOptions,
    ) -> BuildResult<Self> {
        let aabbs: Vec<_> = triangles.iter().map(|t| t.bounds()).collect();

        Self::build(&aabbs, triangles, options)
    }
}

impl<P> Bvh<P> {
    /// Returns the nearest triangle hit by the ray within `max_distance`.
    pub fn closest_hit(&self, ray: &Ray, max_distance: f32) -> Option<Hit> {
        self.closest_hit_with(ray, max_distance, &mut BvhStack::new())
    }

    pub fn closest_hit_with(
        &self,
        ray: &Ray,
        max_distance: f32,
        stack: &mut BvhStack,
    ) -> Option<Hit> {
        if self.nodes.is_empty() {
            return None;
        }

        let mut closest = max_distance;
        let mut hit = None;

        stack.reset();
        stack.push(0, 0.0);

        while let Some((node_id, distance)) = stack.pop() {
            if distance > closest {
                continue;
            }

            match self.nodes[node_id as usize] {
                BvhNode::Internal {
                    left_bb,
                    right_bb,
                    left_id,
                    right_id,
                } => {
                    let left = ray.hit_bounds(&left_bb, 0.0, closest);
                    let right = ray.hit_bounds(&right_bb, 0.0, closest);

                    // Farther child goes first, so that the nearer one gets
                    // popped (and checked) sooner
                    match (left, right) {
                        (Some(left), Some(right)) => {
                            if left <= right {
                                stack.push(right_id, right);
                                stack.push(left_id, left);
                            } else {
                                stack.push(left_id, left);
                                stack.push(right_id, right);
                            }
                        }

                        (Some(left), None) => {
                            stack.push(left_id, left);
                        }

                        (None, Some(right)) => {
                            stack.push(right_id, right);
                        }

                        (None, None) => {
                            //
                        }
                    }
                }

                BvhNode::Leaf {
                    data_offset,
                    data_count,
                } => {
                    for slot in data_offset..(data_offset + data_count) {
                        let entry = &self.triangles[slot as usize];
                        let triangle = &entry.triangle;

                        let Some(triangle_hit) = ray.hit_triangle(
                            triangle.v0,
                            triangle.v1,
                            triangle.v2,
                        ) else {
                            continue;
                        };

                        // Until something's found, a hit right at
                        // `max_distance` counts too
                        let is_closer = if hit.is_some() {
                            triangle_hit.distance < closest
                        } else {
                            triangle_hit.distance <= closest
                        };

                        if is_closer {
                            closest = triangle_hit.distance;

                            hit = Some(Hit::new(
                                entry.triangle_id,
                                slot,
                                triangle_hit,
                            ));
                        }
                    }
                }
            }
        }

        hit
    }

    /// Checks whether the ray hits anything within `max_distance`.
    pub fn any_hit(&self, ray: &Ray, max_distance: f32) -> bool {
        self.any_hit_with(ray, max_distance, &mut BvhStack::new())
    }

    pub fn any_hit_with(
        &self,
        ray: &Ray,
        max_distance: f32,
        stack: &mut BvhStack,
    ) -> bool {
        if self.nodes.is_empty() {
            return false;
        }

        stack.reset();
        stack.push(0, 0.0);

        while let Some((node_id, _)) = stack.pop() {
            match self.nodes[node_id as usize] {
                BvhNode::Internal {
                    left_bb,
                    right_bb,
                    left_id,
                    right_id,
                } => {
                    // Left child goes last, so that it gets visited first;
                    // it's the larger one, if built so
                    if let Some(distance) =
                        ray.hit_bounds(&right_bb, 0.0, max_distance)
                    {
                        stack.push(right_id, distance);
                    }

                    if let Some(distance) =
                        ray.hit_bounds(&left_bb, 0.0, max_distance)
                    {
                        stack.push(left_id, distance);
                    }
                }

                BvhNode::Leaf {
                    data_offset,
                    data_count,
                } => {
                    for slot in data_offset..(data_offset + data_count) {
                        let triangle = &self.triangles[slot as usize].triangle;

                        let is_hit = ray
                            .hit_triangle(triangle.v0, triangle.v1, triangle.v2)
                            .map_or(false, |hit| hit.distance <= max_distance);

                        if is_hit {
                            return true;
                        }
                    }
                }
            }
        }

        false
    }

    pub fn nodes(&self) -> &[BvhNode] {
        &self.nodes
    }

    /// Returns triangles as stored in the leaves.
    ///
    /// A triangle split by the builder appears here more than once.
    pub fn triangles(&self) -> &[BvhTriangle<P>] {
        &self.triangles
    }

    pub fn triangle(&self, slot: u32) -> Option<&BvhTriangle<P>> {
        self.triangles.get(slot as usize)
    }

    /// Returns the union of bounding boxes the BVH was built from.
    pub fn bounds(&self) -> BoundingBox {
        self.bounds
    }

    pub fn stats(&self) -> &BuildStats {
        &self.stats
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Checks the tree's structural invariants, panicking if any of them is
    /// broken:
    ///
    /// - each node is reachable from the root exactly once,
    /// - leaves' ranges cover all the stored triangles exactly once,
    /// - each input triangle is stored at least once,
    /// - each child's bounding box is contained within its parent's.
    pub fn validate(&self) {
        if self.nodes.is_empty() {
            assert!(self.triangles.is_empty());
            return;
        }

        let mut visited_nodes = vec![false; self.nodes.len()];
        let mut visited_slots = vec![false; self.triangles.len()];
        let mut seen_triangles = vec![false; self.triangle_count];

        self.validate_node(
            0,
            self.bounds,
            &mut visited_nodes,
            &mut visited_slots,
            &mut seen_triangles,
        );

        assert!(visited_nodes.into_iter().all(|visited| visited));
        assert!(visited_slots.into_iter().all(|visited| visited));
        assert!(seen_triangles.into_iter().all(|seen| seen));
    }

    fn validate_node(
        &self,
        id: u32,
        bb: BoundingBox,
        visited_nodes: &mut [bool],
        visited_slots: &mut [bool],
        seen_triangles: &mut [bool],
    ) {
        assert!(
            !visited_nodes[id as usize],
            "node {id} is reachable more than once"
        );

        visited_nodes[id as usize] = true;

        match self.nodes[id as usize] {
            BvhNode::Internal {
                left_bb,
                right_bb,
                left_id,
                right_id,
            } => {
                for (child_id, child_bb) in
                    [(left_id, left_bb), (right_id, right_bb)]
                {
                    assert!(child_id > id);

                    assert!(
                        bb.contains(&child_bb),
                        "node {child_id} sticks out of its parent"
                    );

                    self.validate_node(
                        child_id,
                        child_bb,
                        visited_nodes,
                        visited_slots,
                        seen_triangles,
                    );
                }
            }

            BvhNode::Leaf {
                data_offset,
                data_count,
            } => {
                assert!(
                    (data_offset as usize) + (data_count as usize)
                        <= self.triangles.len()
                );

                for slot in data_offset..(data_offset + data_count) {
                    assert!(!visited_slots[slot as usize]);

                    visited_slots[slot as usize] = true;

                    let entry = &self.triangles[slot as usize];

                    assert!(
                        bb.overlaps(&entry.triangle.bounds()),
                        "triangle {} lies outside of its leaf",
                        entry.triangle_id
                    );

                    seen_triangles[entry.triangle_id.get() as usize] = true;
                }
            }
        }
    }
}
