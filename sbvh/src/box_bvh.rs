use crate::builder::{Builder, Reference};
use crate::metrics::measure;
use crate::{
    flatten, BoundingBox, BuildError, BuildOptions, BuildResult, BuildStats,
    BvhNode, BvhStack, Ray,
};

/// Bounding volume hierarchy over bare bounding boxes (e.g. bounds of whole
/// objects or instances).
///
/// Unlike [`crate::Bvh`], it never splits boxes apart and keeps a single box
/// per leaf wherever possible.
#[derive(Clone, Debug)]
pub struct BoxBvh {
    nodes: Vec<BvhNode>,
    ids: Vec<u32>,
    boxes: Vec<BoundingBox>,
    bounds: BoundingBox,
    stats: BuildStats,
}

impl BoxBvh {
    /// Builds a BVH over given boxes; see [`BuildOptions::for_boxes()`] for
    /// the recommended options.
    ///
    /// Spatial splits are never performed here, regardless of `options`.
    pub fn build(
        boxes: &[BoundingBox],
        options: &BuildOptions,
    ) -> BuildResult<Self> {
        options.validate()?;

        if boxes.len() > u32::MAX as usize {
            return Err(BuildError::TooManyPrimitives { count: boxes.len() });
        }

        log::debug!(
            "Building box BVH; boxes = {}, options = {:?}",
            boxes.len(),
            options
        );

        let bounds = boxes.iter().copied().collect();

        if boxes.is_empty() {
            return Ok(Self {
                nodes: Default::default(),
                ids: Default::default(),
                boxes: Default::default(),
                bounds,
                stats: Default::default(),
            });
        }

        let ((nodes, ids, stats), tt) = measure(|| {
            let refs = boxes
                .iter()
                .enumerate()
                .map(|(id, bb)| Reference {
                    triangle_id: id as u32,
                    bb: *bb,
                })
                .collect();

            let (build_nodes, stats) = Builder::for_boxes(options).run(refs);

            let (nodes, ids) =
                flatten::run(&build_nodes, options.larger_child_first, |r| {
                    r.triangle_id
                });

            (nodes, ids, stats)
        });

        log::info!(
            "Box BVH built; boxes = {}, nodes = {}, depth = {}, tt = {:?}",
            boxes.len(),
            nodes.len(),
            stats.max_depth,
            tt,
        );

        Ok(Self {
            nodes,
            ids,
            boxes: boxes.to_vec(),
            bounds,
            stats,
        })
    }

    /// Returns ids of all boxes crossed by the ray within `max_distance`,
    /// nearer ones (roughly) first.
    pub fn hits(&self, ray: &Ray, max_distance: f32) -> Vec<u32> {
        let mut hits = Vec::new();

        self.for_each_hit(ray, max_distance, &mut BvhStack::new(), |id| {
            hits.push(id);
        });

        hits
    }

    pub fn for_each_hit(
        &self,
        ray: &Ray,
        max_distance: f32,
        stack: &mut BvhStack,
        mut f: impl FnMut(u32),
    ) {
        if self.nodes.is_empty() {
            return;
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
                    let left = ray.hit_bounds(&left_bb, 0.0, max_distance);
                    let right = ray.hit_bounds(&right_bb, 0.0, max_distance);

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
                    let ids = &self.ids[(data_offset as usize)..]
                        [..(data_count as usize)];

                    for &id in ids {
                        let bb = &self.boxes[id as usize];

                        if ray.hit_bounds(bb, 0.0, max_distance).is_some() {
                            f(id);
                        }
                    }
                }
            }
        }
    }

    pub fn nodes(&self) -> &[BvhNode] {
        &self.nodes
    }

    /// Returns ids of boxes, in the order they are stored in the leaves.
    pub fn ids(&self) -> &[u32] {
        &self.ids
    }

    pub fn bounds(&self) -> BoundingBox {
        self.bounds
    }

    pub fn stats(&self) -> &BuildStats {
        &self.stats
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use glam::{vec3, Vec3};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;

    fn grid() -> Vec<BoundingBox> {
        let mut boxes = Vec::new();

        for x in 0..8 {
            for y in 0..8 {
                let min = vec3(2.0 * (x as f32), 2.0 * (y as f32), 0.0);

                boxes.push(BoundingBox::new(min, min + Vec3::ONE));
            }
        }

        boxes
    }

    #[test]
    fn single_box_per_leaf() {
        let boxes = grid();
        let target = BoxBvh::build(&boxes, &BuildOptions::for_boxes()).unwrap();

        assert_eq!(boxes.len(), target.stats().leaf_count);
        assert_eq!(1, target.stats().max_leaf_size);
        assert_eq!(0, target.stats().spatial_splits);
        assert_eq!(2 * boxes.len() - 1, target.nodes().len());

        let mut ids = target.ids().to_vec();

        ids.sort();

        assert_eq!((0..boxes.len() as u32).collect::<Vec<_>>(), ids);
    }

    #[test]
    fn hits() {
        let boxes = grid();
        let target = BoxBvh::build(&boxes, &BuildOptions::for_boxes()).unwrap();

        // ---
        // Case 1: ray going along the `y = 0` row, from the left

        let ray = Ray::new(vec3(-5.0, 0.5, 0.5), Vec3::X);

        assert_eq!(
            vec![0, 8, 16, 24, 32, 40, 48, 56],
            target.hits(&ray, 100.0)
        );

        // ---
        // Case 2: the same, but shorter

        assert_eq!(vec![0, 8], target.hits(&ray, 8.0));

        // ---
        // Case 3: ray going between rows

        let ray = Ray::new(vec3(-5.0, 1.5, 0.5), Vec3::X);

        assert!(target.hits(&ray, 100.0).is_empty());

        // ---
        // Case 4: ray going down, through a single box

        let ray = Ray::new(vec3(4.5, 6.5, 10.0), -Vec3::Z);

        assert_eq!(vec![2 * 8 + 3], target.hits(&ray, 100.0));
    }

    #[test]
    fn matches_brute_force() {
        let mut rng = StdRng::seed_from_u64(7);

        let boxes: Vec<_> = (0..500)
            .map(|_| {
                let min = vec3(
                    rng.gen_range(-50.0..50.0),
                    rng.gen_range(-50.0..50.0),
                    rng.gen_range(-50.0..50.0),
                );

                let size = vec3(
                    rng.gen_range(0.0..5.0),
                    rng.gen_range(0.0..5.0),
                    rng.gen_range(0.0..5.0),
                );

                BoundingBox::new(min, min + size)
            })
            .collect();

        let target = BoxBvh::build(&boxes, &BuildOptions::for_boxes()).unwrap();
        let mut stack = BvhStack::new();

        for _ in 0..100 {
            let origin = vec3(
                rng.gen_range(-80.0..80.0),
                rng.gen_range(-80.0..80.0),
                rng.gen_range(-80.0..80.0),
            );

            let ray = Ray::new(origin, (-origin).normalize());

            let mut expected: Vec<_> = boxes
                .iter()
                .enumerate()
                .filter(|(_, bb)| ray.hit_bounds(bb, 0.0, 1000.0).is_some())
                .map(|(id, _)| id as u32)
                .collect();

            let mut actual = Vec::new();

            target.for_each_hit(&ray, 1000.0, &mut stack, |id| actual.push(id));

            expected.sort();
            actual.sort();

            assert_eq!(expected, actual);
        }
    }

    #[test]
    fn empty() {
        let target = BoxBvh::build(&[], &BuildOptions::for_boxes()).unwrap();

        assert!(target.is_empty());
        assert!(target.hits(&Ray::new(Vec3::ZERO, Vec3::X), 1.0).is_empty());
    }
}
