use glam::Vec3;

use super::{Binning, Reference};
use crate::{Axis, BoundingBox};

/// Split at a plane that cuts through references, duplicating those that
/// straddle it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct SpatialSplit {
    pub axis: Axis,
    pub position: f32,
    pub cost: f32,
    pub left_bb: BoundingBox,
    pub right_bb: BoundingBox,
    pub left_count: usize,
    pub right_count: usize,
}

impl SpatialSplit {
    /// Looks for the cheapest spatial split by binning the node's bounding
    /// box and clipping every reference into the bins it overlaps.
    pub fn find(
        triangles: &[[Vec3; 3]],
        refs: &[Reference],
        node_bb: BoundingBox,
        bin_count: usize,
    ) -> Option<Self> {
        let node_extent = node_bb.extent().max_element();
        let mut bins = vec![Bin::default(); bin_count];
        let mut right_bbs = vec![BoundingBox::default(); bin_count];
        let mut right_counts = vec![0; bin_count];
        let mut best: Option<Self> = None;

        for axis in Axis::all() {
            let Some(binning) = Binning::new(
                axis,
                node_bb.min()[axis],
                node_bb.extent()[axis],
                node_extent,
                bin_count,
            ) else {
                continue;
            };

            bins.fill(Bin::default());

            for r in refs {
                let (first_bin_idx, last_bin_idx) =
                    binning.span_of(r.bb.min()[axis], r.bb.max()[axis]);

                let triangle = &triangles[r.triangle_id as usize];
                let mut rest = *r;

                for bin_idx in first_bin_idx..last_bin_idx {
                    let (left, right) = rest.split(
                        triangle,
                        axis,
                        binning.position(bin_idx + 1),
                    );

                    bins[bin_idx].bb += left;
                    rest.bb = right;
                }

                bins[last_bin_idx].bb += rest.bb;
                bins[first_bin_idx].enter += 1;
                bins[last_bin_idx].exit += 1;
            }

            // ---

            let mut right_bb = BoundingBox::default();
            let mut right_count = 0;

            for bin_idx in (0..bin_count).rev() {
                right_bb += bins[bin_idx].bb;
                right_count += bins[bin_idx].exit;
                right_bbs[bin_idx] = right_bb;
                right_counts[bin_idx] = right_count;
            }

            // ---

            let mut left_bb = BoundingBox::default();
            let mut left_count = 0;

            for bin_idx in 1..bin_count {
                left_bb += bins[bin_idx - 1].bb;
                left_count += bins[bin_idx - 1].enter;

                let right_count = right_counts[bin_idx];

                if left_count == 0 || right_count == 0 {
                    continue;
                }

                let cost = left_bb.area() * (left_count as f32)
                    + right_bbs[bin_idx].area() * (right_count as f32);

                if best.map_or(true, |best| cost < best.cost) {
                    best = Some(Self {
                        axis,
                        position: binning.position(bin_idx),
                        cost,
                        left_bb,
                        right_bb: right_bbs[bin_idx],
                        left_count,
                        right_count,
                    });
                }
            }
        }

        best
    }

    /// Distributes references between both children.
    ///
    /// A reference that straddles the plane is either moved whole into one
    /// of the children or clipped into both of them, whichever turns out to
    /// be cheaper.
    ///
    /// Returns `None` if that left one of the children empty.
    pub fn perform(
        &self,
        triangles: &[[Vec3; 3]],
        refs: &[Reference],
    ) -> Option<(Vec<Reference>, Vec<Reference>)> {
        let axis = self.axis;
        let mut left = Vec::with_capacity(self.left_count);
        let mut right = Vec::with_capacity(self.right_count);
        let mut left_bb = self.left_bb;
        let mut right_bb = self.right_bb;
        let mut left_count = self.left_count as f32;
        let mut right_count = self.right_count as f32;

        for r in refs {
            // Same rules as `Binning::span_of()`, so that the counts gathered
            // by `find()` stay valid here
            if r.bb.min()[axis] >= self.position {
                right.push(*r);
                continue;
            }

            if r.bb.max()[axis] <= self.position {
                left.push(*r);
                continue;
            }

            let triangle = &triangles[r.triangle_id as usize];
            let (r_left, r_right) = r.split(triangle, axis, self.position);

            if r_left.is_empty() {
                right.push(Reference { bb: r_right, ..*r });
                continue;
            }

            if r_right.is_empty() {
                left.push(Reference { bb: r_left, ..*r });
                continue;
            }

            let split_cost =
                left_bb.area() * left_count + right_bb.area() * right_count;

            let left_cost = (left_bb + r.bb).area() * left_count
                + right_bb.area() * (right_count - 1.0).max(0.0);

            let right_cost = left_bb.area() * (left_count - 1.0).max(0.0)
                + (right_bb + r.bb).area() * right_count;

            if left_cost <= right_cost && left_cost <= split_cost {
                left.push(*r);
                left_bb += r.bb;
                right_count = (right_count - 1.0).max(0.0);
            } else if right_cost <= split_cost {
                right.push(*r);
                right_bb += r.bb;
                left_count = (left_count - 1.0).max(0.0);
            } else {
                left.push(Reference { bb: r_left, ..*r });
                right.push(Reference { bb: r_right, ..*r });
            }
        }

        if left.is_empty() || right.is_empty() {
            return None;
        }

        Some((left, right))
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct Bin {
    bb: BoundingBox,
    enter: usize,
    exit: usize,
}
