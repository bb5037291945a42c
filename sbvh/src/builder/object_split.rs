use super::{Binning, Reference};
use crate::{Axis, BoundingBox};

/// Split that partitions references by their centers, without duplicating
/// any of them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct ObjectSplit {
    pub binning: Binning,

    /// References in bins before this one go to the left child.
    pub bin_idx: usize,

    pub cost: f32,
    pub left_bb: BoundingBox,
    pub right_bb: BoundingBox,
}

impl ObjectSplit {
    /// Looks for the cheapest object split, evaluating the SAH at every bin
    /// boundary on every axis.
    ///
    /// Returns `None` if all centers lie (roughly) at the same point.
    pub fn find(
        refs: &[Reference],
        node_bb: BoundingBox,
        bin_count: usize,
    ) -> Option<Self> {
        let centroid_bb: BoundingBox =
            refs.iter().map(|r| r.center()).collect();

        let node_extent = node_bb.extent().max_element();
        let mut bins = vec![Bin::default(); bin_count];
        let mut right_bbs = vec![BoundingBox::default(); bin_count];
        let mut right_counts = vec![0; bin_count];
        let mut best: Option<Self> = None;

        for axis in Axis::all() {
            let Some(binning) = Binning::new(
                axis,
                centroid_bb.min()[axis],
                centroid_bb.extent()[axis],
                node_extent,
                bin_count,
            ) else {
                continue;
            };

            bins.fill(Bin::default());

            for r in refs {
                let bin = &mut bins[binning.bin_of(r.center()[axis])];

                bin.bb += r.bb;
                bin.count += 1;
            }

            // ---

            let mut right_bb = BoundingBox::default();
            let mut right_count = 0;

            for bin_idx in (0..bin_count).rev() {
                right_bb += bins[bin_idx].bb;
                right_count += bins[bin_idx].count;
                right_bbs[bin_idx] = right_bb;
                right_counts[bin_idx] = right_count;
            }

            // ---

            let mut left_bb = BoundingBox::default();
            let mut left_count = 0;

            for bin_idx in 1..bin_count {
                left_bb += bins[bin_idx - 1].bb;
                left_count += bins[bin_idx - 1].count;

                let right_count = right_counts[bin_idx];

                if left_count == 0 || right_count == 0 {
                    continue;
                }

                let cost = left_bb.area() * (left_count as f32)
                    + right_bbs[bin_idx].area() * (right_count as f32);

                if best.map_or(true, |best| cost < best.cost) {
                    best = Some(Self {
                        binning,
                        bin_idx,
                        cost,
                        left_bb,
                        right_bb: right_bbs[bin_idx],
                    });
                }
            }
        }

        best
    }

    pub fn is_left(&self, r: &Reference) -> bool {
        self.binning.bin_of(r.center()[self.binning.axis]) < self.bin_idx
    }

    pub fn perform(
        &self,
        refs: Vec<Reference>,
    ) -> (Vec<Reference>, Vec<Reference>) {
        refs.into_iter().partition(|r| self.is_left(r))
    }

    /// Returns the surface area of the region where both children overlap.
    pub fn overlap(&self) -> f32 {
        self.left_bb.intersection(self.right_bb).area()
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct Bin {
    bb: BoundingBox,
    count: usize,
}
