use crate::BoundingBox;

/// Node of a flattened BVH.
///
/// Internal nodes keep bounding boxes of both of their children, so that a
/// traversal can decide where to go next without touching the children
/// themselves.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BvhNode {
    Internal {
        left_bb: BoundingBox,
        right_bb: BoundingBox,
        left_id: u32,
        right_id: u32,
    },

    /// Range of `data_count` entries starting at `data_offset`.
    Leaf { data_offset: u32, data_count: u32 },
}

impl BvhNode {
    pub fn is_leaf(&self) -> bool {
        matches!(self, BvhNode::Leaf { .. })
    }
}

impl Default for BvhNode {
    fn default() -> Self {
        BvhNode::Leaf {
            data_offset: 0,
            data_count: 0,
        }
    }
}
