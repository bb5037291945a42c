use super::Reference;
use crate::{Axis, BoundingBox};

/// Splits references in half along the node's longest axis, disregarding
/// the SAH.
///
/// References are split by their centers at the middle of the node; if that
/// leaves one of the sides empty, they are sorted along that axis and split
/// by their count instead. Both sides are non-empty as long as there are at
/// least two references.
pub(crate) fn median_split(
    refs: Vec<Reference>,
    node_bb: BoundingBox,
) -> (Vec<Reference>, Vec<Reference>) {
    let axis = Axis::longest(node_bb.extent());
    let midpoint = node_bb.center()[axis];

    let (mut left, right): (Vec<_>, Vec<_>) = refs
        .into_iter()
        .partition(|r| r.center()[axis] < midpoint);

    if !left.is_empty() && !right.is_empty() {
        return (left, right);
    }

    left.extend(right);

    left.sort_by(|a, b| a.center()[axis].total_cmp(&b.center()[axis]));

    let right = left.split_off(left.len() / 2);

    (left, right)
}
