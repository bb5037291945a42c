use crate::builder::{BuildNode, BuildNodeId, BuildNodes, Reference};
use crate::BvhNode;

/// Converts the builder's tree into a contiguous array of nodes, with the
/// root at index zero, plus an array of leaf data (one entry per
/// reference, produced through `data_of`).
pub(crate) fn run<T>(
    nodes: &BuildNodes,
    larger_child_first: bool,
    data_of: impl Fn(&Reference) -> T,
) -> (Vec<BvhNode>, Vec<T>) {
    let mut out_nodes = Vec::with_capacity(nodes.len());
    let mut out_data = Vec::new();

    walk(
        nodes,
        larger_child_first,
        &data_of,
        &mut out_nodes,
        &mut out_data,
        BuildNodeId::root(),
    );

    (out_nodes, out_data)
}

fn walk<T>(
    nodes: &BuildNodes,
    larger_child_first: bool,
    data_of: &impl Fn(&Reference) -> T,
    out_nodes: &mut Vec<BvhNode>,
    out_data: &mut Vec<T>,
    id: BuildNodeId,
) -> u32 {
    let ptr = out_nodes.len() as u32;

    match &nodes[id] {
        BuildNode::Internal {
            left_id, right_id, ..
        } => {
            out_nodes.push(Default::default());

            let (left_id, right_id) = if larger_child_first
                && nodes[*right_id].bb().area() > nodes[*left_id].bb().area()
            {
                (*right_id, *left_id)
            } else {
                (*left_id, *right_id)
            };

            let left_ptr = walk(
                nodes,
                larger_child_first,
                data_of,
                out_nodes,
                out_data,
                left_id,
            );

            let right_ptr = walk(
                nodes,
                larger_child_first,
                data_of,
                out_nodes,
                out_data,
                right_id,
            );

            out_nodes[ptr as usize] = BvhNode::Internal {
                left_bb: nodes[left_id].bb(),
                right_bb: nodes[right_id].bb(),
                left_id: left_ptr,
                right_id: right_ptr,
            };
        }

        BuildNode::Leaf { refs, .. } => {
            let data_offset = out_data.len() as u32;

            out_data.extend(refs.iter().map(data_of));

            out_nodes.push(BvhNode::Leaf {
                data_offset,
                data_count: refs.len() as u32,
            });
        }
    }

    ptr
}

#[cfg(test)]
mod tests {
    use glam::{vec3, Vec3};

    use super::*;
    use crate::builder::Builder;
    use crate::{BoundingBox, BuildOptions};

    fn build() -> BuildNodes {
        // Small box at the left and a large one at the right; both get split
        // apart by the root
        let refs = vec![
            Reference {
                triangle_id: 0,
                bb: BoundingBox::new(Vec3::ZERO, Vec3::ONE),
            },
            Reference {
                triangle_id: 1,
                bb: BoundingBox::new(
                    vec3(10.0, 0.0, 0.0),
                    vec3(15.0, 5.0, 5.0),
                ),
            },
        ];

        let options = BuildOptions::for_boxes();

        Builder::for_boxes(&options).run(refs).0
    }

    #[test]
    fn layout() {
        let nodes = build();

        // ---
        // Case 1: children kept in their order

        let (target, data) = run(&nodes, false, |r| r.triangle_id);

        assert_eq!(
            vec![
                BvhNode::Internal {
                    left_bb: BoundingBox::new(Vec3::ZERO, Vec3::ONE),
                    right_bb: BoundingBox::new(
                        vec3(10.0, 0.0, 0.0),
                        vec3(15.0, 5.0, 5.0)
                    ),
                    left_id: 1,
                    right_id: 2,
                },
                BvhNode::Leaf {
                    data_offset: 0,
                    data_count: 1,
                },
                BvhNode::Leaf {
                    data_offset: 1,
                    data_count: 1,
                },
            ],
            target
        );

        assert_eq!(vec![0, 1], data);

        // ---
        // Case 2: larger child first

        let (target, data) = run(&nodes, true, |r| r.triangle_id);

        let BvhNode::Internal {
            left_bb, left_id, ..
        } = target[0]
        else {
            panic!("expected an internal node");
        };

        assert_eq!(vec3(10.0, 0.0, 0.0), left_bb.min());
        assert_eq!(1, left_id);
        assert_eq!(vec![1, 0], data);
    }
}
