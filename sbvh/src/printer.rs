use std::fmt::Write;

use crate::{Bvh, BvhNode};

/// Dumps a BVH in Graphviz's `dot` format.
///
/// ```shell
/// $ dot -Tsvg bvh.dot > bvh.svg
/// ```
pub struct BvhPrinter;

impl BvhPrinter {
    pub fn print<P>(bvh: &Bvh<P>) -> String {
        let mut out = String::new();

        _ = writeln!(&mut out, "digraph {{");

        if !bvh.is_empty() {
            Self::process(&mut out, bvh, 0);
        }

        _ = writeln!(&mut out, "}}");

        out
    }

    fn process<P>(out: &mut String, bvh: &Bvh<P>, id: u32) {
        match bvh.nodes()[id as usize] {
            BvhNode::Internal {
                left_bb,
                right_bb,
                left_id,
                right_id,
            } => {
                _ = writeln!(out, "  n{} [label=\"node\"]", id);

                for (child_id, child_bb) in
                    [(left_id, left_bb), (right_id, right_bb)]
                {
                    _ = writeln!(
                        out,
                        "  n{} -> n{} [label=\"{} : {}\"]",
                        id,
                        child_id,
                        child_bb.min(),
                        child_bb.max()
                    );

                    Self::process(out, bvh, child_id);
                }
            }

            BvhNode::Leaf {
                data_offset,
                data_count,
            } => {
                let triangles = bvh.triangles()
                    [(data_offset as usize)..][..(data_count as usize)]
                    .iter()
                    .map(|entry| entry.triangle_id.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");

                _ = writeln!(out, "  n{} [label=\"leaf({})\"]", id, triangles);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::vec3;

    use super::*;
    use crate::{BuildOptions, Triangle};

    #[test]
    fn test() {
        let triangles = [
            Triangle::new(
                vec3(0.0, 0.0, 0.0),
                vec3(1.0, 0.0, 0.0),
                vec3(0.0, 1.0, 0.0),
            ),
            Triangle::new(
                vec3(5.0, 0.0, 0.0),
                vec3(6.0, 0.0, 0.0),
                vec3(5.0, 1.0, 0.0),
            ),
        ];

        let options = BuildOptions::default().with_larger_child_first(false);
        let bvh = Bvh::from_triangles(&triangles, &options).unwrap();

        let expected = "digraph {
  n0 [label=\"node\"]
  n0 -> n1 [label=\"[0, 0, 0] : [1, 1, 0]\"]
  n1 [label=\"leaf(0)\"]
  n0 -> n2 [label=\"[5, 0, 0] : [6, 1, 0]\"]
  n2 [label=\"leaf(1)\"]
}
";

        assert_eq!(expected, BvhPrinter::print(&bvh));
    }

    #[test]
    fn empty() {
        let bvh = Bvh::<()>::from_triangles(&[], &BuildOptions::default())
            .unwrap();

        assert_eq!("digraph {\n}\n", BvhPrinter::print(&bvh));
    }
}
