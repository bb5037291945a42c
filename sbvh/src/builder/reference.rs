use glam::Vec3;

use crate::{Axis, BoundingBox};

/// Primitive as seen by the builder.
///
/// After a spatial split the bounding box covers only the part of the
/// primitive that lies within the node, so it can be smaller than the
/// primitive's actual bounds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Reference {
    pub triangle_id: u32,
    pub bb: BoundingBox,
}

impl Reference {
    pub fn center(&self) -> Vec3 {
        self.bb.center()
    }

    /// Clips this reference's triangle against the plane `axis = position`,
    /// returning the bounds of the parts on both of its sides.
    ///
    /// Either of the returned boxes can be empty when the triangle doesn't
    /// actually reach that side within this reference's bounds.
    pub fn split(
        &self,
        triangle: &[Vec3; 3],
        axis: Axis,
        position: f32,
    ) -> (BoundingBox, BoundingBox) {
        let mut left = BoundingBox::default();
        let mut right = BoundingBox::default();

        for (i, &v0) in triangle.iter().enumerate() {
            let v1 = triangle[(i + 1) % 3];

            if v0[axis] <= position {
                left += v0;
            }

            if v0[axis] >= position {
                right += v0;
            }

            let crosses = (v0[axis] < position && v1[axis] > position)
                || (v0[axis] > position && v1[axis] < position);

            if crosses {
                let t = (position - v0[axis]) / (v1[axis] - v0[axis]);
                let mut p = v0.lerp(v1, t.clamp(0.0, 1.0));

                p[axis] = position;
                left += p;
                right += p;
            }
        }

        (left.intersection(self.bb), right.intersection(self.bb))
    }
}
