use glam::{vec2, Vec2};

use crate::{TriangleHit, TriangleId};

/// Result of a closest-hit query.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    /// Index of the triangle within the slice the BVH was built from.
    pub triangle_id: TriangleId,

    /// Index into [`crate::Bvh::triangles()`]; useful for getting to the
    /// triangle's payload.
    pub slot: u32,

    pub distance: f32,

    /// Barycentric coordinates of the hit point; `x` weights `v1`, `y`
    /// weights `v2`.
    pub barycentric: Vec2,
}

impl Hit {
    pub(crate) fn new(
        triangle_id: TriangleId,
        slot: u32,
        hit: TriangleHit,
    ) -> Self {
        Self {
            triangle_id,
            slot,
            distance: hit.distance,
            barycentric: vec2(hit.u, hit.v),
        }
    }
}
