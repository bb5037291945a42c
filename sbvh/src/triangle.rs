use std::fmt;

use glam::Vec3;

use crate::BoundingBox;

/// Triangle with an opaque payload (e.g. a material or a mesh index) that's
/// carried along into the finished BVH.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Triangle<P = ()> {
    pub v0: Vec3,
    pub v1: Vec3,
    pub v2: Vec3,
    pub payload: P,
}

impl Triangle {
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        Self::with_payload(v0, v1, v2, ())
    }
}

impl<P> Triangle<P> {
    pub fn with_payload(v0: Vec3, v1: Vec3, v2: Vec3, payload: P) -> Self {
        Self {
            v0,
            v1,
            v2,
            payload,
        }
    }

    pub fn positions(&self) -> [Vec3; 3] {
        [self.v0, self.v1, self.v2]
    }

    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::from_points(self.positions())
    }
}

/// Index of a triangle within the slice a BVH was built from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TriangleId(u32);

impl TriangleId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for TriangleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Triangle stored in a BVH's leaves.
///
/// Spatial splits can place the same triangle in more than one leaf, so a
/// BVH can contain many entries with the same `triangle_id`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BvhTriangle<P = ()> {
    pub triangle: Triangle<P>,
    pub triangle_id: TriangleId,
}
