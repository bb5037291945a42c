use glam::Vec3;

use crate::BoundingBox;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Ray {
    origin: Vec3,
    direction: Vec3,
    inv_direction: Vec3,
}

impl Ray {
    /// Creates a new ray.
    ///
    /// `direction` doesn't have to be normalized, but then all distances
    /// reported for this ray are expressed in multiples of its length.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction,
            inv_direction: 1.0 / direction,
        }
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn at(&self, distance: f32) -> Vec3 {
        self.origin + self.direction * distance
    }

    /// Checks whether this ray crosses given box anywhere within
    /// `t_min ..= t_max`; returns the distance at which it enters the box
    /// (clamped to `t_min`).
    ///
    /// Axes along which the direction is zero are handled through the
    /// infinities in `inv_direction`. A ray that lies exactly within one of
    /// the box's faces yields `0 * inf = NaN` for that axis and is reported
    /// as a miss.
    pub fn hit_bounds(
        &self,
        bb: &BoundingBox,
        t_min: f32,
        t_max: f32,
    ) -> Option<f32> {
        let hit_min = (bb.min() - self.origin) * self.inv_direction;
        let hit_max = (bb.max() - self.origin) * self.inv_direction;

        let enter = t_min.max(hit_min.min(hit_max).max_element());
        let exit = t_max.min(hit_min.max(hit_max).min_element());

        (enter <= exit).then_some(enter)
    }

    /// Intersects this ray with a triangle.
    ///
    /// Hits behind the origin are rejected; hits on the triangle's edges are
    /// accepted.
    pub fn hit_triangle(
        &self,
        v0: Vec3,
        v1: Vec3,
        v2: Vec3,
    ) -> Option<TriangleHit> {
        let e0 = v1 - v0;
        let e1 = v2 - v0;
        let s = self.origin - v0;

        let p = s.cross(e0);
        let q = self.direction.cross(e1);
        let det = q.dot(e0);

        // Ray is parallel to the triangle's plane or the triangle is
        // degenerate
        if det == 0.0 {
            return None;
        }

        let inv_det = 1.0 / det;
        let distance = p.dot(e1) * inv_det;
        let u = q.dot(s) * inv_det;
        let v = p.dot(self.direction) * inv_det;

        if (distance >= 0.0) & (u >= 0.0) & (v >= 0.0) & (u + v <= 1.0) {
            Some(TriangleHit { distance, u, v })
        } else {
            None
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TriangleHit {
    pub distance: f32,
    pub u: f32,
    pub v: f32,
}
