use std::ops::{Add, AddAssign};

use glam::{vec3, Affine3A, Vec3};

/// Axis-aligned bounding box.
///
/// The default value is the identity of [`Self::grow()`]: its `min` is
/// `+MAX` and its `max` is `-MAX`, so growing it by anything yields exactly
/// that thing. Such a box (or any box where `min > max` on some axis) is
/// considered empty.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    min: Vec3,
    max: Vec3,
}

impl BoundingBox {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        points.into_iter().collect()
    }

    pub fn min(&self) -> Vec3 {
        self.min
    }

    pub fn max(&self) -> Vec3 {
        self.max
    }

    pub fn min_mut(&mut self) -> &mut Vec3 {
        &mut self.min
    }

    pub fn max_mut(&mut self) -> &mut Vec3 {
        &mut self.max
    }

    pub fn extent(&self) -> Vec3 {
        (self.max - self.min).max(Vec3::ZERO)
    }

    pub fn center(&self) -> Vec3 {
        0.5 * (self.min + self.max)
    }

    pub fn is_empty(&self) -> bool {
        self.min.cmpgt(self.max).any()
    }

    pub fn grow(&mut self, p: Vec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    /// Clamps this box to its overlap with `other`.
    ///
    /// If both boxes are disjoint, the result is empty.
    pub fn intersect(&mut self, other: Self) {
        self.min = self.min.max(other.min);
        self.max = self.max.min(other.max);
    }

    pub fn intersection(mut self, other: Self) -> Self {
        self.intersect(other);
        self
    }

    /// Returns the surface area, `2 * (dx*dy + dy*dz + dz*dx)`; empty boxes
    /// have an area of zero.
    pub fn area(&self) -> f32 {
        if self.is_empty() {
            return 0.0;
        }

        let extent = self.extent();

        2.0 * (extent.x * extent.y + extent.y * extent.z + extent.z * extent.x)
    }

    pub fn overlaps(&self, other: &Self) -> bool {
        other.min.cmple(self.max).all() && other.max.cmpge(self.min).all()
    }

    pub fn contains_point(&self, p: Vec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    pub fn contains(&self, other: &Self) -> bool {
        self.contains_point(other.min) && self.contains_point(other.max)
    }

    /// Returns the distance between `p` and the nearest point of this box
    /// (zero when `p` is inside).
    pub fn distance(&self, p: Vec3) -> f32 {
        p.distance(p.clamp(self.min, self.max))
    }

    pub fn translate(&self, offset: Vec3) -> Self {
        Self::new(self.min + offset, self.max + offset)
    }

    /// Scales this box around its center.
    pub fn scale(&self, scale: Vec3) -> Self {
        let center = self.center();

        Self::new(
            center + scale * (self.min - center),
            center + scale * (self.max - center),
        )
    }

    pub fn scale_uniform(&self, scale: f32) -> Self {
        self.scale(Vec3::splat(scale))
    }

    /// Returns all eight corners; corner `i` takes `max` on the x / y / z
    /// axis when bit 0 / 1 / 2 of `i` is set.
    pub fn corners(&self) -> [Vec3; 8] {
        [0, 1, 2, 3, 4, 5, 6, 7].map(|i| {
            vec3(
                if i & 1 > 0 { self.max.x } else { self.min.x },
                if i & 2 > 0 { self.max.y } else { self.min.y },
                if i & 4 > 0 { self.max.z } else { self.min.z },
            )
        })
    }

    pub fn with_transform(&self, transform: Affine3A) -> Self {
        self.corners()
            .into_iter()
            .map(|corner| transform.transform_point3(corner))
            .collect()
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::new(Vec3::MAX, Vec3::MIN)
    }
}

impl Add<Vec3> for BoundingBox {
    type Output = Self;

    fn add(mut self, rhs: Vec3) -> Self::Output {
        self += rhs;
        self
    }
}

impl AddAssign<Vec3> for BoundingBox {
    fn add_assign(&mut self, rhs: Vec3) {
        self.grow(rhs);
    }
}

impl FromIterator<Vec3> for BoundingBox {
    fn from_iter<T>(iter: T) -> Self
    where
        T: IntoIterator<Item = Vec3>,
    {
        let mut this = Self::default();

        for item in iter {
            this += item;
        }

        this
    }
}

impl Add<Self> for BoundingBox {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self::Output {
        self += rhs;
        self
    }
}

impl AddAssign<Self> for BoundingBox {
    fn add_assign(&mut self, rhs: Self) {
        if rhs.is_empty() {
            return;
        }

        self.grow(rhs.min);
        self.grow(rhs.max);
    }
}

impl FromIterator<Self> for BoundingBox {
    fn from_iter<T>(iter: T) -> Self
    where
        T: IntoIterator<Item = Self>,
    {
        let mut this = Self::default();

        for item in iter {
            this += item;
        }

        this
    }
}
