use std::ops::Add;

use glam::Vec3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn around(center: Vec3, extent: Vec3) -> Self {
        let half = extent * 0.5;
        Self::new(center - half, center + half)
    }

    pub fn grow(&self, amount: f32) -> Self {
        Self::new(self.min - Vec3::splat(amount), self.max + Vec3::splat(amount))
    }

    pub fn intersects(&self, other: &BoundingBox) -> bool {
        let intersects_x = self.min.x < other.max.x && self.max.x > other.min.x;
        let intersects_y = self.min.y < other.max.y && self.max.y > other.min.y;
        let intersects_z = self.min.z < other.max.z && self.max.z > other.min.z;
        intersects_x && intersects_y && intersects_z
    }
}

impl Add<Vec3> for BoundingBox {
    type Output = Self;

    fn add(self, rhs: Vec3) -> Self::Output {
        Self {
            min: self.min + rhs,
            max: self.max + rhs,
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::vec3;

    use super::*;

    #[test]
    fn resting_boxes_touch_only_when_grown() {
        let floor = BoundingBox::around(Vec3::ZERO, vec3(10.0, 10.0, 2.0));
        let crate_ = BoundingBox::around(vec3(0.0, 0.0, 2.0), Vec3::splat(2.0));
        assert!(!floor.intersects(&crate_));
        assert!(floor.intersects(&crate_.grow(0.01)));
        assert!(floor.intersects(&(crate_ + vec3(0.0, 0.0, -0.5))));
    }
}
