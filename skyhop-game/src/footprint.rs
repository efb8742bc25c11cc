use std::ops::Add;

use glam::Vec2;

/// Axis-aligned rectangle a structure occupies on the ground plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Footprint {
    pub min: Vec2,
    pub max: Vec2,
}

impl Footprint {
    pub fn centered(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Touching edges do not count as overlap.
    pub fn overlaps(&self, other: &Footprint) -> bool {
        let overlaps_x = self.min.x < other.max.x && self.max.x > other.min.x;
        let overlaps_y = self.min.y < other.max.y && self.max.y > other.min.y;
        overlaps_x && overlaps_y
    }
}

impl Add<Vec2> for Footprint {
    type Output = Self;

    fn add(self, rhs: Vec2) -> Self::Output {
        Self {
            min: self.min + rhs,
            max: self.max + rhs,
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::vec2;

    use super::*;

    #[test]
    fn overlap_needs_both_axes() {
        let a = Footprint::centered(Vec2::ZERO, vec2(10.0, 10.0));
        assert!(a.overlaps(&(a + vec2(9.0, 9.0))));
        assert!(!a.overlaps(&(a + vec2(11.0, 0.0))));
        assert!(!a.overlaps(&(a + vec2(0.0, -11.0))));
        assert!(!a.overlaps(&(a + vec2(3.0, 20.0))));
    }

    #[test]
    fn touching_edges_do_not_overlap() {
        let a = Footprint::centered(Vec2::ZERO, vec2(10.0, 10.0));
        let b = Footprint::centered(vec2(10.0, 0.0), vec2(10.0, 10.0));
        assert!(!a.overlaps(&b));
        assert_eq!(b.center(), vec2(10.0, 0.0));
        assert_eq!(b.size(), vec2(10.0, 10.0));
    }
}
