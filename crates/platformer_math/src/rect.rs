//! Axis-aligned rectangle

use serde::{Serialize, Deserialize};

use crate::Vec2;

/// Axis-aligned rectangle defined by its minimum and maximum corners
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Minimum corner (top-left in screen space)
    pub min: Vec2,
    /// Maximum corner (bottom-right in screen space)
    pub max: Vec2,
}

impl Rect {
    /// Create a rectangle from min and max corners
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Create a rectangle from its top-left corner and size
    pub fn from_origin_size(origin: Vec2, size: Vec2) -> Self {
        Self::new(origin, origin + size)
    }

    /// Create a rectangle centered at a position with given half-extents
    pub fn from_center_half_extents(center: Vec2, half_extents: Vec2) -> Self {
        Self::new(center - half_extents, center + half_extents)
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Vec2 {
        self.min.midpoint(self.max)
    }

    /// A rectangle is valid when min <= max on both axes and all corners are finite
    pub fn is_valid(&self) -> bool {
        self.min.is_finite()
            && self.max.is_finite()
            && self.min.x <= self.max.x
            && self.min.y <= self.max.y
    }

    /// Check if a point is inside or on the rectangle
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// Check if two rectangles overlap (touching edges count)
    pub fn intersects(&self, other: &Rect) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    /// Closest point inside or on the rectangle
    pub fn clamp_point(&self, point: Vec2) -> Vec2 {
        point.clamp_components(self.min, self.max)
    }

    /// The four corners in clockwise screen order, starting top-left
    pub fn corners(&self) -> [Vec2; 4] {
        [
            self.min,
            Vec2::new(self.max.x, self.min.y),
            self.max,
            Vec2::new(self.min.x, self.max.y),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_origin_size() {
        let r = Rect::from_origin_size(Vec2::new(10.0, 20.0), Vec2::new(100.0, 50.0));
        assert_eq!(r.max, Vec2::new(110.0, 70.0));
        assert_eq!(r.width(), 100.0);
        assert_eq!(r.height(), 50.0);
        assert_eq!(r.center(), Vec2::new(60.0, 45.0));
    }

    #[test]
    fn test_contains_and_clamp() {
        let r = Rect::new(Vec2::ZERO, Vec2::new(1400.0, 900.0));
        assert!(r.contains(Vec2::new(0.0, 900.0)));
        assert!(!r.contains(Vec2::new(-1.0, 10.0)));
        assert_eq!(r.clamp_point(Vec2::new(1500.0, -20.0)), Vec2::new(1400.0, 0.0));
    }

    #[test]
    fn test_is_valid() {
        assert!(Rect::new(Vec2::ZERO, Vec2::new(1.0, 1.0)).is_valid());
        assert!(!Rect::new(Vec2::new(2.0, 0.0), Vec2::new(1.0, 1.0)).is_valid());
        assert!(!Rect::new(Vec2::ZERO, Vec2::new(f32::NAN, 1.0)).is_valid());
    }

    #[test]
    fn test_intersects() {
        let a = Rect::new(Vec2::ZERO, Vec2::new(10.0, 10.0));
        assert!(a.intersects(&Rect::new(Vec2::new(5.0, 5.0), Vec2::new(15.0, 15.0))));
        assert!(a.intersects(&Rect::new(Vec2::new(10.0, 0.0), Vec2::new(20.0, 10.0))));
        assert!(!a.intersects(&Rect::new(Vec2::new(11.0, 0.0), Vec2::new(20.0, 10.0))));
    }
}
