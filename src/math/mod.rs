mod affine;

pub use affine::Affine2;

use serde::{Deserialize, Serialize};

pub const PI: f64 = std::f64::consts::PI;

/// A canvas coordinate, also used as a displacement between two coordinates.
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl std::ops::Add for Point {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

impl std::ops::Sub for Point {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// Axis-aligned rectangle, origin at the top-left corner.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Smallest rectangle enclosing every point. `None` for an empty iterator.
    pub fn enclosing(points: impl IntoIterator<Item = Point>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in iter {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Some(Self::new(min_x, min_y, max_x - min_x, max_y - min_y))
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Inclusive containment, grown by `padding` on every side.
    pub fn contains_padded(&self, p: Point, padding: f64) -> bool {
        p.x >= self.x - padding
            && p.x <= self.x + self.width + padding
            && p.y >= self.y - padding
            && p.y <= self.y + self.height + padding
    }
}

pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enclosing_rect() {
        let rect = Rect::enclosing([
            Point::new(2.0, 5.0),
            Point::new(10.0, 1.0),
            Point::new(7.0, 20.0),
        ])
        .unwrap();

        assert_eq!(rect, Rect::new(2.0, 1.0, 8.0, 19.0));
        assert_eq!(rect.center(), Point::new(6.0, 10.5));
    }

    #[test]
    fn test_enclosing_empty() {
        assert!(Rect::enclosing(std::iter::empty()).is_none());
    }

    #[test]
    fn test_contains_padded() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(rect.contains_padded(Point::new(10.0, 10.0), 0.0));
        assert!(!rect.contains_padded(Point::new(13.0, 5.0), 2.0));
        assert!(rect.contains_padded(Point::new(-4.0, 14.0), 4.0));
    }

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(-1.0, 0.0, 1.0), 0.0);
        assert_eq!(clamp(0.25, 0.0, 1.0), 0.25);
        assert_eq!(clamp(3.0, 0.0, 1.0), 1.0);
    }
}
