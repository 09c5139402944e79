use std::f64::consts::TAU;
use std::hash::{Hash, Hasher};

use geo::Coord;

/// An immutable 2D coordinate usable as a graph key.
///
/// Equality and hashing compare the raw bits of both coordinates, so two
/// points are the same vertex only if they are identical. Points that come
/// out of different polygon operations should be built with
/// [`Point::snapped`] so that nearly equal corners collapse onto one key.
#[derive(Debug, Clone, Copy, PartialOrd)]
pub struct Point {
    x: f64,
    y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        debug_assert!(x.is_finite() && y.is_finite(), "non-finite point");
        // -0.0 + 0.0 == +0.0, keeps the bit pattern canonical
        Self {
            x: x + 0.0,
            y: y + 0.0,
        }
    }

    /// Round both coordinates to the nearest multiple of `grid`.
    pub fn snapped(x: f64, y: f64, grid: f64) -> Self {
        if grid <= 0.0 {
            return Self::new(x, y);
        }
        Self::new((x / grid).round() * grid, (y / grid).round() * grid)
    }

    pub fn from_coord(coord: Coord<f64>, grid: f64) -> Self {
        Self::snapped(coord.x, coord.y, grid)
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn coord(&self) -> Coord<f64> {
        Coord {
            x: self.x,
            y: self.y,
        }
    }

    /// Vector from `self` to `other` as `(dx, dy)`.
    pub fn to(&self, other: &Point) -> (f64, f64) {
        (other.x - self.x, other.y - self.y)
    }

    pub fn distance(&self, other: &Point) -> f64 {
        let (dx, dy) = self.to(other);
        dx.hypot(dy)
    }

    /// Point at parameter `t` on the segment `self -> other`, not snapped.
    pub fn lerp(&self, other: &Point, t: f64) -> (f64, f64) {
        (
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }

    /// `self + scale * (dx, dy)`
    pub fn offset(&self, (dx, dy): (f64, f64), scale: f64) -> Coord<f64> {
        Coord {
            x: self.x + dx * scale,
            y: self.y + dy * scale,
        }
    }

    /// Positive when `p` lies left of the directed line `self -> towards`.
    pub fn side_of(&self, towards: &Point, p: &Point) -> f64 {
        let (ax, ay) = self.to(towards);
        let (bx, by) = self.to(p);
        ax * by - ay * bx
    }
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        self.x.to_bits() == other.x.to_bits() && self.y.to_bits() == other.y.to_bits()
    }
}

impl Eq for Point {}

impl Hash for Point {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.x.to_bits().hash(state);
        self.y.to_bits().hash(state);
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// Angle of `(dx, dy)` measured clockwise from the positive x-axis, in `[0, 2π)`.
pub fn clockwise_angle((dx, dy): (f64, f64)) -> f64 {
    let angle = -dy.atan2(dx);
    if angle < 0.0 { angle + TAU } else { angle }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_negative_zero_is_same_vertex() {
        let mut set = HashSet::new();
        set.insert(Point::new(0.0, -0.0));
        assert!(set.contains(&Point::new(-0.0, 0.0)));
    }

    #[test]
    fn test_snapping_merges_near_duplicates() {
        let a = Point::snapped(1.000_000_000_1, 2.0, 1e-6);
        let b = Point::snapped(0.999_999_999_9, 2.0, 1e-6);
        assert_eq!(a, b);
    }

    #[test]
    fn test_clockwise_angle() {
        assert_eq!(clockwise_angle((1.0, 0.0)), 0.0);
        assert!((clockwise_angle((0.0, -1.0)) - FRAC_PI_2).abs() < 1e-12);
        assert!((clockwise_angle((-1.0, 0.0)) - PI).abs() < 1e-12);
        assert!((clockwise_angle((0.0, 1.0)) - 3.0 * FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn test_side_of() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(1.0, 0.0);
        assert!(a.side_of(&b, &Point::new(0.5, 1.0)) > 0.0);
        assert!(a.side_of(&b, &Point::new(0.5, -1.0)) < 0.0);
    }
}
