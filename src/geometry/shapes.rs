use std::f64::consts::{PI, TAU};

use geo::{Coord, LineString, Polygon};

use super::{Area, Point};

/// Regular `sides`-gon around `center` with its first vertex on the positive
/// x-axis.
///
/// With `circumscribed == false` the vertices lie on the circle of `radius`
/// (the polygon fits inside the circle); with `true` the edges touch the
/// circle from outside.
pub fn regular_polygon(
    center: Coord<f64>,
    radius: f64,
    sides: usize,
    circumscribed: bool,
) -> Polygon<f64> {
    let sides = sides.max(3);
    let r = if circumscribed {
        radius / (PI / sides as f64).cos()
    } else {
        radius
    };
    let ring: Vec<Coord<f64>> = (0..sides)
        .map(|i| {
            let angle = TAU * i as f64 / sides as f64;
            Coord {
                x: center.x + r * angle.cos(),
                y: center.y + r * angle.sin(),
            }
        })
        .collect();
    Polygon::new(LineString::from(ring), Vec::new())
}

/// Rectangle swept by moving segment `a -> b` by `distance` to both sides.
/// `None` for zero-length segments.
pub fn swept_quad(a: Coord<f64>, b: Coord<f64>, distance: f64) -> Option<Polygon<f64>> {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len = dx.hypot(dy);
    if len <= f64::EPSILON {
        return None;
    }
    let (nx, ny) = (-dy / len * distance, dx / len * distance);
    let ring = vec![
        Coord { x: a.x + nx, y: a.y + ny },
        Coord { x: b.x + nx, y: b.y + ny },
        Coord { x: b.x - nx, y: b.y - ny },
        Coord { x: a.x - nx, y: a.y - ny },
    ];
    Some(Polygon::new(LineString::from(ring), Vec::new()))
}

/// `count` evenly spaced points strictly between `a` and `b`, snapped to `grid`.
pub fn sample_segment(a: &Point, b: &Point, count: usize, grid: f64) -> Vec<Point> {
    let step = 1.0 / (count + 1) as f64;
    (1..=count)
        .map(|i| {
            let (x, y) = a.lerp(b, step * i as f64);
            Point::snapped(x, y, grid)
        })
        .collect()
}

/// A triangle given by three corners, in no particular winding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub a: Coord<f64>,
    pub b: Coord<f64>,
    pub c: Coord<f64>,
}

impl Triangle {
    pub fn new(a: Coord<f64>, b: Coord<f64>, c: Coord<f64>) -> Self {
        Self { a, b, c }
    }

    /// Twice the signed area; positive for counter-clockwise corners.
    pub fn doubled_signed_area(&self) -> f64 {
        (self.b.x - self.a.x) * (self.c.y - self.a.y) - (self.b.y - self.a.y) * (self.c.x - self.a.x)
    }

    pub fn size(&self) -> f64 {
        self.doubled_signed_area().abs() / 2.0
    }

    pub fn is_degenerate(&self, min_size: f64) -> bool {
        self.size() <= min_size
    }

    pub fn has_corner(&self, corner: Coord<f64>) -> bool {
        self.a == corner || self.b == corner || self.c == corner
    }

    pub fn to_area(&self) -> Area {
        Area::from_polygon(Polygon::new(
            LineString::from(vec![self.a, self.b, self.c]),
            Vec::new(),
        ))
    }
}
